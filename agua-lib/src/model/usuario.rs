use serde::Deserialize;
use serde::Serialize;

/// Role of a console operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rol {
    Admin,
    #[default]
    Cajero,
    Cobrador,
}

/// A console operator, as returned by the login endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Usuario {
    pub id: i64,
    pub nombre: String,
    pub usuario: String,
    #[serde(default)]
    pub rol: Rol,
}
