use serde::Deserialize;
use serde::Serialize;

use super::Resource;

/// A field collector who records payments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cobrador {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub nombre: String,
    #[serde(default)]
    pub telefono: Option<String>,
    #[serde(default = "crate::model::cuentahabiente::default_true")]
    pub activo: bool,
}

impl Resource for Cobrador {
    const PATH: &'static str = "cobradores";
    const NAME: &'static str = "cobrador";

    fn id(&self) -> Option<i64> {
        self.id
    }
}
