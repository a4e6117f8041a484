use serde::Deserialize;
use serde::Serialize;

use super::Cobrador;
use super::Resource;

/// Billing rate category of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tarifa {
    #[default]
    Domestica,
    Comercial,
    Industrial,
}

impl Tarifa {
    /// All rates, in display order.
    pub const ALL: [Tarifa; 3] = [Tarifa::Domestica, Tarifa::Comercial, Tarifa::Industrial];

    /// Wire value of this rate.
    pub fn as_str(&self) -> &'static str {
        match self {
            Tarifa::Domestica => "domestica",
            Tarifa::Comercial => "comercial",
            Tarifa::Industrial => "industrial",
        }
    }

    /// Display label of this rate.
    pub fn label(&self) -> &'static str {
        match self {
            Tarifa::Domestica => "Doméstica",
            Tarifa::Comercial => "Comercial",
            Tarifa::Industrial => "Industrial",
        }
    }

    /// Parses a wire value.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == value)
    }
}

/// A billed account holder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cuentahabiente {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub numero_cuenta: String,
    pub nombre: String,
    pub direccion: String,
    #[serde(default)]
    pub colonia: Option<String>,
    #[serde(default)]
    pub telefono: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub tarifa: Tarifa,
    #[serde(default = "default_true")]
    pub activo: bool,
    /// Assigned collector, embedded by list endpoints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cobrador: Option<Cobrador>,
}

pub(crate) fn default_true() -> bool {
    true
}

impl Resource for Cuentahabiente {
    const PATH: &'static str = "cuentahabientes";
    const NAME: &'static str = "cuentahabiente";

    fn id(&self) -> Option<i64> {
        self.id
    }
}
