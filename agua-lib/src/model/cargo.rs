use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde::Serialize;

use super::Resource;

/// A one-off charge, distinct from recurring service billing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cargo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub cuentahabiente_id: i64,
    pub concepto: String,
    pub monto: Decimal,
    pub fecha: NaiveDate,
    #[serde(default)]
    pub pagado: bool,
}

impl Resource for Cargo {
    const PATH: &'static str = "cargos";
    const NAME: &'static str = "cargo";

    fn id(&self) -> Option<i64> {
        self.id
    }
}
