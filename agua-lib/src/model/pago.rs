use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde::Serialize;

use super::Resource;

/// How a payment was collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetodoPago {
    #[default]
    Efectivo,
    Tarjeta,
    Transferencia,
}

impl MetodoPago {
    /// All methods, in display order.
    pub const ALL: [MetodoPago; 3] = [
        MetodoPago::Efectivo,
        MetodoPago::Tarjeta,
        MetodoPago::Transferencia,
    ];

    /// Wire value of this method.
    pub fn as_str(&self) -> &'static str {
        match self {
            MetodoPago::Efectivo => "efectivo",
            MetodoPago::Tarjeta => "tarjeta",
            MetodoPago::Transferencia => "transferencia",
        }
    }

    /// Parses a wire value.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == value)
    }
}

/// A payment captured against an account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pago {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub cuentahabiente_id: i64,
    #[serde(default)]
    pub cobrador_id: Option<i64>,
    pub fecha: NaiveDate,
    /// Amount billed, before any discount.
    pub monto: Decimal,
    #[serde(default)]
    pub metodo: MetodoPago,
    #[serde(default)]
    pub descuento_id: Option<i64>,
    #[serde(default)]
    pub folio: Option<String>,
}

impl Resource for Pago {
    const PATH: &'static str = "pagos";
    const NAME: &'static str = "pago";

    fn id(&self) -> Option<i64> {
        self.id
    }
}

impl Pago {
    /// The discount referenced by this payment, if it is in `descuentos`.
    pub fn descuento<'a>(&self, descuentos: &'a [super::Descuento]) -> Option<&'a super::Descuento> {
        let id = self.descuento_id?;
        descuentos.iter().find(|d| d.id == Some(id))
    }

    /// Amount discounted from this payment.
    pub fn importe_descuento(&self, descuentos: &[super::Descuento]) -> Decimal {
        self.descuento(descuentos)
            .map(|d| d.importe(self.monto))
            .unwrap_or(Decimal::ZERO)
    }

    /// Amount actually collected: `monto` minus any discount.
    pub fn neto(&self, descuentos: &[super::Descuento]) -> Decimal {
        self.monto - self.importe_descuento(descuentos)
    }
}
