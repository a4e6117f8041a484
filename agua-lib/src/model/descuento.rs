use rust_decimal::Decimal;
use rust_decimal::RoundingStrategy;
use serde::Deserialize;
use serde::Serialize;

use super::Resource;

/// A percentage discount that can be applied to a payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Descuento {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub nombre: String,
    /// Percentage in `0..=100`.
    pub porcentaje: Decimal,
    #[serde(default = "crate::model::cuentahabiente::default_true")]
    pub activo: bool,
}

impl Descuento {
    /// Amount discounted from `monto`, rounded to cents.
    pub fn importe(&self, monto: Decimal) -> Decimal {
        let pct = self.porcentaje.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED);
        (monto * pct / Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }

    /// `monto` after applying this discount.
    pub fn aplicar(&self, monto: Decimal) -> Decimal {
        monto - self.importe(monto)
    }
}

impl Resource for Descuento {
    const PATH: &'static str = "descuentos";
    const NAME: &'static str = "descuento";

    fn id(&self) -> Option<i64> {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descuento(pct: i64) -> Descuento {
        Descuento {
            id: Some(1),
            nombre: "INAPAM".into(),
            porcentaje: Decimal::new(pct, 0),
            activo: true,
        }
    }

    #[test]
    fn test_aplicar() {
        let d = descuento(50);
        assert_eq!(d.aplicar(Decimal::new(15050, 2)), Decimal::new(7525, 2));
    }

    #[test]
    fn test_importe_rounds_to_cents() {
        let d = descuento(15);
        // 15% of 33.33 = 4.9995
        assert_eq!(d.importe(Decimal::new(3333, 2)), Decimal::new(500, 2));
    }

    #[test]
    fn test_percentage_is_clamped() {
        let d = descuento(150);
        assert_eq!(d.aplicar(Decimal::new(100, 0)), Decimal::ZERO);
    }
}
