//! Account statement with running balance

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::model::Cargo;
use crate::model::Cuentahabiente;
use crate::model::Descuento;
use crate::model::Pago;

/// Kind of statement line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum TipoMovimiento {
    Cargo,
    Pago,
    Descuento,
}

/// One line of the statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Movimiento {
    pub fecha: NaiveDate,
    pub tipo: TipoMovimiento,
    pub concepto: String,
    /// Amount owed by this line (charges).
    pub cargo: Decimal,
    /// Amount credited by this line (payments, discounts).
    pub abono: Decimal,
    /// Balance after this line.
    pub saldo: Decimal,
}

/// Statement of one account.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EstadoCuenta {
    pub cuentahabiente: Cuentahabiente,
    /// Lines in date order; on the same date charges precede credits.
    pub movimientos: Vec<Movimiento>,
    pub total_cargos: Decimal,
    pub total_abonos: Decimal,
    /// Outstanding balance; negative means the account is in credit.
    pub saldo: Decimal,
}

impl EstadoCuenta {
    /// Builds the statement from the account's charges and payments.
    ///
    /// A discounted payment yields two lines: the collected amount and the
    /// discount, so both credits add up to the billed amount.
    pub fn build(
        cuentahabiente: Cuentahabiente,
        cargos: &[Cargo],
        pagos: &[Pago],
        descuentos: &[Descuento],
    ) -> Self {
        let mut movimientos: Vec<Movimiento> = Vec::with_capacity(cargos.len() + pagos.len());

        for cargo in cargos {
            movimientos.push(linea(
                cargo.fecha,
                TipoMovimiento::Cargo,
                cargo.concepto.clone(),
                cargo.monto,
                Decimal::ZERO,
            ));
        }

        for pago in pagos {
            let concepto = match &pago.folio {
                Some(folio) => format!("Pago folio {}", folio),
                None => "Pago".to_string(),
            };
            movimientos.push(linea(
                pago.fecha,
                TipoMovimiento::Pago,
                concepto,
                Decimal::ZERO,
                pago.neto(descuentos),
            ));

            if let Some(descuento) = pago.descuento(descuentos) {
                let importe = descuento.importe(pago.monto);
                if !importe.is_zero() {
                    movimientos.push(linea(
                        pago.fecha,
                        TipoMovimiento::Descuento,
                        format!("Descuento {}", descuento.nombre),
                        Decimal::ZERO,
                        importe,
                    ));
                }
            }
        }

        // Stable: keeps pago/descuento pairs adjacent.
        movimientos.sort_by_key(|m| (m.fecha, m.tipo != TipoMovimiento::Cargo));

        let mut saldo = Decimal::ZERO;
        let mut total_cargos = Decimal::ZERO;
        let mut total_abonos = Decimal::ZERO;
        for m in &mut movimientos {
            saldo += m.cargo - m.abono;
            total_cargos += m.cargo;
            total_abonos += m.abono;
            m.saldo = saldo;
        }

        Self {
            cuentahabiente,
            movimientos,
            total_cargos,
            total_abonos,
            saldo,
        }
    }

    /// Returns `true` if the account owes money.
    pub fn tiene_adeudo(&self) -> bool {
        self.saldo > Decimal::ZERO
    }
}

fn linea(
    fecha: NaiveDate,
    tipo: TipoMovimiento,
    concepto: String,
    cargo: Decimal,
    abono: Decimal,
) -> Movimiento {
    Movimiento {
        fecha,
        tipo,
        concepto,
        cargo,
        abono,
        saldo: Decimal::ZERO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MetodoPago;
    use crate::model::Tarifa;

    fn fecha(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    fn cuenta() -> Cuentahabiente {
        Cuentahabiente {
            id: Some(1),
            numero_cuenta: "A-0001".into(),
            nombre: "Ana".into(),
            direccion: "Centro 1".into(),
            colonia: None,
            telefono: None,
            email: None,
            tarifa: Tarifa::Domestica,
            activo: true,
            cobrador: None,
        }
    }

    fn cargo(mes: u32, monto: i64) -> Cargo {
        Cargo {
            id: Some(mes as i64),
            cuentahabiente_id: 1,
            concepto: format!("Servicio mes {}", mes),
            monto: Decimal::new(monto, 0),
            fecha: fecha(mes, 1),
            pagado: false,
        }
    }

    #[test]
    fn test_running_balance() {
        let pagos = vec![Pago {
            id: Some(10),
            cuentahabiente_id: 1,
            cobrador_id: None,
            fecha: fecha(1, 1),
            monto: Decimal::new(100, 0),
            metodo: MetodoPago::Efectivo,
            descuento_id: Some(3),
            folio: Some("F-10".into()),
        }];
        let descuentos = vec![Descuento {
            id: Some(3),
            nombre: "INAPAM".into(),
            porcentaje: Decimal::new(25, 0),
            activo: true,
        }];

        let estado = EstadoCuenta::build(cuenta(), &[cargo(2, 120), cargo(1, 100)], &pagos, &descuentos);

        let tipos: Vec<_> = estado.movimientos.iter().map(|m| m.tipo).collect();
        assert_eq!(
            tipos,
            vec![
                TipoMovimiento::Cargo,
                TipoMovimiento::Pago,
                TipoMovimiento::Descuento,
                TipoMovimiento::Cargo,
            ]
        );
        let saldos: Vec<_> = estado.movimientos.iter().map(|m| m.saldo).collect();
        assert_eq!(
            saldos,
            vec![
                Decimal::new(100, 0),
                Decimal::new(25, 0),
                Decimal::ZERO,
                Decimal::new(120, 0),
            ]
        );
        assert_eq!(estado.movimientos[1].concepto, "Pago folio F-10");
        assert_eq!(estado.total_cargos, Decimal::new(220, 0));
        assert_eq!(estado.total_abonos, Decimal::new(100, 0));
        assert_eq!(estado.saldo, Decimal::new(120, 0));
        assert!(estado.tiene_adeudo());
    }

    #[test]
    fn test_empty_statement() {
        let estado = EstadoCuenta::build(cuenta(), &[], &[], &[]);
        assert!(estado.movimientos.is_empty());
        assert_eq!(estado.saldo, Decimal::ZERO);
        assert!(!estado.tiene_adeudo());
    }
}
