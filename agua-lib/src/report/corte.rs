//! Cash-register cut-off over a date range

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::Error;
use crate::model::Cobrador;
use crate::model::Descuento;
use crate::model::MetodoPago;
use crate::model::Pago;

/// Totals collected by one collector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CobradorTotal {
    /// Collector id; `None` groups payments taken at the counter.
    pub cobrador_id: Option<i64>,
    pub nombre: String,
    pub pagos: usize,
    pub neto: Decimal,
}

/// Cash-cut summary for `desde..=hasta`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorteCaja {
    pub desde: NaiveDate,
    pub hasta: NaiveDate,
    /// Payments inside the range, oldest first.
    pub pagos: Vec<Pago>,
    /// Sum of billed amounts.
    pub bruto: Decimal,
    /// Sum of discounts granted.
    pub descuentos: Decimal,
    /// `bruto - descuentos`.
    pub neto: Decimal,
    /// Net collected per payment method. Every method is present.
    pub por_metodo: BTreeMap<MetodoPago, Decimal>,
    /// Net collected per collector, counter payments first.
    pub por_cobrador: Vec<CobradorTotal>,
}

impl CorteCaja {
    /// Builds the cut from raw payments.
    ///
    /// Payments dated outside the range are ignored. Fails when `desde` is
    /// after `hasta`.
    pub fn from_pagos(
        desde: NaiveDate,
        hasta: NaiveDate,
        pagos: Vec<Pago>,
        descuentos: &[Descuento],
        cobradores: &[Cobrador],
    ) -> Result<Self, Error> {
        if desde > hasta {
            return Err(Error::InvalidRequest(format!(
                "el periodo inicia ({}) después de terminar ({})",
                desde, hasta
            )));
        }

        let mut pagos: Vec<Pago> = pagos
            .into_iter()
            .filter(|p| p.fecha >= desde && p.fecha <= hasta)
            .collect();
        pagos.sort_by_key(|p| (p.fecha, p.id));

        let mut por_metodo: BTreeMap<MetodoPago, Decimal> =
            MetodoPago::ALL.iter().map(|m| (*m, Decimal::ZERO)).collect();
        let mut grupos: BTreeMap<Option<i64>, (usize, Decimal)> = BTreeMap::new();
        let mut bruto = Decimal::ZERO;
        let mut total_descuentos = Decimal::ZERO;

        for pago in &pagos {
            let descuento = pago.importe_descuento(descuentos);
            let neto = pago.monto - descuento;
            bruto += pago.monto;
            total_descuentos += descuento;
            *por_metodo.entry(pago.metodo).or_default() += neto;
            let grupo = grupos.entry(pago.cobrador_id).or_default();
            grupo.0 += 1;
            grupo.1 += neto;
        }

        let por_cobrador = grupos
            .into_iter()
            .map(|(cobrador_id, (count, neto))| CobradorTotal {
                cobrador_id,
                nombre: nombre_cobrador(cobrador_id, cobradores),
                pagos: count,
                neto,
            })
            .collect();

        Ok(Self {
            desde,
            hasta,
            pagos,
            bruto,
            descuentos: total_descuentos,
            neto: bruto - total_descuentos,
            por_metodo,
            por_cobrador,
        })
    }

    /// Number of payments in the cut.
    pub fn total_pagos(&self) -> usize {
        self.pagos.len()
    }
}

fn nombre_cobrador(id: Option<i64>, cobradores: &[Cobrador]) -> String {
    match id {
        None => "Caja".to_string(),
        Some(id) => cobradores
            .iter()
            .find(|c| c.id == Some(id))
            .map(|c| c.nombre.clone())
            .unwrap_or_else(|| format!("Cobrador #{}", id)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fecha(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn pago(id: i64, dia: u32, monto: i64, metodo: MetodoPago, cobrador: Option<i64>) -> Pago {
        Pago {
            id: Some(id),
            cuentahabiente_id: 1,
            cobrador_id: cobrador,
            fecha: fecha(dia),
            monto: Decimal::new(monto, 0),
            metodo,
            descuento_id: None,
            folio: None,
        }
    }

    fn cobradores() -> Vec<Cobrador> {
        vec![Cobrador {
            id: Some(5),
            nombre: "Pedro Ruiz".into(),
            telefono: None,
            activo: true,
        }]
    }

    #[test]
    fn test_totals() {
        let mut con_descuento = pago(3, 4, 200, MetodoPago::Tarjeta, Some(5));
        con_descuento.descuento_id = Some(9);
        let descuentos = vec![Descuento {
            id: Some(9),
            nombre: "INAPAM".into(),
            porcentaje: Decimal::new(50, 0),
            activo: true,
        }];

        let corte = CorteCaja::from_pagos(
            fecha(1),
            fecha(31),
            vec![
                pago(1, 2, 100, MetodoPago::Efectivo, None),
                pago(2, 3, 150, MetodoPago::Efectivo, Some(5)),
                con_descuento,
            ],
            &descuentos,
            &cobradores(),
        )
        .unwrap();

        assert_eq!(corte.total_pagos(), 3);
        assert_eq!(corte.bruto, Decimal::new(450, 0));
        assert_eq!(corte.descuentos, Decimal::new(100, 0));
        assert_eq!(corte.neto, Decimal::new(350, 0));
        assert_eq!(corte.por_metodo[&MetodoPago::Efectivo], Decimal::new(250, 0));
        assert_eq!(corte.por_metodo[&MetodoPago::Tarjeta], Decimal::new(100, 0));
        assert_eq!(corte.por_metodo[&MetodoPago::Transferencia], Decimal::ZERO);

        assert_eq!(corte.por_cobrador.len(), 2);
        assert_eq!(corte.por_cobrador[0].nombre, "Caja");
        assert_eq!(corte.por_cobrador[1].nombre, "Pedro Ruiz");
        assert_eq!(corte.por_cobrador[1].pagos, 2);
        assert_eq!(corte.por_cobrador[1].neto, Decimal::new(250, 0));
    }

    #[test]
    fn test_ignores_out_of_range_payments() {
        let corte = CorteCaja::from_pagos(
            fecha(10),
            fecha(10),
            vec![
                pago(1, 9, 100, MetodoPago::Efectivo, None),
                pago(2, 10, 40, MetodoPago::Efectivo, Some(77)),
                pago(3, 11, 100, MetodoPago::Efectivo, None),
            ],
            &[],
            &cobradores(),
        )
        .unwrap();

        assert_eq!(corte.total_pagos(), 1);
        assert_eq!(corte.neto, Decimal::new(40, 0));
        assert_eq!(corte.por_cobrador[0].nombre, "Cobrador #77");
    }

    #[test]
    fn test_rejects_inverted_range() {
        let err = CorteCaja::from_pagos(fecha(5), fecha(1), vec![], &[], &[]).unwrap_err();
        assert!(matches!(err, Error::InvalidRequest(_)));
    }
}
