//! Cash-register cut-off

use chrono::NaiveDate;

use crate::AguaClient;
use crate::error::Error;
use crate::model::Cobrador;
use crate::model::Descuento;
use crate::model::Pago;
use crate::report::CorteCaja;

/// Wire format of dates in query strings.
const DATE_FORMAT: &str = "%Y-%m-%d";

impl AguaClient {
    /// Fetches the payments of `desde..=hasta` and summarizes them.
    pub async fn corte_caja(&self, desde: NaiveDate, hasta: NaiveDate) -> Result<CorteCaja, Error> {
        if desde > hasta {
            return Err(Error::InvalidRequest(format!(
                "el periodo inicia ({}) después de terminar ({})",
                desde, hasta
            )));
        }

        let query = [
            ("desde", desde.format(DATE_FORMAT).to_string()),
            ("hasta", hasta.format(DATE_FORMAT).to_string()),
        ];
        let (pagos, descuentos, cobradores) = tokio::try_join!(
            self.get_list::<Pago>("pagos/corte", &query),
            self.list::<Descuento>(),
            self.list::<Cobrador>(),
        )?;

        log::debug!("Corte {}..{}: {} pagos", desde, hasta, pagos.len());
        CorteCaja::from_pagos(desde, hasta, pagos, &descuentos, &cobradores)
    }

    /// Lists the payments of one account.
    pub async fn pagos_de(&self, cuentahabiente_id: i64) -> Result<Vec<Pago>, Error> {
        self.list_where::<Pago>(&[("cuentahabiente_id", cuentahabiente_id.to_string())])
            .await
    }
}
