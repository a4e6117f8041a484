//! Account-holder specific operations

use reqwest::Method;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::AguaClient;
use crate::error::Error;
use crate::error::FieldValidationError;
use crate::model::Cargo;
use crate::model::Cuentahabiente;
use crate::model::Descuento;
use crate::model::Pago;
use crate::report::EstadoCuenta;

#[derive(Serialize)]
struct AsignarCobrador {
    cobrador_id: Option<i64>,
}

#[derive(Deserialize)]
struct EstadoCuentaBody {
    cuentahabiente: Cuentahabiente,
    #[serde(default)]
    cargos: Vec<Cargo>,
    #[serde(default)]
    pagos: Vec<Pago>,
    #[serde(default)]
    descuentos: Vec<Descuento>,
}

impl AguaClient {
    /// Assigns a collector to an account, or unassigns it with `None`.
    pub async fn asignar_cobrador(
        &self,
        cuentahabiente_id: i64,
        cobrador_id: Option<i64>,
    ) -> Result<Cuentahabiente, Error> {
        let updated = self
            .send_item(
                Method::PUT,
                &format!("cuentahabientes/{}/cobrador", cuentahabiente_id),
                Some(&AsignarCobrador { cobrador_id }),
            )
            .await?;
        log::info!(
            "Assigned cobrador {:?} to cuentahabiente {}",
            cobrador_id,
            cuentahabiente_id
        );
        Ok(updated)
    }

    /// Fetches the statement data of an account and computes its balance.
    pub async fn estado_cuenta(&self, cuentahabiente_id: i64) -> Result<EstadoCuenta, Error> {
        let body: EstadoCuentaBody = self
            .request_json(
                Method::GET,
                &format!("cuentahabientes/{}/estado-cuenta", cuentahabiente_id),
                &[],
                None::<&()>,
            )
            .await?;
        Ok(EstadoCuenta::build(
            body.cuentahabiente,
            &body.cargos,
            &body.pagos,
            &body.descuentos,
        ))
    }

    /// Lists the one-off charges of an account.
    pub async fn cargos_de(
        &self,
        cuentahabiente_id: i64,
        cancel: &CancellationToken,
    ) -> Result<Vec<Cargo>, Error> {
        self.list_where_cancellable::<Cargo>(
            &[("cuentahabiente_id", cuentahabiente_id.to_string())],
            cancel,
        )
        .await
    }

    /// Registers a charge, rejecting non-positive amounts and blank concepts
    /// locally.
    pub async fn registrar_cargo(&self, cargo: &Cargo) -> Result<Cargo, Error> {
        let mut errors = Vec::new();
        if cargo.concepto.trim().is_empty() {
            errors.push(FieldValidationError::new("concepto", "El concepto es requerido"));
        }
        if cargo.monto <= Decimal::ZERO {
            errors.push(FieldValidationError::new("monto", "El monto debe ser mayor a cero"));
        }
        if !errors.is_empty() {
            return Err(Error::Validation(errors));
        }
        self.create(cargo).await
    }

    /// Saves a discount, creating it when it has no id. The percentage must be
    /// above zero and at most 100.
    pub async fn guardar_descuento(&self, descuento: &Descuento) -> Result<Descuento, Error> {
        if descuento.porcentaje <= Decimal::ZERO || descuento.porcentaje > Decimal::ONE_HUNDRED {
            return Err(Error::Validation(vec![FieldValidationError::new(
                "porcentaje",
                "El porcentaje debe estar entre 0 y 100",
            )]));
        }
        match descuento.id {
            Some(_) => self.update(descuento).await,
            None => self.create(descuento).await,
        }
    }

    /// Registers a payment, rejecting non-positive amounts locally.
    pub async fn registrar_pago(&self, pago: &Pago) -> Result<Pago, Error> {
        if pago.monto <= Decimal::ZERO {
            return Err(Error::Validation(vec![
                FieldValidationError::new("monto", "El monto debe ser mayor a cero"),
            ]));
        }
        self.create(pago).await
    }
}
