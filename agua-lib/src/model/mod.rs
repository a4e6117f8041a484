//! Domain models for the billing backend

mod cargo;
mod cobrador;
mod cuentahabiente;
mod descuento;
mod pago;
mod usuario;

pub use cargo::Cargo;
pub use cobrador::Cobrador;
pub use cuentahabiente::Cuentahabiente;
pub use cuentahabiente::Tarifa;
pub use descuento::Descuento;
pub use pago::MetodoPago;
pub use pago::Pago;
pub use usuario::Rol;
pub use usuario::Usuario;

use serde::Serialize;
use serde::de::DeserializeOwned;

/// A backend collection reachable under `/{PATH}`.
///
/// Implementing this trait is all a model needs for the generic CRUD methods
/// on [`AguaClient`](crate::AguaClient).
pub trait Resource: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Collection path, without leading slash.
    const PATH: &'static str;

    /// Human-readable singular name, used in logs.
    const NAME: &'static str;

    /// Backend id, `None` for records not yet created.
    fn id(&self) -> Option<i64>;
}
