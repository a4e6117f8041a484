//! Report data computed from backend records
//!
//! Rendering (PDF, charts) is left to the caller; these types only hold the
//! figures.

mod corte;
mod estado_cuenta;

pub use corte::CobradorTotal;
pub use corte::CorteCaja;
pub use estado_cuenta::EstadoCuenta;
pub use estado_cuenta::Movimiento;
pub use estado_cuenta::TipoMovimiento;
