//! Error types

mod api;
mod validation;

pub use api::*;
pub use validation::*;
