//! Agua API client library
//!
//! An async client for the municipal water-billing REST backend: account
//! holders, payments, discounts, charges, collectors, cash cuts and account
//! statements.

pub mod api;
pub mod error;
pub mod model;
pub mod report;
pub mod session;

mod client;

pub use client::*;
pub use error::Error;
pub use error::ErrorKind;
