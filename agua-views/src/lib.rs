//! Headless table and form engines for the Agua console.
//!
//! Nothing here draws anything. Each engine owns the state a view needs
//! (filtered rows, page window, field values, validation errors, open
//! dropdowns) and exposes snapshots that a renderer turns into output.
//!
//! - [`pagination`] - Page-number window for navigation controls
//! - [`filter`] - Free-text search plus categorical filter options
//! - [`table`] - Data table with async fetch, delete and pagination
//! - [`form`] - Declarative forms with validation, layout and search-select

pub mod filter;
pub mod form;
pub mod pagination;
pub mod row;
pub mod table;

use std::future::Future;
use std::pin::Pin;

/// Error type returned by injected callbacks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Type alias for boxed futures returned by injected callbacks.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub use filter::FilterOption;
pub use filter::FilterSet;
pub use form::Field;
pub use form::FieldKind;
pub use form::Form;
pub use pagination::PageMarker;
pub use table::Column;
pub use table::DataTable;
