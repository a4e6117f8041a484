//! Generic data table.
//!
//! [`DataTable`] owns the fetch lifecycle of a row set and composes the
//! [`filter`](crate::filter) engine with [`pagination`](crate::pagination).
//! Renderers read [`TableView`] snapshots.
//!
//! # Example
//!
//! ```ignore
//! let table = DataTable::builder(
//!     vec![Column::new("numero_cuenta", "Cuenta"), Column::new("nombre", "Nombre")],
//!     move |cancel| {
//!         let client = client.clone();
//!         async move { Ok(client.list_cancellable::<Cuentahabiente>(&cancel).await?) }
//!     },
//! )
//! .searchable(["nombre", "numero_cuenta"])
//! .per_page(10)
//! .build();
//!
//! table.mount().await;
//! table.set_search("juan");
//! let view = table.view();
//! ```

mod column;
mod state;
mod view;

pub use column::Column;
pub use state::DataTable;
pub use state::LoadOutcome;
pub use state::Phase;
pub use state::TableBuilder;
pub use view::TableView;
pub use view::ViewRow;

/// Page size used when none is configured.
pub const DEFAULT_PER_PAGE: usize = 10;
