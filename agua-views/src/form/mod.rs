//! Declarative forms.
//!
//! A [`Form`] is built from a list of [`Field`]s and owns everything a form
//! view needs between renders:
//!
//! - [`FormData`] - current values, starting from each field's default
//! - [`ValidationErrors`] - filled on submit, cleared per field on edit
//! - search-select buffers and dropdowns, with [`Segment`] highlighting
//! - outside-click dismissal through one [`DismissRegistry`] per form
//! - [`layout`] rows pairing fields two by two
//!
//! Field kinds form the closed [`FieldKind`] enum, so every kind-specific
//! behavior is an exhaustive `match`.

mod data;
mod dismiss;
mod error;
mod field;
mod layout;
mod search_select;
mod state;
mod validation;

pub use data::FormData;
pub use dismiss::{ClickTarget, DismissRegistry};
pub use error::FormError;
pub use field::{Field, FieldKind, FieldValue, SearchFn, SelectOption, TextKind, ValidatorFn};
pub use layout::{FieldRow, layout};
pub use search_select::{DropdownOption, SearchState, Segment, highlight};
pub use state::{FieldStatus, Form, FormBuilder, Missing, Set, SubmitOutcome};
pub use validation::{ValidationErrors, required_message, validate_fields, validators};
