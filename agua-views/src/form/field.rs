//! Field descriptors.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::data::FormData;

/// Custom validation rule: `(value, whole form) -> error message`.
pub type ValidatorFn = Arc<dyn Fn(&FieldValue, &FormData) -> Option<String> + Send + Sync>;

/// Search callback of a search-select field. Fire-and-forget; results come
/// back through [`Form::set_options`](super::Form::set_options).
pub type SearchFn = Arc<dyn Fn(String) + Send + Sync>;

/// Flavor of a single-line text input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextKind {
    Text,
    Email,
    Tel,
    Number,
    Date,
}

impl TextKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Email => "email",
            Self::Tel => "tel",
            Self::Number => "number",
            Self::Date => "date",
        }
    }
}

/// A choice of a select or search-select field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// What kind of input a field is. Each variant carries only what it needs.
#[derive(Clone)]
pub enum FieldKind {
    Text(TextKind),
    TextArea {
        rows: u16,
    },
    Select {
        options: Vec<SelectOption>,
    },
    /// Masked input with a per-field show/hide toggle.
    Password,
    /// Free-text combo box whose options are supplied by the caller.
    SearchSelect {
        options: Vec<SelectOption>,
        on_search: Option<SearchFn>,
    },
}

impl FieldKind {
    pub fn text() -> Self {
        Self::Text(TextKind::Text)
    }

    pub fn email() -> Self {
        Self::Text(TextKind::Email)
    }

    pub fn tel() -> Self {
        Self::Text(TextKind::Tel)
    }

    pub fn number() -> Self {
        Self::Text(TextKind::Number)
    }

    pub fn date() -> Self {
        Self::Text(TextKind::Date)
    }

    pub fn textarea(rows: u16) -> Self {
        Self::TextArea { rows }
    }

    pub fn select(options: Vec<SelectOption>) -> Self {
        Self::Select { options }
    }

    /// A search-select with no initial options.
    pub fn search_select<F>(on_search: F) -> Self
    where
        F: Fn(String) + Send + Sync + 'static,
    {
        Self::SearchSelect {
            options: Vec::new(),
            on_search: Some(Arc::new(on_search)),
        }
    }

    /// Name of the input type, as a renderer would label it.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Text(kind) => kind.as_str(),
            Self::TextArea { .. } => "textarea",
            Self::Select { .. } => "select",
            Self::Password => "password",
            Self::SearchSelect { .. } => "search-select",
        }
    }

    /// Static or last-delivered options. Empty for free-text kinds.
    pub fn options(&self) -> &[SelectOption] {
        match self {
            Self::Select { options } | Self::SearchSelect { options, .. } => options,
            Self::Text(_) | Self::TextArea { .. } | Self::Password => &[],
        }
    }

    /// Converts raw input into the value stored for this kind.
    ///
    /// Number inputs store numbers when the text parses; anything else stays
    /// text so validation can report it.
    pub fn coerce(&self, value: FieldValue) -> FieldValue {
        match (self, value) {
            (Self::Text(TextKind::Number), FieldValue::Text(text)) => match text.trim().parse() {
                Ok(n) => FieldValue::Number(n),
                Err(_) => FieldValue::Text(text),
            },
            (_, value) => value,
        }
    }
}

impl fmt::Debug for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(kind) => f.debug_tuple("Text").field(kind).finish(),
            Self::TextArea { rows } => f.debug_struct("TextArea").field("rows", rows).finish(),
            Self::Select { options } => f.debug_struct("Select").field("options", options).finish(),
            Self::Password => f.write_str("Password"),
            Self::SearchSelect { options, on_search } => f
                .debug_struct("SearchSelect")
                .field("options", options)
                .field("on_search", &on_search.is_some())
                .finish(),
        }
    }
}

/// Current value of a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Number(f64),
}

impl FieldValue {
    /// Empty or whitespace-only text. Numbers are never blank.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(text) => text.trim().is_empty(),
            Self::Number(_) => false,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Text(text) => text.trim().parse().ok(),
            Self::Number(n) => Some(*n),
        }
    }
}

impl Default for FieldValue {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

/// Declarative description of one form field.
#[derive(Clone)]
pub struct Field {
    /// Key into the form data.
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    pub icon: Option<String>,
    pub required: bool,
    pub validator: Option<ValidatorFn>,
    /// Value the field starts with and returns to on reset.
    pub default: FieldValue,
    pub disabled: bool,
    /// Occupies a layout row of its own.
    pub full_width: bool,
    pub placeholder: Option<String>,
}

impl Field {
    pub fn new(name: impl Into<String>, label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind,
            icon: None,
            required: false,
            validator: None,
            default: FieldValue::default(),
            disabled: false,
            full_width: false,
            placeholder: None,
        }
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn validator<F>(mut self, f: F) -> Self
    where
        F: Fn(&FieldValue, &FormData) -> Option<String> + Send + Sync + 'static,
    {
        self.validator = Some(Arc::new(f));
        self
    }

    /// Uses an already shared rule, e.g. one from [`validators`](super::validators).
    pub fn rule(mut self, rule: ValidatorFn) -> Self {
        self.validator = Some(rule);
        self
    }

    pub fn default_value(mut self, value: impl Into<FieldValue>) -> Self {
        self.default = self.kind.coerce(value.into());
        self
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    pub fn full_width(mut self) -> Self {
        self.full_width = true;
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn is_search_select(&self) -> bool {
        matches!(self.kind, FieldKind::SearchSelect { .. })
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("label", &self.label)
            .field("kind", &self.kind)
            .field("required", &self.required)
            .field("validator", &self.validator.is_some())
            .field("default", &self.default)
            .field("disabled", &self.disabled)
            .field("full_width", &self.full_width)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_fields_store_numbers() {
        let kind = FieldKind::number();
        assert_eq!(kind.coerce("12.5".into()), FieldValue::Number(12.5));
        assert_eq!(kind.coerce("doce".into()), FieldValue::Text("doce".into()));
        assert_eq!(FieldKind::tel().coerce("12".into()), FieldValue::Text("12".into()));
    }

    #[test]
    fn test_blank_values() {
        assert!(FieldValue::from("   ").is_blank());
        assert!(!FieldValue::from(" a ").is_blank());
        assert!(!FieldValue::Number(0.0).is_blank());
    }

    #[test]
    fn test_values_serialize_untagged() {
        let json = serde_json::to_string(&vec![FieldValue::from("a"), FieldValue::Number(2.0)]).unwrap();
        assert_eq!(json, r#"["a",2.0]"#);
    }
}
