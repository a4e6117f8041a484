//! Free-text search and categorical filter options.

use std::fmt;
use std::sync::Arc;

use crate::row::Searchable;

/// Id of the built-in option that passes every row.
pub const ALL: &str = "all";

type Predicate<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

/// A selectable category, e.g. "Activos" or "Sin cobrador".
pub struct FilterOption<T> {
    pub id: String,
    pub label: String,
    pub value: String,
    predicate: Option<Predicate<T>>,
}

impl<T> FilterOption<T> {
    /// An option without predicate; it passes every row.
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            value: id.clone(),
            id,
            label: label.into(),
            predicate: None,
        }
    }

    /// The built-in "all" option.
    pub fn all() -> Self {
        Self::new(ALL, "Todos")
    }

    /// Sets the value reported for this option (defaults to the id).
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    /// Restricts the option to rows accepted by `predicate`.
    pub fn predicate<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.predicate = Some(Arc::new(predicate));
        self
    }

    /// Returns `true` if the option accepts `row`.
    pub fn accepts(&self, row: &T) -> bool {
        self.predicate.as_ref().is_none_or(|p| p(row))
    }

    pub fn has_predicate(&self) -> bool {
        self.predicate.is_some()
    }
}

impl<T> Clone for FilterOption<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            label: self.label.clone(),
            value: self.value.clone(),
            predicate: self.predicate.clone(),
        }
    }
}

impl<T> fmt::Debug for FilterOption<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterOption")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("value", &self.value)
            .field("predicate", &self.predicate.is_some())
            .finish()
    }
}

/// A list of filter options with exactly one selected.
///
/// The "all" option is always present and selected by default.
#[derive(Debug, Clone)]
pub struct FilterSet<T> {
    options: Vec<FilterOption<T>>,
    selected: usize,
}

impl<T> Default for FilterSet<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<T> FilterSet<T> {
    /// Builds a set from `options`, adding the "all" option first if missing.
    pub fn new(options: Vec<FilterOption<T>>) -> Self {
        let mut options = options;
        if !options.iter().any(|o| o.id == ALL) {
            options.insert(0, FilterOption::all());
        }
        let selected = options.iter().position(|o| o.id == ALL).unwrap_or(0);
        Self { options, selected }
    }

    pub fn options(&self) -> &[FilterOption<T>] {
        &self.options
    }

    pub fn selected(&self) -> &FilterOption<T> {
        &self.options[self.selected]
    }

    /// Selects the option with `id`. Unknown ids leave the selection alone.
    pub fn select(&mut self, id: &str) -> bool {
        match self.options.iter().position(|o| o.id == id) {
            Some(index) => {
                self.selected = index;
                true
            }
            None => false,
        }
    }

    /// Returns `true` if the selected option accepts `row`.
    pub fn accepts(&self, row: &T) -> bool {
        self.selected().accepts(row)
    }
}

/// Returns `true` if `row` matches the search `term`.
///
/// An empty term or an empty field list matches everything; otherwise at least
/// one field must contain the term, ignoring case. The term is matched as
/// typed, surrounding whitespace included.
pub fn matches_search<R: Searchable + ?Sized>(row: &R, fields: &[String], term: &str) -> bool {
    if term.is_empty() || fields.is_empty() {
        return true;
    }
    let needle = term.to_lowercase();
    fields.iter().any(|field| {
        row.field_text(field)
            .is_some_and(|text| text.to_lowercase().contains(&needle))
    })
}

/// Keeps the rows that match both the search term and the selected filter.
///
/// `row_of` maps each searchable item to the value the filter predicates see.
/// Input order is preserved.
pub fn filter_rows<'a, S, T>(
    items: &'a [S],
    fields: &[String],
    term: &str,
    filters: &FilterSet<T>,
    row_of: impl Fn(&S) -> &T,
) -> Vec<&'a S>
where
    S: Searchable,
{
    items
        .iter()
        .filter(|item| matches_search(*item, fields, term) && filters.accepts(row_of(*item)))
        .collect()
}
