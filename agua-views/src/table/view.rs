//! Render snapshots of a table.

use crate::pagination::PageMarker;

/// One rendered row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewRow {
    /// Stable rendering key.
    pub id: String,
    /// Cell texts, in column order.
    pub cells: Vec<String>,
}

/// Everything a renderer needs to draw a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableView {
    pub headers: Vec<String>,
    /// Rows of the current page; empty while loading.
    pub rows: Vec<ViewRow>,
    pub loading: bool,
    /// Current page, 1-based.
    pub page: usize,
    pub total_pages: usize,
    /// Rows left after searching and filtering.
    pub total_items: usize,
    pub window: Vec<PageMarker>,
    pub can_prev: bool,
    pub can_next: bool,
    pub search: String,
    /// `(id, label)` of every filter option.
    pub filters: Vec<(String, String)>,
    /// Id of the selected filter option.
    pub selected_filter: String,
}

impl TableView {
    /// Returns `true` when loading finished and nothing matched.
    pub fn is_empty(&self) -> bool {
        !self.loading && self.total_items == 0
    }
}
