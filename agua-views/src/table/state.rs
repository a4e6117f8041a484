//! Data table state.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use serde::Serialize;
use tokio_util::sync::CancellationToken;

use super::DEFAULT_PER_PAGE;
use super::column::Column;
use super::view::{TableView, ViewRow};
use crate::filter::{FilterOption, FilterSet, filter_rows};
use crate::pagination::{Pagination, page_window, total_pages};
use crate::row::Projected;
use crate::{BoxError, BoxFuture};

type FetchFn<T> =
    Arc<dyn Fn(CancellationToken) -> BoxFuture<'static, Result<Vec<T>, BoxError>> + Send + Sync>;
type DeleteFn<T> = Arc<dyn Fn(T) -> BoxFuture<'static, Result<bool, BoxError>> + Send + Sync>;
type EditFn<T> = Arc<dyn Fn(&T) + Send + Sync>;
type RowIdFn<T> = Arc<dyn Fn(&T) -> String + Send + Sync>;

/// Fetch lifecycle of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Never loaded.
    Idle,
    /// A fetch is in flight; the body is not rendered.
    Loading,
    /// The last fetch settled, successfully or not.
    Ready,
}

/// How a call to [`DataTable::load`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Rows replaced with this many records.
    Loaded(usize),
    /// The fetch failed; the row set is now empty.
    Failed,
    /// A newer load or an unmount superseded this one; nothing changed.
    Discarded,
}

/// Immutable configuration shared by every handle.
struct TableConfig<T> {
    columns: Vec<Column<T>>,
    searchable: Vec<String>,
    fetch: FetchFn<T>,
    row_id: Option<RowIdFn<T>>,
    on_edit: Option<EditFn<T>>,
    on_delete: Option<DeleteFn<T>>,
}

/// Internal state for the DataTable.
struct TableInner<T> {
    phase: Phase,
    rows: Vec<Projected<T>>,
    search: String,
    filters: FilterSet<T>,
    pagination: Pagination,
    refresh_token: Option<u64>,
    /// Bumped on every load; responses carrying an older value are dropped.
    generation: u64,
    active: Option<CancellationToken>,
    mounted: bool,
}

/// Builder for a [`DataTable`].
pub struct TableBuilder<T> {
    columns: Vec<Column<T>>,
    fetch: FetchFn<T>,
    searchable: Vec<String>,
    filters: Vec<FilterOption<T>>,
    per_page: usize,
    refresh_token: Option<u64>,
    row_id: Option<RowIdFn<T>>,
    on_edit: Option<EditFn<T>>,
    on_delete: Option<DeleteFn<T>>,
}

impl<T> TableBuilder<T>
where
    T: Serialize + Clone + Send + Sync + 'static,
{
    /// Keys searched by [`DataTable::set_search`]. Empty disables text search.
    pub fn searchable<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.searchable = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Categorical filter options; "all" is added automatically.
    pub fn filters(mut self, options: Vec<FilterOption<T>>) -> Self {
        self.filters = options;
        self
    }

    /// Rows per page.
    pub fn per_page(mut self, per_page: usize) -> Self {
        self.per_page = per_page;
        self
    }

    /// Initial value of the external refresh token.
    pub fn refresh_token(mut self, token: u64) -> Self {
        self.refresh_token = Some(token);
        self
    }

    /// Rendering key of a row. Defaults to the row's position.
    pub fn row_id<F>(mut self, f: F) -> Self
    where
        F: Fn(&T) -> String + Send + Sync + 'static,
    {
        self.row_id = Some(Arc::new(f));
        self
    }

    /// Called when the user asks to edit a row.
    pub fn on_edit<F>(mut self, f: F) -> Self
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.on_edit = Some(Arc::new(f));
        self
    }

    /// Called when the user asks to delete a row. `Ok(true)` triggers a re-fetch.
    pub fn on_delete<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<bool, BoxError>> + Send + 'static,
    {
        self.on_delete = Some(Arc::new(move |row| Box::pin(f(row))));
        self
    }

    pub fn build(self) -> DataTable<T> {
        DataTable {
            config: Arc::new(TableConfig {
                columns: self.columns,
                searchable: self.searchable,
                fetch: self.fetch,
                row_id: self.row_id,
                on_edit: self.on_edit,
                on_delete: self.on_delete,
            }),
            inner: Arc::new(RwLock::new(TableInner {
                phase: Phase::Idle,
                rows: Vec::new(),
                search: String::new(),
                filters: FilterSet::new(self.filters),
                pagination: Pagination::new(self.per_page),
                refresh_token: self.refresh_token,
                generation: 0,
                active: None,
                mounted: false,
            })),
            dirty: Arc::new(AtomicBool::new(false)),
        }
    }
}

/// A searchable, filterable, paginated table over an async row source.
///
/// `DataTable<T>` is a handle; clones share state. It manages:
/// - the fetch lifecycle (`Idle → Loading → Ready`), with failures degrading
///   to an empty row set
/// - cancellation of superseded fetches, so only the newest response lands
/// - search and filter, both resetting to page 1
/// - edit and delete actions, re-fetching after a confirmed delete
pub struct DataTable<T> {
    config: Arc<TableConfig<T>>,
    inner: Arc<RwLock<TableInner<T>>>,
    dirty: Arc<AtomicBool>,
}

impl<T> Clone for DataTable<T> {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            inner: Arc::clone(&self.inner),
            dirty: Arc::clone(&self.dirty),
        }
    }
}

impl<T> DataTable<T>
where
    T: Serialize + Clone + Send + Sync + 'static,
{
    /// Starts building a table over `columns`, fetching rows with `fetch`.
    ///
    /// `fetch` receives the token of its load; it should pass it on to the
    /// HTTP layer so superseded requests stop early.
    pub fn builder<F, Fut>(columns: Vec<Column<T>>, fetch: F) -> TableBuilder<T>
    where
        F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Vec<T>, BoxError>> + Send + 'static,
    {
        TableBuilder {
            columns,
            fetch: Arc::new(move |cancel| Box::pin(fetch(cancel))),
            searchable: Vec::new(),
            filters: Vec::new(),
            per_page: DEFAULT_PER_PAGE,
            refresh_token: None,
            row_id: None,
            on_edit: None,
            on_delete: None,
        }
    }

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------

    /// Marks the table as displayed and performs the initial load.
    pub async fn mount(&self) -> LoadOutcome {
        if let Ok(mut guard) = self.inner.write() {
            guard.mounted = true;
        }
        self.load().await
    }

    /// Marks the table as gone and cancels any in-flight fetch.
    ///
    /// A cancelled load leaves the table `Idle` rather than `Loading`.
    pub fn unmount(&self) {
        if let Ok(mut guard) = self.inner.write() {
            guard.mounted = false;
            if let Some(token) = guard.active.take() {
                token.cancel();
            }
            if guard.phase == Phase::Loading {
                guard.phase = Phase::Idle;
            }
        }
        self.mark_dirty();
    }

    pub fn is_mounted(&self) -> bool {
        self.inner.read().map(|g| g.mounted).unwrap_or(false)
    }

    /// Updates the external refresh token, re-fetching if it changed.
    pub async fn set_refresh_token(&self, token: u64) -> Option<LoadOutcome> {
        let changed = match self.inner.write() {
            Ok(mut guard) if guard.refresh_token != Some(token) => {
                guard.refresh_token = Some(token);
                true
            }
            _ => false,
        };
        if changed { Some(self.load().await) } else { None }
    }

    /// Fetches the row set, replacing the current one.
    ///
    /// Starting a load cancels the previous one. A response that arrives after
    /// a newer load started, or after [`unmount`](Self::unmount), is dropped.
    pub async fn load(&self) -> LoadOutcome {
        let (generation, cancel) = {
            let Ok(mut guard) = self.inner.write() else {
                return LoadOutcome::Discarded;
            };
            if let Some(previous) = guard.active.take() {
                previous.cancel();
            }
            guard.generation += 1;
            guard.phase = Phase::Loading;
            let token = CancellationToken::new();
            guard.active = Some(token.clone());
            (guard.generation, token)
        };
        self.mark_dirty();

        let result = (self.config.fetch)(cancel.clone()).await;

        let Ok(mut guard) = self.inner.write() else {
            return LoadOutcome::Discarded;
        };
        if guard.generation != generation || cancel.is_cancelled() {
            log::debug!("Dropping stale table response (generation {})", generation);
            return LoadOutcome::Discarded;
        }

        guard.active = None;
        guard.phase = Phase::Ready;
        let outcome = match result {
            Ok(rows) => {
                guard.rows = rows.into_iter().map(Projected::new).collect();
                LoadOutcome::Loaded(guard.rows.len())
            }
            Err(e) => {
                log::warn!("Table fetch failed, showing no rows: {}", e);
                guard.rows.clear();
                LoadOutcome::Failed
            }
        };
        let total = self.filtered_len(&guard);
        guard.pagination.clamp(total);
        drop(guard);
        self.mark_dirty();
        outcome
    }

    pub fn phase(&self) -> Phase {
        self.inner.read().map(|g| g.phase).unwrap_or(Phase::Idle)
    }

    pub fn is_loading(&self) -> bool {
        self.phase() == Phase::Loading
    }

    // -------------------------------------------------------------------------
    // Search & filter
    // -------------------------------------------------------------------------

    /// Sets the free-text search term and goes back to page 1.
    pub fn set_search(&self, term: impl Into<String>) {
        if let Ok(mut guard) = self.inner.write() {
            guard.search = term.into();
            guard.pagination.reset();
            self.mark_dirty();
        }
    }

    pub fn search(&self) -> String {
        self.inner
            .read()
            .map(|g| g.search.clone())
            .unwrap_or_default()
    }

    /// Selects a filter option by id and goes back to page 1.
    ///
    /// Returns `false` for unknown ids, leaving everything unchanged.
    pub fn select_filter(&self, id: &str) -> bool {
        let Ok(mut guard) = self.inner.write() else {
            return false;
        };
        if !guard.filters.select(id) {
            return false;
        }
        guard.pagination.reset();
        self.mark_dirty();
        true
    }

    // -------------------------------------------------------------------------
    // Pagination
    // -------------------------------------------------------------------------

    /// Current page, 1-based.
    pub fn page(&self) -> usize {
        self.inner.read().map(|g| g.pagination.page()).unwrap_or(1)
    }

    /// Jumps to `page`. Pages outside `1..=total_pages` are refused.
    pub fn go_to_page(&self, page: usize) -> bool {
        self.paginate(|pagination, total| pagination.go_to(page, total))
    }

    pub fn next_page(&self) -> bool {
        self.paginate(|pagination, total| pagination.next(total))
    }

    pub fn prev_page(&self) -> bool {
        self.paginate(|pagination, total| pagination.prev(total))
    }

    fn paginate(&self, f: impl FnOnce(&mut Pagination, usize) -> bool) -> bool {
        let Ok(mut guard) = self.inner.write() else {
            return false;
        };
        let total = self.filtered_len(&guard);
        let moved = f(&mut guard.pagination, total);
        if moved {
            self.mark_dirty();
        }
        moved
    }

    // -------------------------------------------------------------------------
    // Rows & actions
    // -------------------------------------------------------------------------

    /// All fetched rows, unfiltered.
    pub fn rows(&self) -> Vec<T> {
        self.inner
            .read()
            .map(|g| g.rows.iter().map(|p| p.row.clone()).collect())
            .unwrap_or_default()
    }

    /// Rows of the current page, after search and filter.
    pub fn page_rows(&self) -> Vec<T> {
        let Ok(guard) = self.inner.read() else {
            return Vec::new();
        };
        let filtered = self.filtered(&guard);
        let range = Self::effective_pagination(&guard, filtered.len()).range(filtered.len());
        filtered[range].iter().map(|p| p.row.clone()).collect()
    }

    /// Finds a fetched row by its rendering key.
    pub fn find(&self, id: &str) -> Option<T> {
        let guard = self.inner.read().ok()?;
        self.filtered(&guard)
            .into_iter()
            .enumerate()
            .find(|(index, p)| self.row_key(*index, &p.row) == id)
            .map(|(_, p)| p.row.clone())
    }

    /// Fires the edit callback for `row`. Returns `false` if none is configured.
    pub fn edit(&self, row: &T) -> bool {
        match &self.config.on_edit {
            Some(on_edit) => {
                on_edit(row);
                true
            }
            None => false,
        }
    }

    /// Runs the delete callback for `row`.
    ///
    /// Re-fetches and returns `true` only when the callback confirms the
    /// deletion. A refusal or an error leaves the table untouched.
    pub async fn delete(&self, row: T) -> bool {
        let Some(on_delete) = self.config.on_delete.clone() else {
            return false;
        };
        match on_delete(row).await {
            Ok(true) => {
                self.load().await;
                true
            }
            Ok(false) => false,
            Err(e) => {
                log::warn!("Delete failed, keeping current rows: {}", e);
                false
            }
        }
    }

    // -------------------------------------------------------------------------
    // Rendering
    // -------------------------------------------------------------------------

    /// Snapshot of everything needed to draw the table.
    pub fn view(&self) -> TableView {
        let headers = self.config.columns.iter().map(|c| c.label.clone()).collect();
        let Ok(guard) = self.inner.read() else {
            return TableView {
                headers,
                rows: Vec::new(),
                loading: false,
                page: 1,
                total_pages: 0,
                total_items: 0,
                window: Vec::new(),
                can_prev: false,
                can_next: false,
                search: String::new(),
                filters: Vec::new(),
                selected_filter: String::new(),
            };
        };

        let loading = guard.phase == Phase::Loading;
        let filtered = self.filtered(&guard);
        let total_items = filtered.len();
        let pagination = Self::effective_pagination(&guard, total_items);
        let pages = total_pages(total_items, pagination.per_page());
        let range = pagination.range(total_items);

        let rows = if loading {
            Vec::new()
        } else {
            filtered[range.clone()]
                .iter()
                .zip(range)
                .map(|(p, index)| ViewRow {
                    id: self.row_key(index, &p.row),
                    cells: self
                        .config
                        .columns
                        .iter()
                        .map(|c| c.cell(&p.row, &p.fields))
                        .collect(),
                })
                .collect()
        };

        TableView {
            headers,
            rows,
            loading,
            page: pagination.page(),
            total_pages: pages,
            total_items,
            window: page_window(pagination.page(), pages),
            can_prev: pagination.can_prev(),
            can_next: pagination.can_next(total_items),
            search: guard.search.clone(),
            filters: guard
                .filters
                .options()
                .iter()
                .map(|o| (o.id.clone(), o.label.clone()))
                .collect(),
            selected_filter: guard.filters.selected().id.clone(),
        }
    }

    /// Check if the table changed since the last [`clear_dirty`](Self::clear_dirty).
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    pub fn clear_dirty(&self) {
        self.dirty.store(false, Ordering::SeqCst);
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    fn mark_dirty(&self) {
        self.dirty.store(true, Ordering::SeqCst);
    }

    fn filtered<'a>(&self, guard: &'a TableInner<T>) -> Vec<&'a Projected<T>> {
        filter_rows(
            &guard.rows,
            &self.config.searchable,
            &guard.search,
            &guard.filters,
            |p| &p.row,
        )
    }

    fn filtered_len(&self, guard: &TableInner<T>) -> usize {
        self.filtered(guard).len()
    }

    /// The stored pagination, clamped to the current filtered size.
    fn effective_pagination(guard: &TableInner<T>, total_items: usize) -> Pagination {
        let mut pagination = guard.pagination;
        pagination.clamp(total_items);
        pagination
    }

    fn row_key(&self, index: usize, row: &T) -> String {
        match &self.config.row_id {
            Some(row_id) => row_id(row),
            None => index.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::AtomicUsize;

    use serde::Deserialize;
    use tokio::sync::Notify;

    use super::*;
    use crate::pagination::PageMarker;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Persona {
        id: i64,
        name: String,
        activo: bool,
    }

    fn persona(id: i64, name: &str) -> Persona {
        Persona {
            id,
            name: name.to_string(),
            activo: id % 2 == 1,
        }
    }

    fn columns() -> Vec<Column<Persona>> {
        vec![Column::new("id", "Id"), Column::new("name", "Nombre")]
    }

    /// Table over a shared row list, counting fetches.
    fn table_over(rows: Arc<Mutex<Vec<Persona>>>, fetches: Arc<AtomicUsize>) -> TableBuilder<Persona> {
        DataTable::builder(columns(), move |_cancel| {
            let rows = rows.clone();
            let fetches = fetches.clone();
            async move {
                fetches.fetch_add(1, Ordering::SeqCst);
                Ok(rows.lock().unwrap().clone())
            }
        })
        .searchable(["name"])
        .row_id(|p: &Persona| p.id.to_string())
    }

    #[tokio::test]
    async fn test_search_filters_rows() {
        let rows = Arc::new(Mutex::new(vec![persona(1, "Ana"), persona(2, "Beto")]));
        let table = table_over(rows, Arc::new(AtomicUsize::new(0))).build();

        assert_eq!(table.mount().await, LoadOutcome::Loaded(2));
        table.set_search("an");

        let view = table.view();
        assert_eq!(view.total_items, 1);
        assert_eq!(
            view.rows,
            vec![ViewRow {
                id: "1".to_string(),
                cells: vec!["1".to_string(), "Ana".to_string()],
            }]
        );
        assert_eq!(table.page_rows(), vec![persona(1, "Ana")]);
    }

    #[tokio::test]
    async fn test_pagination_stops_at_last_page() {
        let rows: Vec<_> = (1..=23).map(|i| persona(i, &format!("P{i}"))).collect();
        let table = table_over(Arc::new(Mutex::new(rows)), Arc::new(AtomicUsize::new(0)))
            .per_page(10)
            .build();
        table.mount().await;

        let view = table.view();
        assert_eq!(view.total_pages, 3);
        assert_eq!(view.window, vec![PageMarker::Page(1), PageMarker::Page(2), PageMarker::Page(3)]);
        assert!(!view.can_prev);

        assert!(table.next_page());
        assert!(table.next_page());
        assert!(!table.next_page());
        assert!(!table.go_to_page(4));

        let view = table.view();
        assert_eq!(view.page, 3);
        assert!(!view.can_next);
        assert_eq!(view.rows.len(), 3);
    }

    #[tokio::test]
    async fn test_search_and_filter_reset_page() {
        let rows: Vec<_> = (1..=30).map(|i| persona(i, &format!("P{i}"))).collect();
        let table = table_over(Arc::new(Mutex::new(rows)), Arc::new(AtomicUsize::new(0)))
            .filters(vec![
                FilterOption::new("activos", "Activos").predicate(|p: &Persona| p.activo),
            ])
            .build();
        table.mount().await;

        table.go_to_page(3);
        table.set_search("p");
        assert_eq!(table.page(), 1);

        table.go_to_page(2);
        assert!(table.select_filter("activos"));
        assert_eq!(table.page(), 1);
        assert_eq!(table.view().total_items, 15);
        assert_eq!(table.view().selected_filter, "activos");
        assert!(!table.select_filter("nope"));
    }

    #[tokio::test]
    async fn test_page_is_clamped_when_rows_shrink() {
        let rows = Arc::new(Mutex::new((1..=25).map(|i| persona(i, "X")).collect::<Vec<_>>()));
        let table = table_over(rows.clone(), Arc::new(AtomicUsize::new(0))).build();
        table.mount().await;
        table.go_to_page(3);

        rows.lock().unwrap().truncate(12);
        table.load().await;

        let view = table.view();
        assert_eq!(view.page, 2);
        assert_eq!(view.rows.len(), 2);
    }

    #[tokio::test]
    async fn test_refused_delete_keeps_rows() {
        let rows = Arc::new(Mutex::new(vec![persona(1, "Ana"), persona(2, "Beto")]));
        let fetches = Arc::new(AtomicUsize::new(0));
        let table = table_over(rows, fetches.clone())
            .on_delete(|_row| async { Ok(false) })
            .build();
        table.mount().await;

        assert!(!table.delete(persona(2, "Beto")).await);

        assert_eq!(fetches.load(Ordering::SeqCst), 1);
        assert_eq!(table.view().rows.len(), 2);
    }

    #[tokio::test]
    async fn test_failed_delete_keeps_rows() {
        let rows = Arc::new(Mutex::new(vec![persona(1, "Ana")]));
        let fetches = Arc::new(AtomicUsize::new(0));
        let table = table_over(rows, fetches.clone())
            .on_delete(|_row| async { Err::<bool, BoxError>("sin conexión".into()) })
            .build();
        table.mount().await;

        assert!(!table.delete(persona(1, "Ana")).await);
        assert_eq!(fetches.load(Ordering::SeqCst), 1);
        assert_eq!(table.rows().len(), 1);
    }

    #[tokio::test]
    async fn test_confirmed_delete_refetches() {
        let rows = Arc::new(Mutex::new(vec![persona(1, "Ana"), persona(2, "Beto")]));
        let fetches = Arc::new(AtomicUsize::new(0));
        let backend = rows.clone();
        let table = table_over(rows, fetches.clone())
            .on_delete(move |row: Persona| {
                let backend = backend.clone();
                async move {
                    backend.lock().unwrap().retain(|p| p.id != row.id);
                    Ok(true)
                }
            })
            .build();
        table.mount().await;

        let row = table.find("2").unwrap();
        assert!(table.delete(row).await);

        assert_eq!(fetches.load(Ordering::SeqCst), 2);
        assert_eq!(table.rows(), vec![persona(1, "Ana")]);
    }

    #[tokio::test]
    async fn test_fetch_failure_degrades_to_empty() {
        let table = DataTable::builder(columns(), |_cancel| async {
            Err::<Vec<Persona>, BoxError>("500".into())
        })
        .build();

        assert_eq!(table.mount().await, LoadOutcome::Failed);
        assert_eq!(table.phase(), Phase::Ready);
        let view = table.view();
        assert!(view.is_empty());
        assert!(view.window.is_empty());
    }

    #[tokio::test]
    async fn test_edit_fires_callback_only() {
        let edited = Arc::new(Mutex::new(None));
        let sink = edited.clone();
        let table = table_over(
            Arc::new(Mutex::new(vec![persona(1, "Ana")])),
            Arc::new(AtomicUsize::new(0)),
        )
        .on_edit(move |row: &Persona| *sink.lock().unwrap() = Some(row.id))
        .build();
        table.mount().await;

        assert!(table.edit(&persona(1, "Ana")));
        assert_eq!(*edited.lock().unwrap(), Some(1));
        assert_eq!(table.rows().len(), 1);
    }

    #[tokio::test]
    async fn test_refresh_token_reloads_only_on_change() {
        let fetches = Arc::new(AtomicUsize::new(0));
        let table = table_over(Arc::new(Mutex::new(vec![])), fetches.clone())
            .refresh_token(1)
            .build();
        table.mount().await;

        assert_eq!(table.set_refresh_token(1).await, None);
        assert_eq!(table.set_refresh_token(2).await, Some(LoadOutcome::Loaded(0)));
        assert_eq!(fetches.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_positional_ids_without_row_id() {
        let table = DataTable::builder(columns(), |_cancel| async {
            Ok::<_, BoxError>(vec![persona(5, "Eva"), persona(6, "Fer")])
        })
        .build();
        table.mount().await;

        let ids: Vec<_> = table.view().rows.into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["0", "1"]);
    }

    #[tokio::test]
    async fn test_stale_response_is_discarded() {
        let gate = Arc::new(Notify::new());
        let calls = Arc::new(AtomicUsize::new(0));
        let fetch_gate = gate.clone();
        let table = DataTable::builder(columns(), move |_cancel| {
            let gate = fetch_gate.clone();
            let call = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if call == 0 {
                    gate.notified().await;
                    Ok::<_, BoxError>(vec![persona(1, "Vieja")])
                } else {
                    Ok(vec![persona(2, "Nueva")])
                }
            }
        })
        .build();

        let (first, second) = tokio::join!(table.load(), async {
            tokio::task::yield_now().await;
            let outcome = table.load().await;
            gate.notify_one();
            outcome
        });

        assert_eq!(first, LoadOutcome::Discarded);
        assert_eq!(second, LoadOutcome::Loaded(1));
        assert_eq!(table.rows(), vec![persona(2, "Nueva")]);
    }

    #[tokio::test]
    async fn test_unmount_drops_late_response() {
        let gate = Arc::new(Notify::new());
        let fetch_gate = gate.clone();
        let table = DataTable::builder(columns(), move |_cancel| {
            let gate = fetch_gate.clone();
            async move {
                gate.notified().await;
                Ok::<_, BoxError>(vec![persona(1, "Ana")])
            }
        })
        .build();

        let (outcome, ()) = tokio::join!(table.mount(), async {
            tokio::task::yield_now().await;
            assert!(table.is_loading());
            assert!(table.view().loading);
            table.unmount();
            gate.notify_one();
        });

        assert_eq!(outcome, LoadOutcome::Discarded);
        assert!(!table.is_mounted());
        assert!(table.rows().is_empty());
        assert_eq!(table.phase(), Phase::Idle);
        assert!(!table.view().loading);
    }
}
