//! Form state.

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use super::data::FormData;
use super::dismiss::{ClickTarget, DismissRegistry};
use super::error::FormError;
use super::field::{Field, FieldKind, FieldValue, SelectOption};
use super::layout::{FieldRow, layout};
use super::search_select::{DropdownOption, SearchState};
use super::validation::{ValidationErrors, validate_fields};
use crate::{BoxError, BoxFuture};

type SubmitFn = Arc<dyn Fn(FormData) -> BoxFuture<'static, Result<(), BoxError>> + Send + Sync>;
type ResetFn = Arc<dyn Fn() + Send + Sync>;

/// Lifecycle of one field between submits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldStatus {
    #[default]
    Pristine,
    Edited,
    Valid,
    Invalid,
}

/// How a call to [`Form::submit`] ended.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// A submit was already pending; nothing happened.
    Busy,
    /// Validation failed; the submit callback was not called.
    Invalid(ValidationErrors),
    /// The callback succeeded and the form went back to its defaults.
    Submitted,
    /// The callback failed; the entered values are kept.
    Failed(String),
}

/// Builder state: no submit callback yet.
pub struct Missing;

/// Builder state: submit callback provided.
pub struct Set(SubmitFn);

/// Builder for a [`Form`]. `build` is only available once `on_submit` is set.
pub struct FormBuilder<S> {
    fields: Vec<Field>,
    on_submit: S,
    on_reset: Option<ResetFn>,
}

impl FormBuilder<Missing> {
    pub fn on_submit<F, Fut>(self, f: F) -> FormBuilder<Set>
    where
        F: Fn(FormData) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), BoxError>> + Send + 'static,
    {
        FormBuilder {
            fields: self.fields,
            on_submit: Set(Arc::new(move |data| Box::pin(f(data)))),
            on_reset: self.on_reset,
        }
    }
}

impl<S> FormBuilder<S> {
    /// Called after an explicit [`Form::reset`].
    pub fn on_reset<F>(mut self, f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_reset = Some(Arc::new(f));
        self
    }
}

impl FormBuilder<Set> {
    pub fn build(self) -> Form {
        Form {
            callbacks: Arc::new(FormCallbacks {
                on_submit: self.on_submit.0,
                on_reset: self.on_reset,
            }),
            inner: Arc::new(RwLock::new(FormInner::new(self.fields))),
            dirty: Arc::new(AtomicBool::new(false)),
        }
    }
}

struct FormCallbacks {
    on_submit: SubmitFn,
    on_reset: Option<ResetFn>,
}

/// Internal state for a Form.
struct FormInner {
    fields: Vec<Field>,
    data: FormData,
    errors: ValidationErrors,
    status: HashMap<String, FieldStatus>,
    search: HashMap<String, SearchState>,
    /// Password fields currently shown in clear text.
    revealed: HashSet<String>,
    dismiss: DismissRegistry,
    submitting: bool,
}

impl FormInner {
    fn new(fields: Vec<Field>) -> Self {
        let mut inner = Self {
            fields: Vec::new(),
            data: FormData::default(),
            errors: ValidationErrors::default(),
            status: HashMap::new(),
            search: HashMap::new(),
            revealed: HashSet::new(),
            dismiss: DismissRegistry::new(),
            submitting: false,
        };
        inner.install(fields);
        inner
    }

    fn install(&mut self, fields: Vec<Field>) {
        self.dismiss.clear();
        for field in fields.iter().filter(|f| f.is_search_select()) {
            self.dismiss.register(&field.name);
        }
        self.fields = fields;
        self.clear();
    }

    /// Back to defaults with no transient UI state.
    fn clear(&mut self) {
        self.data = FormData::from_defaults(&self.fields);
        self.errors.clear();
        self.status.clear();
        self.search.clear();
        self.revealed.clear();
    }

    fn field(&self, name: &str) -> Result<&Field, FormError> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .ok_or_else(|| FormError::UnknownField(name.to_string()))
    }

    fn field_mut(&mut self, name: &str) -> Result<&mut Field, FormError> {
        self.fields
            .iter_mut()
            .find(|f| f.name == name)
            .ok_or_else(|| FormError::UnknownField(name.to_string()))
    }

    fn search_select(&self, name: &str) -> Result<&Field, FormError> {
        let field = self.field(name)?;
        match field.kind {
            FieldKind::SearchSelect { .. } => Ok(field),
            _ => Err(FormError::WrongKind {
                field: name.to_string(),
                expected: "search-select",
            }),
        }
    }

    fn edited(&mut self, name: &str) {
        self.errors.remove(name);
        self.status.insert(name.to_string(), FieldStatus::Edited);
    }

    fn validate(&mut self) -> ValidationErrors {
        let errors = validate_fields(&self.fields, &self.data);
        for field in &self.fields {
            let status = if errors.contains(&field.name) {
                FieldStatus::Invalid
            } else {
                FieldStatus::Valid
            };
            self.status.insert(field.name.clone(), status);
        }
        self.errors = errors.clone();
        errors
    }
}

/// A declarative form over a list of [`Field`]s.
///
/// `Form` is a handle; clones share state. Nothing is rendered here: callers
/// feed user input in and read values, errors, layout and dropdown contents
/// back out.
///
/// # Example
///
/// ```ignore
/// let form = Form::builder(vec![
///     Field::new("nombre", "Nombre", FieldKind::text()).required(),
///     Field::new("email", "Email", FieldKind::email()).rule(validators::email("Correo inválido")),
/// ])
/// .on_submit(|data| async move { save(data).await })
/// .build();
///
/// form.set_value("nombre", "Juan")?;
/// match form.submit().await {
///     SubmitOutcome::Submitted => println!("Guardado"),
///     SubmitOutcome::Invalid(errors) => show(errors),
///     _ => {}
/// }
/// ```
#[derive(Clone)]
pub struct Form {
    callbacks: Arc<FormCallbacks>,
    inner: Arc<RwLock<FormInner>>,
    dirty: Arc<AtomicBool>,
}

impl Form {
    pub fn builder(fields: Vec<Field>) -> FormBuilder<Missing> {
        FormBuilder {
            fields,
            on_submit: Missing,
            on_reset: None,
        }
    }

    // -------------------------------------------------------------------------
    // Fields & values
    // -------------------------------------------------------------------------

    pub fn fields(&self) -> Vec<Field> {
        self.inner.read().map(|g| g.fields.clone()).unwrap_or_default()
    }

    pub fn field(&self, name: &str) -> Option<Field> {
        self.inner.read().ok()?.field(name).ok().cloned()
    }

    /// Replaces the field list, rebuilding the data from the new defaults.
    ///
    /// Refused while a submit is pending; returns whether the fields changed.
    pub fn replace_fields(&self, fields: Vec<Field>) -> bool {
        let Ok(mut guard) = self.inner.write() else {
            return false;
        };
        if guard.submitting {
            return false;
        }
        guard.install(fields);
        self.mark_dirty();
        true
    }

    /// Snapshot of the current values.
    pub fn data(&self) -> FormData {
        self.inner.read().map(|g| g.data.clone()).unwrap_or_default()
    }

    pub fn value(&self, name: &str) -> Option<FieldValue> {
        self.inner.read().ok()?.data.get(name).cloned()
    }

    /// Sets a field's value, clearing its error.
    ///
    /// Returns `Ok(false)` for disabled fields, which ignore edits.
    pub fn set_value(&self, name: &str, value: impl Into<FieldValue>) -> Result<bool, FormError> {
        let mut guard = self.inner.write().map_err(|_| FormError::Poisoned)?;
        let field = guard.field(name)?;
        if field.disabled {
            return Ok(false);
        }
        let value = field.kind.coerce(value.into());
        guard.data.set(name, value);
        guard.edited(name);
        self.mark_dirty();
        Ok(true)
    }

    pub fn status(&self, name: &str) -> FieldStatus {
        self.inner
            .read()
            .ok()
            .and_then(|g| g.status.get(name).copied())
            .unwrap_or_default()
    }

    pub fn errors(&self) -> ValidationErrors {
        self.inner.read().map(|g| g.errors.clone()).unwrap_or_default()
    }

    pub fn error(&self, name: &str) -> Option<String> {
        self.inner.read().ok()?.errors.get(name).map(str::to_string)
    }

    /// Rows of field names for rendering.
    pub fn layout(&self) -> Vec<FieldRow> {
        self.inner.read().map(|g| layout(&g.fields)).unwrap_or_default()
    }

    // -------------------------------------------------------------------------
    // Password visibility
    // -------------------------------------------------------------------------

    /// Flips the show/hide flag of a password field. Returns the new state.
    pub fn toggle_password_visibility(&self, name: &str) -> Result<bool, FormError> {
        let mut guard = self.inner.write().map_err(|_| FormError::Poisoned)?;
        if !matches!(guard.field(name)?.kind, FieldKind::Password) {
            return Err(FormError::WrongKind {
                field: name.to_string(),
                expected: "password",
            });
        }
        let visible = if guard.revealed.remove(name) {
            false
        } else {
            guard.revealed.insert(name.to_string());
            true
        };
        self.mark_dirty();
        Ok(visible)
    }

    pub fn is_password_visible(&self, name: &str) -> bool {
        self.inner
            .read()
            .map(|g| g.revealed.contains(name))
            .unwrap_or(false)
    }

    // -------------------------------------------------------------------------
    // Search-select
    // -------------------------------------------------------------------------

    /// Feeds typed text into a search-select field.
    ///
    /// Clears the committed value, opens the dropdown and hands the text to
    /// the field's search callback. Results arrive via [`set_options`](Self::set_options).
    pub fn type_search(&self, name: &str, text: impl Into<String>) -> Result<(), FormError> {
        let text = text.into();
        let on_search = {
            let mut guard = self.inner.write().map_err(|_| FormError::Poisoned)?;
            let on_search = match &guard.search_select(name)?.kind {
                FieldKind::SearchSelect { on_search, .. } => on_search.clone(),
                _ => None,
            };
            guard.search.insert(
                name.to_string(),
                SearchState {
                    buffer: text.clone(),
                    open: true,
                },
            );
            guard.data.set(name, FieldValue::default());
            guard.edited(name);
            on_search
        };
        self.mark_dirty();

        if let Some(on_search) = on_search {
            on_search(text);
        }
        Ok(())
    }

    /// Delivers options to a search-select field.
    pub fn set_options(&self, name: &str, options: Vec<SelectOption>) -> Result<(), FormError> {
        let mut guard = self.inner.write().map_err(|_| FormError::Poisoned)?;
        guard.search_select(name)?;
        if let FieldKind::SearchSelect { options: current, .. } = &mut guard.field_mut(name)?.kind {
            *current = options;
        }
        self.mark_dirty();
        Ok(())
    }

    /// Current free-text buffer of a search-select field.
    pub fn search_text(&self, name: &str) -> String {
        self.inner
            .read()
            .ok()
            .and_then(|g| g.search.get(name).map(|s| s.buffer.clone()))
            .unwrap_or_default()
    }

    pub fn is_dropdown_open(&self, name: &str) -> bool {
        self.inner
            .read()
            .ok()
            .and_then(|g| g.search.get(name).map(|s| s.open))
            .unwrap_or(false)
    }

    /// Options of an open dropdown, highlighted against the buffer.
    /// Empty while the dropdown is closed.
    pub fn dropdown(&self, name: &str) -> Vec<DropdownOption> {
        let Ok(guard) = self.inner.read() else {
            return Vec::new();
        };
        let Some(state) = guard.search.get(name).filter(|s| s.open) else {
            return Vec::new();
        };
        match guard.search_select(name) {
            Ok(field) => field
                .kind
                .options()
                .iter()
                .map(|o| DropdownOption::new(o, &state.buffer))
                .collect(),
            Err(_) => Vec::new(),
        }
    }

    /// Commits an option: its value goes into the data, its label into the
    /// buffer, and the dropdown closes.
    ///
    /// Returns `Ok(false)` if `value` is not among the field's options.
    pub fn select_option(&self, name: &str, value: &str) -> Result<bool, FormError> {
        let mut guard = self.inner.write().map_err(|_| FormError::Poisoned)?;
        let Some(option) = guard
            .search_select(name)?
            .kind
            .options()
            .iter()
            .find(|o| o.value == value)
            .cloned()
        else {
            return Ok(false);
        };
        guard.search.insert(
            name.to_string(),
            SearchState {
                buffer: option.label,
                open: false,
            },
        );
        guard.data.set(name, FieldValue::Text(option.value));
        guard.edited(name);
        self.mark_dirty();
        Ok(true)
    }

    // -------------------------------------------------------------------------
    // Outside-click dismissal
    // -------------------------------------------------------------------------

    /// Attaches the form's click listener.
    pub fn mount(&self) {
        if let Ok(mut guard) = self.inner.write() {
            guard.dismiss.attach();
        }
    }

    /// Detaches the form's click listener.
    pub fn unmount(&self) {
        if let Ok(mut guard) = self.inner.write() {
            guard.dismiss.detach();
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.inner
            .read()
            .map(|g| g.dismiss.is_attached())
            .unwrap_or(false)
    }

    /// Closes every open dropdown outside `target`.
    pub fn click(&self, target: ClickTarget) {
        let Ok(mut guard) = self.inner.write() else {
            return;
        };
        let mut closed = false;
        for name in guard.dismiss.dismissed(&target) {
            if let Some(state) = guard.search.get_mut(&name).filter(|s| s.open) {
                state.open = false;
                closed = true;
            }
        }
        if closed {
            self.mark_dirty();
        }
    }

    // -------------------------------------------------------------------------
    // Validation, submit & reset
    // -------------------------------------------------------------------------

    /// Validates every field, replacing the error map.
    pub fn validate(&self) -> ValidationErrors {
        let errors = self
            .inner
            .write()
            .map(|mut g| g.validate())
            .unwrap_or_default();
        self.mark_dirty();
        errors
    }

    pub fn is_submitting(&self) -> bool {
        self.inner.read().map(|g| g.submitting).unwrap_or(false)
    }

    /// Validates and, if clean, hands a snapshot of the data to the submit
    /// callback.
    ///
    /// On success the form returns to its defaults. On failure the entered
    /// values stay so the user can retry.
    pub async fn submit(&self) -> SubmitOutcome {
        let data = {
            let Ok(mut guard) = self.inner.write() else {
                return SubmitOutcome::Busy;
            };
            if guard.submitting {
                return SubmitOutcome::Busy;
            }
            let errors = guard.validate();
            if !errors.is_empty() {
                log::debug!("Form invalid: {} field(s)", errors.len());
                self.mark_dirty();
                return SubmitOutcome::Invalid(errors);
            }
            guard.submitting = true;
            guard.data.clone()
        };
        self.mark_dirty();

        let result = (self.callbacks.on_submit)(data).await;

        let Ok(mut guard) = self.inner.write() else {
            return SubmitOutcome::Failed("form state unavailable".to_string());
        };
        guard.submitting = false;
        let outcome = match result {
            Ok(()) => {
                guard.clear();
                SubmitOutcome::Submitted
            }
            Err(e) => {
                log::warn!("Form submit rejected: {}", e);
                SubmitOutcome::Failed(e.to_string())
            }
        };
        drop(guard);
        self.mark_dirty();
        outcome
    }

    /// Returns every field to its default and clears transient state, then
    /// calls the reset callback.
    ///
    /// Refused while a submit is pending so a rejected submit still finds the
    /// entered values. Returns whether the form was reset.
    pub fn reset(&self) -> bool {
        {
            let Ok(mut guard) = self.inner.write() else {
                return false;
            };
            if guard.submitting {
                log::debug!("Reset ignored while submitting");
                return false;
            }
            guard.clear();
        }
        self.mark_dirty();
        if let Some(on_reset) = &self.callbacks.on_reset {
            on_reset();
        }
        true
    }

    // -------------------------------------------------------------------------
    // Dirty tracking
    // -------------------------------------------------------------------------

    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    pub fn clear_dirty(&self) {
        self.dirty.store(false, Ordering::SeqCst);
    }

    fn mark_dirty(&self) {
        self.dirty.store(true, Ordering::SeqCst);
    }
}

impl std::fmt::Debug for Form {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Form")
            .field("fields", &self.fields().len())
            .field("submitting", &self.is_submitting())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::AtomicUsize;

    use tokio::sync::Notify;

    use super::*;
    use crate::form::search_select::Segment;

    fn cuenta_fields() -> Vec<Field> {
        vec![
            Field::new("nombre", "Nombre", FieldKind::text()).required(),
            Field::new("tarifa", "Tarifa", FieldKind::text()).default_value("domestica"),
            Field::new("cobrador_id", "Cobrador", FieldKind::search_select(|_| {})),
        ]
    }

    fn form_with(fields: Vec<Field>) -> Form {
        Form::builder(fields).on_submit(|_| async { Ok::<(), BoxError>(()) }).build()
    }

    #[tokio::test]
    async fn test_blank_required_blocks_submit() {
        let submitted = Arc::new(AtomicUsize::new(0));
        let count = submitted.clone();
        let form = Form::builder(cuenta_fields())
            .on_submit(move |_| {
                count.fetch_add(1, Ordering::SeqCst);
                async { Ok::<(), BoxError>(()) }
            })
            .build();

        form.set_value("nombre", "   ").unwrap();
        let outcome = form.submit().await;

        let SubmitOutcome::Invalid(errors) = outcome else {
            panic!("expected invalid, got {:?}", outcome);
        };
        assert_eq!(errors.get("nombre"), Some("El nombre es requerido"));
        assert_eq!(form.status("nombre"), FieldStatus::Invalid);
        assert_eq!(form.status("tarifa"), FieldStatus::Valid);
        assert_eq!(submitted.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_edit_clears_only_that_error() {
        let form = form_with(vec![
            Field::new("nombre", "Nombre", FieldKind::text()).required(),
            Field::new("direccion", "Dirección", FieldKind::text()).required(),
        ]);
        form.submit().await;
        assert_eq!(form.errors().len(), 2);

        form.set_value("nombre", "Ana").unwrap();

        assert_eq!(form.error("nombre"), None);
        assert_eq!(form.error("direccion").as_deref(), Some("El dirección es requerido"));
        assert_eq!(form.status("nombre"), FieldStatus::Edited);
    }

    #[test]
    fn test_search_select_highlight_and_commit() {
        let searches = Arc::new(Mutex::new(Vec::new()));
        let sink = searches.clone();
        let form = form_with(vec![Field::new(
            "cobrador_id",
            "Cobrador",
            FieldKind::search_select(move |text| sink.lock().unwrap().push(text)),
        )]);
        form.set_options("cobrador_id", vec![SelectOption::new("1", "Juan Pérez")])
            .unwrap();

        form.type_search("cobrador_id", "juan").unwrap();
        assert_eq!(*searches.lock().unwrap(), vec!["juan".to_string()]);
        assert!(form.is_dropdown_open("cobrador_id"));

        let options = form.dropdown("cobrador_id");
        assert_eq!(options.len(), 1);
        assert_eq!(
            options[0].segments,
            vec![
                Segment { text: "Juan".into(), highlighted: true },
                Segment { text: " Pérez".into(), highlighted: false },
            ]
        );

        assert!(form.select_option("cobrador_id", "1").unwrap());
        assert_eq!(form.value("cobrador_id"), Some(FieldValue::from("1")));
        assert_eq!(form.search_text("cobrador_id"), "Juan Pérez");
        assert!(!form.is_dropdown_open("cobrador_id"));
        assert!(form.dropdown("cobrador_id").is_empty());
    }

    #[test]
    fn test_typing_clears_committed_value() {
        let form = form_with(cuenta_fields());
        form.set_options("cobrador_id", vec![SelectOption::new("7", "Rosa")])
            .unwrap();
        form.select_option("cobrador_id", "7").unwrap();

        form.type_search("cobrador_id", "ro").unwrap();

        assert_eq!(form.value("cobrador_id"), Some(FieldValue::default()));
        assert!(!form.select_option("cobrador_id", "99").unwrap());
    }

    #[test]
    fn test_kind_mismatch_is_an_error() {
        let form = form_with(cuenta_fields());
        assert_eq!(
            form.type_search("nombre", "x"),
            Err(FormError::WrongKind {
                field: "nombre".into(),
                expected: "search-select",
            })
        );
        assert_eq!(
            form.set_value("nope", "x"),
            Err(FormError::UnknownField("nope".into()))
        );
    }

    #[test]
    fn test_outside_click_needs_mount() {
        let form = form_with(cuenta_fields());
        form.type_search("cobrador_id", "ju").unwrap();

        form.click(ClickTarget::Outside);
        assert!(form.is_dropdown_open("cobrador_id"));

        form.mount();
        form.click(ClickTarget::Field("cobrador_id".into()));
        assert!(form.is_dropdown_open("cobrador_id"));
        form.click(ClickTarget::Outside);
        assert!(!form.is_dropdown_open("cobrador_id"));

        form.unmount();
        assert!(!form.is_mounted());
    }

    #[test]
    fn test_password_visibility_is_per_field() {
        let form = form_with(vec![
            Field::new("password", "Contraseña", FieldKind::Password),
            Field::new("confirmar", "Confirmar", FieldKind::Password),
        ]);

        assert!(form.toggle_password_visibility("password").unwrap());
        assert!(form.is_password_visible("password"));
        assert!(!form.is_password_visible("confirmar"));
        assert!(!form.toggle_password_visibility("password").unwrap());
    }

    #[test]
    fn test_disabled_fields_ignore_edits() {
        let form = form_with(vec![
            Field::new("numero_cuenta", "Cuenta", FieldKind::text())
                .default_value("A-001")
                .disabled(),
        ]);
        assert!(!form.set_value("numero_cuenta", "B-002").unwrap());
        assert_eq!(form.data().text("numero_cuenta"), "A-001");
    }

    #[tokio::test]
    async fn test_successful_submit_restores_defaults() {
        let received = Arc::new(Mutex::new(None));
        let sink = received.clone();
        let form = Form::builder(cuenta_fields())
            .on_submit(move |data| {
                *sink.lock().unwrap() = Some(data);
                async { Ok::<(), BoxError>(()) }
            })
            .build();
        form.set_value("nombre", "Ana").unwrap();
        form.set_value("tarifa", "comercial").unwrap();
        form.type_search("cobrador_id", "ju").unwrap();

        assert_eq!(form.submit().await, SubmitOutcome::Submitted);

        let sent = received.lock().unwrap().clone().unwrap();
        assert_eq!(sent.text("nombre"), "Ana");
        assert_eq!(sent.text("tarifa"), "comercial");
        assert_eq!(form.data(), FormData::from_defaults(&cuenta_fields()));
        assert_eq!(form.data().text("tarifa"), "domestica");
        assert_eq!(form.search_text("cobrador_id"), "");
        assert_eq!(form.status("nombre"), FieldStatus::Pristine);
    }

    #[tokio::test]
    async fn test_rejected_submit_keeps_input() {
        let form = Form::builder(cuenta_fields())
            .on_submit(|_| async { Err::<(), BoxError>("cuenta duplicada".into()) })
            .build();
        form.set_value("nombre", "Ana").unwrap();

        assert_eq!(
            form.submit().await,
            SubmitOutcome::Failed("cuenta duplicada".into())
        );
        assert_eq!(form.data().text("nombre"), "Ana");
        assert!(!form.is_submitting());
    }

    #[tokio::test]
    async fn test_second_submit_while_pending_is_busy() {
        let gate = Arc::new(Notify::new());
        let wait = gate.clone();
        let form = Form::builder(vec![Field::new("nombre", "Nombre", FieldKind::text())])
            .on_submit(move |_| {
                let wait = wait.clone();
                async move {
                    wait.notified().await;
                    Ok(())
                }
            })
            .build();

        let (first, second) = tokio::join!(form.submit(), async {
            tokio::task::yield_now().await;
            assert!(form.is_submitting());
            let outcome = form.submit().await;
            gate.notify_one();
            outcome
        });

        assert_eq!(first, SubmitOutcome::Submitted);
        assert_eq!(second, SubmitOutcome::Busy);
    }

    #[test]
    fn test_reset_is_idempotent_and_notifies() {
        let resets = Arc::new(AtomicUsize::new(0));
        let count = resets.clone();
        let form = Form::builder(cuenta_fields())
            .on_submit(|_| async { Ok::<(), BoxError>(()) })
            .on_reset(move || {
                count.fetch_add(1, Ordering::SeqCst);
            })
            .build();
        form.set_value("tarifa", "industrial").unwrap();
        form.validate();

        assert!(form.reset());
        let once = form.data();
        assert!(form.reset());

        assert_eq!(form.data(), once);
        assert_eq!(once.text("tarifa"), "domestica");
        assert!(form.errors().is_empty());
        assert_eq!(resets.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_replace_fields_rebuilds_data() {
        let form = form_with(cuenta_fields());
        form.set_value("nombre", "Ana").unwrap();

        assert!(form.replace_fields(vec![
            Field::new("monto", "Monto", FieldKind::number()).default_value(0.0),
        ]));

        assert_eq!(form.data().len(), 1);
        assert_eq!(form.value("monto"), Some(FieldValue::Number(0.0)));
        assert_eq!(form.value("nombre"), None);
        assert_eq!(form.layout(), vec![FieldRow::Single("monto".into())]);
    }

    #[tokio::test]
    async fn test_reset_waits_out_pending_submit() {
        let gate = Arc::new(Notify::new());
        let wait = gate.clone();
        let resets = Arc::new(AtomicUsize::new(0));
        let count = resets.clone();
        let form = Form::builder(vec![Field::new("nombre", "Nombre", FieldKind::text())])
            .on_submit(move |_| {
                let wait = wait.clone();
                async move {
                    wait.notified().await;
                    Err::<(), BoxError>("sin conexión".into())
                }
            })
            .on_reset(move || {
                count.fetch_add(1, Ordering::SeqCst);
            })
            .build();
        form.set_value("nombre", "Ana").unwrap();

        let (outcome, ()) = tokio::join!(form.submit(), async {
            tokio::task::yield_now().await;
            assert!(form.is_submitting());
            assert!(!form.reset());
            assert!(!form.replace_fields(Vec::new()));
            assert_eq!(form.data().text("nombre"), "Ana");
            gate.notify_one();
        });

        assert_eq!(outcome, SubmitOutcome::Failed("sin conexión".into()));
        assert_eq!(form.data().text("nombre"), "Ana");
        assert_eq!(form.fields().len(), 1);
        assert_eq!(resets.load(Ordering::SeqCst), 0);
    }
}
