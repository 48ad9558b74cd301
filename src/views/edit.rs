use tracing::{error, info, instrument, warn};

use crate::error::{ApiError, FieldError};
use crate::forms::{validate_required, FieldValue, FieldWidget, FormState};
use crate::navigation::{GuardOutcome, Leave, NavigationGuard, Navigator, Route};
use crate::resource_framework::{FormModel, Messages, ResourceClient};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Create,
    Edit(i64),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Saved and redirected to the list.
    Saved,
    /// Field validation failed; nothing was sent.
    Invalid,
    /// The backend refused or could not be reached; the banner is set.
    Failed,
}

/// Create/edit screen for one record.
///
/// The view owns its [`NavigationGuard`]; dropping the view releases it.
pub struct EditView<T: FormModel> {
    client: ResourceClient<T>,
    mode: Mode,
    fields: Vec<Box<dyn FieldWidget>>,
    form: FormState,
    guard: NavigationGuard,
    error: Option<String>,
    load_error: Option<String>,
}

impl<T: FormModel> EditView<T> {
    pub fn create(client: ResourceClient<T>) -> Self {
        Self::with_mode(client, Mode::Create)
    }

    /// Edit view with empty fields; call [`EditView::load`] to fill them.
    pub fn edit(client: ResourceClient<T>, id: i64) -> Self {
        Self::with_mode(client, Mode::Edit(id))
    }

    /// Edit view loaded from the backend.
    pub async fn open(client: ResourceClient<T>, id: i64) -> Self {
        let mut view = Self::edit(client, id);
        // A failure is kept in `load_error` and already logged.
        let _ = view.load().await;
        view
    }

    fn with_mode(client: ResourceClient<T>, mode: Mode) -> Self {
        let prompt = match mode {
            Mode::Create => T::MESSAGES.cancel_create,
            Mode::Edit(_) => T::MESSAGES.cancel_edit,
        };
        Self {
            client,
            mode,
            fields: T::fields(mode),
            form: FormState::new(T::defaults()),
            guard: NavigationGuard::new(prompt),
            error: None,
            load_error: None,
        }
    }

    /// Fetches the record being edited. On failure the form keeps its
    /// defaults and a load notice is shown.
    #[instrument(skip(self), fields(collection = T::COLLECTION, mode = ?self.mode))]
    pub async fn load(&mut self) -> Result<(), ApiError> {
        let Mode::Edit(id) = self.mode else {
            return Ok(());
        };
        match self.client.get(id).await {
            Ok(record) => {
                info!(id, "Record loaded");
                self.form.reset(record.values());
                self.guard.sync(false);
                self.load_error = None;
                Ok(())
            }
            Err(e) => {
                error!(error = %e, id, "Error fetching record");
                self.load_error = Some(T::MESSAGES.load_failed.to_string());
                Err(e)
            }
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn fields(&self) -> &[Box<dyn FieldWidget>] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&dyn FieldWidget> {
        self.fields.iter().find(|f| f.name() == name).map(|f| f.as_ref())
    }

    /// Swaps the widget bound to the same field name, e.g. a select whose
    /// options arrived later.
    pub fn replace_field(&mut self, widget: Box<dyn FieldWidget>) {
        match self.fields.iter_mut().find(|f| f.name() == widget.name()) {
            Some(slot) => *slot = widget,
            None => self.fields.push(widget),
        }
    }

    pub fn guard(&self) -> &NavigationGuard {
        &self.guard
    }

    /// The submit failure banner.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    /// Routes raw input through the field's widget.
    pub fn change(&mut self, name: &str, input: &str) -> Result<(), FieldError> {
        let widget = self
            .fields
            .iter()
            .find(|f| f.name() == name)
            .ok_or_else(|| FieldError::UnknownField(name.to_string()))?;
        let result = widget.change(&mut self.form, input);
        self.guard.sync(self.form.is_dirty());
        result
    }

    /// Programmatic write, bypassing widget parsing.
    pub fn set_value(&mut self, name: &'static str, value: FieldValue) {
        self.form.set_value(name, value);
        self.guard.sync(self.form.is_dirty());
    }

    #[instrument(skip(self, nav), fields(collection = T::COLLECTION, mode = ?self.mode))]
    pub async fn submit(&mut self, nav: &mut Navigator) -> SubmitOutcome {
        let Some(payload) = self.validated_payload() else {
            return SubmitOutcome::Invalid;
        };
        let result = match self.mode {
            Mode::Create => self.client.create(&payload).await,
            Mode::Edit(id) => self.client.update(id, &payload).await,
        };
        self.finish_submit(nav, &payload, result)
    }

    /// Runs field validation and builds the payload. `None` means errors are
    /// now on the form and nothing should be sent.
    pub(crate) fn validated_payload(&mut self) -> Option<T::Payload> {
        self.form.clear_errors();
        let complete = validate_required(&self.fields, &mut self.form);
        if !complete || self.form.has_rejected_input() {
            warn!(
                errors = self.form.errors().len(),
                rejected = self.form.rejected().len(),
                "Validation failed"
            );
            return None;
        }
        match T::payload(&self.form) {
            Ok(payload) => Some(payload),
            Err(errors) => {
                warn!(errors = errors.len(), "Validation failed");
                self.form.set_errors(errors);
                None
            }
        }
    }

    /// Applies the backend's answer to a submitted payload.
    pub(crate) fn finish_submit(
        &mut self,
        nav: &mut Navigator,
        payload: &T::Payload,
        result: Result<T, ApiError>,
    ) -> SubmitOutcome {
        let (template, failure) = match self.mode {
            Mode::Create => (T::MESSAGES.created, T::MESSAGES.create_failed),
            Mode::Edit(_) => (T::MESSAGES.updated, T::MESSAGES.update_failed),
        };

        match result {
            Ok(saved) => {
                info!(id = saved.id(), "Record saved");
                self.error = None;
                self.form.commit();
                self.guard.sync(false);
                self.guard.disarm();
                let name = T::display_name(payload);
                nav.navigate_with_message(Route::List(T::KIND), Messages::render(template, &name));
                SubmitOutcome::Saved
            }
            Err(e) => {
                match e.body() {
                    Some(body) => error!(error = %e, response = %body, "Error saving record"),
                    None => error!(error = %e, "Error saving record"),
                }
                self.error = Some(failure.to_string());
                SubmitOutcome::Failed
            }
        }
    }

    /// The Cancel button: back to the list, through the guard.
    pub fn cancel(&mut self, nav: &mut Navigator) -> GuardOutcome {
        self.leave(nav, Leave::To(Route::List(T::KIND)))
    }

    pub fn leave(&mut self, nav: &mut Navigator, leave: Leave) -> GuardOutcome {
        self.guard.attempt(nav, leave)
    }

    /// Answers the open discard prompt.
    pub fn resolve(&mut self, nav: &mut Navigator, confirm: bool) -> GuardOutcome {
        self.guard.resolve(nav, confirm)
    }

    pub fn title(&self) -> String {
        let verb = match self.mode {
            Mode::Create => "Crear",
            Mode::Edit(_) => "Editar",
        };
        format!("{verb} · {}", T::KIND.title())
    }

    pub fn render(&self) -> String {
        let mut out = vec![self.title()];
        if let Some(notice) = &self.load_error {
            out.push(format!("⚠ {notice}"));
        }
        if let Some(error) = &self.error {
            out.push(format!("✖ {error}"));
        }
        out.extend(self.fields.iter().map(|field| field.render(&self.form)));
        out.join("\n")
    }
}
