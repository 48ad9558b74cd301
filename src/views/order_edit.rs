use tracing::{error, info, instrument, warn};

use super::{EditView, Mode, SubmitOutcome};
use crate::clients::OrderClient;
use crate::domain::{Order, User};
use crate::error::FieldError;
use crate::forms::{FieldValue, SelectField, SelectOption};
use crate::navigation::{GuardOutcome, Leave, Navigator};

/// Order create/edit screen.
///
/// Wraps the generic [`EditView`] and adds the user dropdown: picking a user
/// copies their contact details into the order fields. Saves go through
/// [`OrderClient`], so a new order's user is checked before the write.
pub struct OrderEditView {
    view: EditView<Order>,
    client: OrderClient,
    users: Vec<User>,
    users_error: Option<String>,
}

impl OrderEditView {
    pub fn new(client: OrderClient, mode: Mode) -> Self {
        let view = match mode {
            Mode::Create => EditView::create(client.resource()),
            Mode::Edit(id) => EditView::edit(client.resource(), id),
        };
        Self {
            view,
            client,
            users: Vec::new(),
            users_error: None,
        }
    }

    /// Builds the view and runs [`OrderEditView::load`].
    pub async fn open(client: OrderClient, mode: Mode) -> Self {
        let mut view = Self::new(client, mode);
        view.load().await;
        view
    }

    /// Fetches the user list and, when editing, the order, concurrently.
    /// Failures are logged and kept as notices.
    #[instrument(skip(self), fields(mode = ?self.view.mode()))]
    pub async fn load(&mut self) {
        let user_client = self.client.users().clone();
        let (users, order) = tokio::join!(user_client.list_users(), self.view.load());
        if order.is_ok() {
            info!("Order form ready");
        }
        match users {
            Ok(users) => self.set_users(users),
            Err(e) => {
                error!(error = %e, "Error fetching users");
                self.users_error = Some(format!("No se pudieron cargar los usuarios: {e}"));
            }
        }
    }

    /// Installs the dropdown options.
    pub fn set_users(&mut self, users: Vec<User>) {
        let options = users
            .iter()
            .map(|user| SelectOption::new(user.id, &user.name))
            .collect();
        self.view
            .replace_field(Box::new(SelectField::new("user_id", "Usuario").options(options)));
        self.users = users;
        self.users_error = None;
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn users_error(&self) -> Option<&str> {
        self.users_error.as_deref()
    }

    pub fn view(&self) -> &EditView<Order> {
        &self.view
    }

    /// Routes input like [`EditView::change`]; a new user selection also
    /// fills the contact fields.
    pub fn change(&mut self, name: &str, input: &str) -> Result<(), FieldError> {
        self.view.change(name, input)?;
        if name == "user_id" {
            if let Some(id) = self.view.form().choice("user_id") {
                self.fill_from_user(id);
            }
        }
        Ok(())
    }

    /// Selects a user by id.
    pub fn select_user(&mut self, id: i64) -> Result<(), FieldError> {
        self.change("user_id", &id.to_string())
    }

    fn fill_from_user(&mut self, id: i64) {
        let Some(user) = self.users.iter().find(|user| user.id == id).cloned() else {
            warn!(id, "Selected user is not loaded");
            return;
        };
        self.view.set_value("name", FieldValue::text(user.name));
        self.view.set_value("address", FieldValue::text(user.address));
        self.view.set_value("phone", FieldValue::text(user.phone));
        self.view.set_value("email", FieldValue::text(user.email));
    }

    #[instrument(skip(self, nav), fields(mode = ?self.view.mode()))]
    pub async fn submit(&mut self, nav: &mut Navigator) -> SubmitOutcome {
        let Some(payload) = self.view.validated_payload() else {
            return SubmitOutcome::Invalid;
        };
        let result = match self.view.mode() {
            Mode::Create => self.client.create_order(&payload).await,
            Mode::Edit(id) => self.client.update_order(id, &payload).await,
        };
        self.view.finish_submit(nav, &payload, result)
    }

    pub fn cancel(&mut self, nav: &mut Navigator) -> GuardOutcome {
        self.view.cancel(nav)
    }

    pub fn leave(&mut self, nav: &mut Navigator, leave: Leave) -> GuardOutcome {
        self.view.leave(nav, leave)
    }

    pub fn resolve(&mut self, nav: &mut Navigator, confirm: bool) -> GuardOutcome {
        self.view.resolve(nav, confirm)
    }

    pub fn render(&self) -> String {
        match &self.users_error {
            Some(notice) => format!("{}\n⚠ {notice}", self.view.render()),
            None => self.view.render(),
        }
    }
}
