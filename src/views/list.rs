use tracing::{error, info, instrument};

use super::{Flash, Table};
use crate::app_system::UiConfig;
use crate::error::ApiError;
use crate::navigation::{Navigator, Route};
use crate::resource_framework::{Resource, ResourceClient};

pub const LOADING_PLACEHOLDER: &str = "Loading data...";

#[derive(Debug, Clone, PartialEq)]
pub enum ListState {
    Loading,
    Loaded,
    Failed(String),
}

/// The list screen of one collection.
pub struct ListView<T: Resource> {
    client: ResourceClient<T>,
    table: Table<T>,
    state: ListState,
    flash: Flash,
}

impl<T: Resource> ListView<T> {
    pub fn new(client: ResourceClient<T>, ui: &UiConfig) -> Self {
        Self {
            client,
            table: Table::new(ui.page_size),
            state: ListState::Loading,
            flash: Flash::new(ui.flash_duration()),
        }
    }

    /// Mounts and loads in one go. A failed fetch is kept in the state.
    pub async fn open(client: ResourceClient<T>, nav: &mut Navigator, ui: &UiConfig) -> Self {
        let mut view = Self::new(client, ui);
        view.mount(nav);
        // Failure is recorded in `state` and already logged.
        let _ = view.load().await;
        view
    }

    /// Picks up the message carried by the navigation that led here.
    pub fn mount(&mut self, nav: &mut Navigator) {
        if let Some(message) = nav.take_message() {
            info!(message = %message, "Showing navigation message");
            self.flash.show(message);
        }
    }

    /// Issues a single list fetch and replaces the dataset on success.
    #[instrument(skip(self), fields(collection = T::COLLECTION))]
    pub async fn load(&mut self) -> Result<usize, ApiError> {
        self.state = ListState::Loading;
        match self.client.list().await {
            Ok(items) => {
                let count = items.len();
                info!(count, "Loaded records");
                self.table.set_data(items);
                self.state = ListState::Loaded;
                Ok(count)
            }
            Err(e) => {
                error!(error = %e, "Error loading records");
                self.state = ListState::Failed(e.to_string());
                Err(e)
            }
        }
    }

    pub fn state(&self) -> &ListState {
        &self.state
    }

    pub fn table(&self) -> &Table<T> {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut Table<T> {
        &mut self.table
    }

    pub fn message(&mut self) -> Option<&str> {
        self.flash.current()
    }

    pub fn add(&self, nav: &mut Navigator) {
        nav.navigate(Route::Create(T::KIND));
    }

    /// Row action; false when no loaded row has this id.
    pub fn edit(&self, nav: &mut Navigator, id: i64) -> bool {
        self.follow(nav, id, Route::Edit(T::KIND, id))
    }

    /// Row action; false when no loaded row has this id.
    pub fn delete(&self, nav: &mut Navigator, id: i64) -> bool {
        self.follow(nav, id, Route::Delete(T::KIND, id))
    }

    pub fn render(&mut self) -> String {
        let mut out = vec![T::KIND.title().to_string()];
        if let Some(message) = self.flash.current() {
            out.push(format!("✔ {message}"));
        }
        match &self.state {
            ListState::Loading => out.push(LOADING_PLACEHOLDER.to_string()),
            ListState::Loaded => out.push(self.table.render()),
            ListState::Failed(reason) => out.push(format!("No se pudieron cargar los datos: {reason}")),
        }
        out.join("\n")
    }

    fn follow(&self, nav: &mut Navigator, id: i64, route: Route) -> bool {
        if self.table.data().iter().any(|item| item.id() == id) {
            nav.navigate(route);
            true
        } else {
            false
        }
    }
}
