use tracing::{error, info, instrument};

use crate::error::ApiError;
use crate::navigation::{Navigator, Route};
use crate::resource_framework::{FormModel, Messages, ResourceClient};

#[derive(Debug, Clone, PartialEq)]
pub enum DeleteOutcome {
    Deleted,
    /// The banner is set and the view stays.
    Failed,
}

/// Confirmation screen reached from a row's delete action.
pub struct DeleteView<T: FormModel> {
    client: ResourceClient<T>,
    id: i64,
    record: Option<T>,
    error: Option<String>,
}

impl<T: FormModel> DeleteView<T> {
    pub fn new(client: ResourceClient<T>, id: i64) -> Self {
        Self {
            client,
            id,
            record: None,
            error: None,
        }
    }

    pub async fn open(client: ResourceClient<T>, id: i64) -> Self {
        let mut view = Self::new(client, id);
        // Kept in `error` and already logged.
        let _ = view.load().await;
        view
    }

    #[instrument(skip(self), fields(collection = T::COLLECTION, id = self.id))]
    pub async fn load(&mut self) -> Result<(), ApiError> {
        match self.client.get(self.id).await {
            Ok(record) => {
                self.record = Some(record);
                self.error = None;
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Error fetching record");
                self.error = Some(T::MESSAGES.load_failed.to_string());
                Err(e)
            }
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn record(&self) -> Option<&T> {
        self.record.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The question shown before deleting.
    pub fn prompt(&self) -> String {
        let name = match &self.record {
            Some(record) => record.record_name(),
            None => format!("#{}", self.id),
        };
        Messages::render(T::MESSAGES.confirm_delete, &name)
    }

    #[instrument(skip(self, nav), fields(collection = T::COLLECTION, id = self.id))]
    pub async fn confirm(&mut self, nav: &mut Navigator) -> DeleteOutcome {
        match self.client.delete(self.id).await {
            Ok(()) => {
                info!("Record deleted");
                let name = self
                    .record
                    .as_ref()
                    .map(T::record_name)
                    .unwrap_or_else(|| format!("#{}", self.id));
                nav.navigate_with_message(Route::List(T::KIND), Messages::render(T::MESSAGES.deleted, &name));
                DeleteOutcome::Deleted
            }
            Err(e) => {
                match e.body() {
                    Some(body) => error!(error = %e, response = %body, "Error deleting record"),
                    None => error!(error = %e, "Error deleting record"),
                }
                self.error = Some(T::MESSAGES.delete_failed.to_string());
                DeleteOutcome::Failed
            }
        }
    }

    pub fn cancel(&self, nav: &mut Navigator) {
        nav.navigate(Route::List(T::KIND));
    }

    pub fn render(&self) -> String {
        let mut out = vec![format!("Eliminar · {}", T::KIND.title())];
        if let Some(error) = &self.error {
            out.push(format!("✖ {error}"));
        }
        out.push(self.prompt());
        out.join("\n")
    }
}
