use std::fmt::Debug;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::api::ApiClient;
use crate::error::ApiError;
use crate::forms::{FieldErrors, FieldWidget, FormState, FormValues};
use crate::navigation::ResourceKind;
use crate::views::{Column, Mode};

// =============================================================================
// 1. THE ABSTRACTION
// =============================================================================

/// A record type served by a REST collection such as `/pedido/`.
pub trait Resource: Clone + Debug + Send + Sync + DeserializeOwned + 'static {
    /// Body sent on create and full update.
    type Payload: Serialize + Clone + Debug + Send + Sync;

    const KIND: ResourceKind;

    /// Collection segment on the backend, without slashes.
    const COLLECTION: &'static str;

    fn id(&self) -> i64;

    /// Table columns for the list view, in display order.
    fn columns() -> Vec<Column<Self>>;
}

/// User-facing strings of one resource's create/edit/delete screens.
///
/// `{name}` is replaced with the record's name-like field.
#[derive(Debug, Clone, Copy)]
pub struct Messages {
    pub created: &'static str,
    pub updated: &'static str,
    pub deleted: &'static str,
    pub create_failed: &'static str,
    pub update_failed: &'static str,
    pub delete_failed: &'static str,
    pub load_failed: &'static str,
    pub cancel_create: &'static str,
    pub cancel_edit: &'static str,
    pub confirm_delete: &'static str,
}

impl Messages {
    pub fn render(template: &str, name: &str) -> String {
        template.replace("{name}", name)
    }
}

/// A resource with a create/edit form.
pub trait FormModel: Resource {
    const MESSAGES: Messages;

    fn fields(mode: Mode) -> Vec<Box<dyn FieldWidget>>;

    /// Values of an empty create form.
    fn defaults() -> FormValues;

    /// Values of an edit form loaded from this record.
    fn values(&self) -> FormValues;

    /// Builds the write body. Required-field checks have already passed.
    fn payload(form: &FormState) -> Result<Self::Payload, FieldErrors>;

    /// The name-like field interpolated into success messages.
    fn display_name(payload: &Self::Payload) -> String;

    fn record_name(&self) -> String;
}

// =============================================================================
// 2. THE GENERIC CLIENT
// =============================================================================

pub fn collection_path<T: Resource>() -> String {
    format!("{}/", T::COLLECTION)
}

pub fn item_path<T: Resource>(id: i64) -> String {
    format!("{}/{}/", T::COLLECTION, id)
}

#[derive(Clone)]
pub struct ResourceClient<T: Resource> {
    api: ApiClient,
    _resource: PhantomData<fn() -> T>,
}

impl<T: Resource> ResourceClient<T> {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            _resource: PhantomData,
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    #[instrument(skip(self), fields(collection = T::COLLECTION))]
    pub async fn list(&self) -> Result<Vec<T>, ApiError> {
        debug!("Sending request");
        self.api.get(&collection_path::<T>()).await
    }

    #[instrument(skip(self), fields(collection = T::COLLECTION))]
    pub async fn get(&self, id: i64) -> Result<T, ApiError> {
        debug!("Sending request");
        self.api.get(&item_path::<T>(id)).await
    }

    #[instrument(skip(self, payload), fields(collection = T::COLLECTION))]
    pub async fn create(&self, payload: &T::Payload) -> Result<T, ApiError> {
        debug!("Sending request");
        self.api.post(&collection_path::<T>(), payload).await
    }

    #[instrument(skip(self, payload), fields(collection = T::COLLECTION))]
    pub async fn update(&self, id: i64, payload: &T::Payload) -> Result<T, ApiError> {
        debug!("Sending request");
        self.api.put(&item_path::<T>(id), payload).await
    }

    #[instrument(skip(self), fields(collection = T::COLLECTION))]
    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        debug!("Sending request");
        self.api.delete(&item_path::<T>(id)).await
    }
}
