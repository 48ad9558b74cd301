use tracing::{error, info, instrument};

use crate::api::ApiClient;
use crate::clients::UserClient;
use crate::domain::{Order, OrderPayload};
use crate::error::ApiError;
use crate::resource_framework::ResourceClient;

/// Client for the `pedido` collection.
///
/// Creating an order first checks that the referenced user exists, so a
/// stale dropdown fails before the write.
#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<Order>,
    user_client: UserClient,
}

impl_client_methods!(OrderClient, Order, order, orders);

impl OrderClient {
    pub fn new(api: ApiClient, user_client: UserClient) -> Self {
        Self {
            inner: ResourceClient::new(api),
            user_client,
        }
    }

    pub fn resource(&self) -> ResourceClient<Order> {
        self.inner.clone()
    }

    pub fn users(&self) -> &UserClient {
        &self.user_client
    }

    #[instrument(skip(self, payload), fields(user_id = payload.user_id))]
    pub async fn create_order(&self, payload: &OrderPayload) -> Result<Order, ApiError> {
        info!("Processing create_order request");

        match self.user_client.get_user(payload.user_id).await {
            Ok(user) => info!(user_name = %user.name, "User validation successful"),
            Err(e) => {
                error!(error = %e, "User validation failed");
                return Err(e);
            }
        }

        self.inner.create(payload).await
    }
}
