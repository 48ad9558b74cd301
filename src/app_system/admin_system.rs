use std::sync::Arc;

use tokio::sync::oneshot;
use tokio::task::{JoinError, JoinHandle};
use tracing::{error, info};

use super::AppConfig;
use crate::api::ApiClient;
use crate::backend::MemoryBackend;
use crate::clients::{AuthClient, BrandClient, OrderClient, OrderLineClient, UserClient};
use crate::error::ApiError;
use crate::navigation::Navigator;
use crate::resource_framework::{FormModel, Resource, ResourceClient};
use crate::views::{DeleteView, EditView, ListView, Mode, OrderEditView};

/// The application system: one shared [`ApiClient`], the typed clients over
/// it, and the in-memory backend task when running without a server.
pub struct AdminSystem {
    pub config: AppConfig,
    pub api: ApiClient,
    pub user_client: UserClient,
    pub order_client: OrderClient,
    pub order_line_client: OrderLineClient,
    pub brand_client: BrandClient,
    pub auth_client: AuthClient,
    backend: Option<(oneshot::Sender<()>, JoinHandle<()>)>,
}

impl AdminSystem {
    /// Talks HTTP to `config.api.base_url`.
    pub async fn connect(config: AppConfig) -> Result<Self, ApiError> {
        info!(base_url = %config.api.base_url, "Connecting to backend");
        let api = ApiClient::http(&config.api)?;
        api.set_token(config.api.token.clone()).await;
        Ok(Self::wire(config, api, None))
    }

    /// Starts a seeded [`MemoryBackend`] and talks to it over a channel.
    pub fn in_memory(config: AppConfig) -> Self {
        let (backend, transport) = MemoryBackend::new(32);
        let (stop, shutdown) = oneshot::channel();
        let handle = tokio::spawn(backend.with_demo_data().run(shutdown));
        info!("Started in-memory backend");
        Self::wire(config, ApiClient::new(Arc::new(transport)), Some((stop, handle)))
    }

    fn wire(config: AppConfig, api: ApiClient, backend: Option<(oneshot::Sender<()>, JoinHandle<()>)>) -> Self {
        let user_client = UserClient::new(api.clone());
        let order_client = OrderClient::new(api.clone(), user_client.clone());
        Self {
            order_line_client: OrderLineClient::new(api.clone()),
            brand_client: BrandClient::new(api.clone()),
            auth_client: AuthClient::new(api.clone()),
            user_client,
            order_client,
            config,
            api,
            backend,
        }
    }

    pub fn resource<T: Resource>(&self) -> ResourceClient<T> {
        ResourceClient::new(self.api.clone())
    }

    pub async fn open_list<T: Resource>(&self, nav: &mut Navigator) -> ListView<T> {
        ListView::open(self.resource(), nav, &self.config.ui).await
    }

    pub async fn open_form<T: FormModel>(&self, mode: Mode) -> EditView<T> {
        match mode {
            Mode::Create => EditView::create(self.resource()),
            Mode::Edit(id) => EditView::open(self.resource(), id).await,
        }
    }

    pub async fn open_order_form(&self, mode: Mode) -> OrderEditView {
        OrderEditView::open(self.order_client.clone(), mode).await
    }

    pub async fn open_delete<T: FormModel>(&self, id: i64) -> DeleteView<T> {
        DeleteView::open(self.resource(), id).await
    }

    pub async fn shutdown(self) -> Result<(), JoinError> {
        info!("Shutting down system...");
        if let Some((stop, handle)) = self.backend {
            // The backend may already have stopped on its own.
            let _ = stop.send(());
            if let Err(e) = handle.await {
                error!(error = %e, "Backend task failed");
                return Err(e);
            }
        }
        info!("System shutdown complete.");
        Ok(())
    }
}
