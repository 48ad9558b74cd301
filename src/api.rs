use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use crate::app_system::ApiConfig;
use crate::error::ApiError;
use crate::transport::{ApiRequest, HttpTransport, Method, Transport};

/// Pre-configured request issuer shared by every client and view.
///
/// Cloning is cheap: clones share the transport and the bearer token, so a
/// login through one clone authorizes all of them.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    token: Arc<RwLock<Option<String>>>,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            token: Arc::new(RwLock::new(None)),
        }
    }

    pub fn http(config: &ApiConfig) -> Result<Self, ApiError> {
        let transport = HttpTransport::new(
            &config.base_url,
            Duration::from_secs(config.timeout_secs),
        )?;
        Ok(Self::new(Arc::new(transport)))
    }

    pub async fn set_token(&self, token: Option<String>) {
        *self.token.write().await = token;
    }

    pub async fn token(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    #[instrument(skip(self))]
    pub async fn get<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        let body = self.execute(ApiRequest::new(Method::Get, path)).await?;
        decode(body)
    }

    #[instrument(skip(self, body))]
    pub async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let request = ApiRequest::new(Method::Post, path).with_body(encode(body)?);
        decode(self.execute(request).await?)
    }

    #[instrument(skip(self, body))]
    pub async fn put<B, R>(&self, path: &str, body: &B) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let request = ApiRequest::new(Method::Put, path).with_body(encode(body)?);
        decode(self.execute(request).await?)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.execute(ApiRequest::new(Method::Delete, path)).await?;
        Ok(())
    }

    /// POST with an explicit bearer token instead of the session one.
    #[instrument(skip(self, body, token))]
    pub async fn post_authorized<B, R>(&self, path: &str, body: &B, token: &str) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let request = ApiRequest::new(Method::Post, path)
            .with_body(encode(body)?)
            .with_bearer(token);
        decode(self.execute(request).await?)
    }

    async fn execute(&self, mut request: ApiRequest) -> Result<Value, ApiError> {
        if request.bearer.is_none() {
            request.bearer = self.token().await;
        }
        let path = request.path.clone();
        debug!(method = %request.method, path = %path, "Sending request");

        let response = self.transport.send(request).await?;
        if response.is_success() {
            return Ok(response.body);
        }

        warn!(status = response.status, path = %path, "Backend returned an error status");
        if response.status == 404 {
            Err(ApiError::NotFound(path))
        } else {
            Err(ApiError::Rejected {
                status: response.status,
                body: response.body,
            })
        }
    }
}

fn encode<B: Serialize + ?Sized>(body: &B) -> Result<Value, ApiError> {
    serde_json::to_value(body).map_err(|e| ApiError::Decode(e.to_string()))
}

fn decode<R: DeserializeOwned>(body: Value) -> Result<R, ApiError> {
    serde_json::from_value(body).map_err(|e| ApiError::Decode(e.to_string()))
}
