use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::api::ApiClient;
use crate::error::{ApiError, AuthError};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

#[derive(Serialize)]
struct Credentials<'a> {
    username: &'a str,
    password: &'a str,
}

/// Client for `token/` and `create_super_user/`.
#[derive(Clone)]
pub struct AuthClient {
    api: ApiClient,
}

impl AuthClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Exchanges credentials for tokens and installs the access token, so
    /// every client sharing this [`ApiClient`] sends it from now on.
    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenPair, AuthError> {
        debug!("Sending request");
        let tokens: TokenPair = self
            .api
            .post("token/", &Credentials { username, password })
            .await
            .map_err(into_auth_error)?;
        self.api.set_token(Some(tokens.access.clone())).await;
        info!("Logged in");
        Ok(tokens)
    }

    pub async fn logout(&self) {
        self.api.set_token(None).await;
    }

    /// Creates a superuser, authorized with `token` rather than the session.
    #[instrument(skip(self, password, token))]
    pub async fn create_super_user(&self, username: &str, password: &str, token: &str) -> Result<(), AuthError> {
        debug!("Sending request");
        self.api
            .post_authorized::<_, Value>("create_super_user/", &Credentials { username, password }, token)
            .await
            .map_err(into_auth_error)?;
        info!("Superuser created");
        Ok(())
    }

    /// Same as [`AuthClient::create_super_user`] with the session token.
    pub async fn create_super_user_with_session(&self, username: &str, password: &str) -> Result<(), AuthError> {
        let token = self.api.token().await.ok_or(AuthError::MissingToken)?;
        self.create_super_user(username, password, &token).await
    }
}

/// Rejections carrying a `detail` become authentication errors.
fn into_auth_error(error: ApiError) -> AuthError {
    let detail = error
        .body()
        .and_then(|body| body.get("detail"))
        .and_then(Value::as_str)
        .map(str::to_string);
    match detail {
        Some(detail) => {
            warn!(detail = %detail, "Authentication rejected");
            AuthError::Authentication(detail)
        }
        None => AuthError::Api(error),
    }
}
