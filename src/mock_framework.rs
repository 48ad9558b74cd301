//! # Mock Framework
//!
//! Utilities for testing clients and views without a backend.
//!
//! Use [`create_mock_api`] to get an [`ApiClient`] and the receiver its
//! requests land on. Drive the code under test in a spawned task, then use
//! [`expect_get`], [`expect_post`], [`expect_put`] or [`expect_delete`] to
//! assert each request and [`respond`] to answer it.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::mpsc;

use crate::api::ApiClient;
use crate::transport::{ApiRequest, ApiResponse, ChannelTransport, Method, Responder, TransportRequest};

/// Creates an API client whose requests arrive on the returned receiver.
pub fn create_mock_api(buffer_size: usize) -> (ApiClient, mpsc::Receiver<TransportRequest>) {
    let (transport, receiver) = ChannelTransport::pair(buffer_size);
    (ApiClient::new(Arc::new(transport)), receiver)
}

/// Next request, whatever its method.
pub async fn expect_request(
    receiver: &mut mpsc::Receiver<TransportRequest>,
) -> Option<(ApiRequest, Responder)> {
    receiver
        .recv()
        .await
        .map(|TransportRequest { request, respond_to }| (request, respond_to))
}

async fn expect_method(
    receiver: &mut mpsc::Receiver<TransportRequest>,
    method: Method,
) -> Option<(ApiRequest, Responder)> {
    match expect_request(receiver).await {
        Some((request, respond_to)) if request.method == method => Some((request, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a GET request
pub async fn expect_get(
    receiver: &mut mpsc::Receiver<TransportRequest>,
) -> Option<(ApiRequest, Responder)> {
    expect_method(receiver, Method::Get).await
}

/// Helper to verify that the next message is a POST request
pub async fn expect_post(
    receiver: &mut mpsc::Receiver<TransportRequest>,
) -> Option<(ApiRequest, Responder)> {
    expect_method(receiver, Method::Post).await
}

/// Helper to verify that the next message is a PUT request
pub async fn expect_put(
    receiver: &mut mpsc::Receiver<TransportRequest>,
) -> Option<(ApiRequest, Responder)> {
    expect_method(receiver, Method::Put).await
}

/// Helper to verify that the next message is a DELETE request
pub async fn expect_delete(
    receiver: &mut mpsc::Receiver<TransportRequest>,
) -> Option<(ApiRequest, Responder)> {
    expect_method(receiver, Method::Delete).await
}

/// Answers a request with the given status and body.
pub fn respond(responder: Responder, status: u16, body: Value) {
    // The caller may have given up already; that is not the test's concern.
    let _ = responder.send(Ok(ApiResponse::new(status, body)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_mock_api() {
        let (api, mut receiver) = create_mock_api(10);

        let task = tokio::spawn(async move {
            api.post::<_, Value>("marca/", &json!({"nombre": "Acme"})).await
        });

        let (request, responder) = expect_post(&mut receiver).await.expect("Expected POST request");
        assert_eq!(request.body, Some(json!({"nombre": "Acme"})));
        respond(responder, 201, json!({"id": 1}));

        assert_eq!(task.await.unwrap(), Ok(json!({"id": 1})));
    }

    #[tokio::test]
    async fn expect_helpers_reject_other_methods() {
        let (api, mut receiver) = create_mock_api(10);
        tokio::spawn(async move { api.get::<Value>("marca/").await });

        assert!(expect_delete(&mut receiver).await.is_none());
    }
}
