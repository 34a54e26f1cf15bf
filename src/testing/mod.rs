use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::api::{ApiRequest, HttpClient, RawResponse, Transport};
use crate::error::ApiError;

/// Scripted transport for exercising clients and controllers without a network.
///
/// Responses are served in the order they were queued; every request is recorded
/// so tests can assert on what was (or was not) sent.
#[derive(Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    responses: VecDeque<Result<RawResponse, ApiError>>,
    requests: Vec<ApiRequest>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn client(&self) -> HttpClient {
        HttpClient::with_transport(Arc::new(self.clone()))
    }

    pub fn respond_json(&self, status: u16, body: Value) {
        self.push(Ok(RawResponse {
            status,
            content_type: Some("application/json".to_string()),
            body: serde_json::to_vec(&body).unwrap_or_default(),
        }));
    }

    pub fn respond_text(&self, status: u16, content_type: &str, body: &str) {
        self.push(Ok(RawResponse {
            status,
            content_type: Some(content_type.to_string()),
            body: body.as_bytes().to_vec(),
        }));
    }

    pub fn respond_empty(&self, status: u16) {
        self.push(Ok(RawResponse {
            status,
            content_type: None,
            body: Vec::new(),
        }));
    }

    pub fn fail_transport(&self, message: &str) {
        self.push(Err(ApiError::transport(message)));
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn request_count(&self) -> usize {
        self.state.lock().unwrap().requests.len()
    }

    fn push(&self, response: Result<RawResponse, ApiError>) {
        self.state.lock().unwrap().responses.push_back(response);
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn execute(&self, request: ApiRequest) -> Result<RawResponse, ApiError> {
        let mut state = self.state.lock().unwrap();
        let path = request.path.clone();
        state.requests.push(request);
        state
            .responses
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::transport(format!("no scripted response for {}", path))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::Method;

    #[tokio::test]
    async fn unscripted_request_is_a_transport_error() {
        let mock = MockTransport::new();
        let err = mock
            .execute(ApiRequest::new(Method::GET, "/users/"))
            .await
            .unwrap_err();
        assert!(err.message().contains("/users/"));
        assert_eq!(mock.request_count(), 1);
    }
}
