use std::sync::Arc;

use reqwest::Method;
use serde::{de::DeserializeOwned, Serialize};

use super::transport::{ApiRequest, FormPayload, RawResponse, ReqwestTransport, RequestBody, Transport};
use crate::error::ApiError;

/// Typed client for the admin API.
///
/// Every call is a single attempt. Non-2xx responses and transport failures
/// both surface as [`ApiError`]; nothing is retried.
#[derive(Clone)]
pub struct HttpClient {
    transport: Arc<dyn Transport>,
}

impl HttpClient {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self::with_transport(Arc::new(ReqwestTransport::new(api_url)))
    }

    /// Client for the API configured for this process
    pub fn from_config() -> Self {
        Self::new(crate::config::config().api.api_url())
    }

    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        self.send(ApiRequest::new(Method::GET, endpoint)).await
    }

    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: Vec<(String, String)>,
    ) -> Result<T, ApiError> {
        self.send(ApiRequest::new(Method::GET, endpoint).query(query)).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: Option<&B>,
    ) -> Result<T, ApiError> {
        self.send(ApiRequest::new(Method::POST, endpoint).body(json_body(body)?)).await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: Option<&B>,
    ) -> Result<T, ApiError> {
        self.send(ApiRequest::new(Method::PUT, endpoint).body(json_body(body)?)).await
    }

    pub async fn patch<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: Option<&B>,
    ) -> Result<T, ApiError> {
        self.send(ApiRequest::new(Method::PATCH, endpoint).body(json_body(body)?)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        self.send(ApiRequest::new(Method::DELETE, endpoint)).await
    }

    pub async fn post_form<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        form: FormPayload,
    ) -> Result<T, ApiError> {
        self.send(ApiRequest::new(Method::POST, endpoint).body(RequestBody::Form(form))).await
    }

    pub async fn patch_form<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        form: FormPayload,
    ) -> Result<T, ApiError> {
        self.send(ApiRequest::new(Method::PATCH, endpoint).body(RequestBody::Form(form))).await
    }

    async fn send<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        let method = request.method.clone();
        let path = request.path.clone();

        let response = match self.transport.execute(request).await {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(%method, %path, error = %err, "admin API request failed");
                return Err(err);
            }
        };

        tracing::debug!(%method, %path, status = response.status, "admin API response");
        decode(response)
    }
}

fn json_body<B: Serialize + ?Sized>(body: Option<&B>) -> Result<RequestBody, ApiError> {
    match body {
        Some(b) => {
            let value = serde_json::to_value(b)
                .map_err(|e| ApiError::transport(format!("failed to encode request body: {}", e)))?;
            Ok(RequestBody::Json(value))
        }
        None => Ok(RequestBody::Empty),
    }
}

fn decode<T: DeserializeOwned>(response: RawResponse) -> Result<T, ApiError> {
    if !(200..300).contains(&response.status) {
        return Err(ApiError::from_response(
            response.status,
            response.content_type.as_deref(),
            &response.body,
        ));
    }

    // Empty success bodies (204, bare 200) decode as JSON null
    let body: &[u8] = if response.body.iter().all(|b| b.is_ascii_whitespace()) {
        b"null"
    } else {
        &response.body
    };

    serde_json::from_slice(body).map_err(|e| {
        tracing::warn!(status = response.status, error = %e, "undecodable admin API response");
        ApiError::non_json(response.status)
    })
}
