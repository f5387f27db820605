//! Remote resource accessor.
//!
//! [`ApiClient`] issues authenticated JSON requests against the platform
//! REST API using [`reqwest`] and classifies every failure into an
//! [`ApiError`]. It never retries: a failed request surfaces directly to
//! the caller.

use std::sync::Arc;

use reqwest::header::AUTHORIZATION;
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::auth::TokenSource;
use crate::config::ClientConfig;
use crate::error::ApiError;

/// Header carrying a per-request correlation id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Shared HTTP client for every backend call.
///
/// Cheap to share behind an `Arc`; the inner [`reqwest::Client`] pools
/// connections.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    tokens: Arc<dyn TokenSource>,
}

impl ApiClient {
    /// Create a client from configuration.
    pub fn new(config: &ClientConfig, tokens: Arc<dyn TokenSource>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
        Ok(Self::with_client(http, config.api_url.clone(), tokens))
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(
        http: reqwest::Client,
        base_url: impl Into<String>,
        tokens: Arc<dyn TokenSource>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http,
            base_url,
            tokens,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for a path relative to the API root.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    // ---- verbs ----

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let req = self.request(Method::GET, path);
        self.execute(req, Method::GET, path).await
    }

    /// `GET` with query-string parameters (filters, pagination).
    pub async fn get_with_query<T, Q>(&self, path: &str, query: &Q) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let req = self.request(Method::GET, path).query(query);
        self.execute(req, Method::GET, path).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let req = self.request(Method::POST, path).json(body);
        self.execute(req, Method::POST, path).await
    }

    /// `POST` without a request body.
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let req = self.request(Method::POST, path);
        self.execute(req, Method::POST, path).await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let req = self.request(Method::PUT, path).json(body);
        self.execute(req, Method::PUT, path).await
    }

    pub async fn patch<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let req = self.request(Method::PATCH, path).json(body);
        self.execute(req, Method::PATCH, path).await
    }

    /// `DELETE`, discarding any response body.
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let req = self.request(Method::DELETE, path);
        self.execute::<serde_json::Value>(req, Method::DELETE, path)
            .await
            .map(|_| ())
    }

    /// Multipart form submission (file uploads).
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<T, ApiError> {
        let req = self.request(Method::POST, path).multipart(form);
        self.execute(req, Method::POST, path).await
    }

    // ---- private helpers ----

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, self.url(path))
    }

    /// Attach credentials and a request id, send, and decode.
    async fn execute<T: DeserializeOwned>(
        &self,
        mut req: RequestBuilder,
        method: Method,
        path: &str,
    ) -> Result<T, ApiError> {
        let request_id = uuid::Uuid::new_v4().to_string();
        req = req.header(REQUEST_ID_HEADER, &request_id);
        if let Some(token) = self.tokens.bearer_token().await {
            req = req.header(AUTHORIZATION, format!("Bearer {token}"));
        }

        tracing::debug!(%method, path, request_id = %request_id, "API request");

        let result = match req.send().await {
            Ok(response) => Self::parse_response(response).await,
            Err(e) => Err(ApiError::from(e)),
        };

        if let Err(e) = &result {
            tracing::warn!(%method, path, request_id = %request_id, error = %e, "API request failed");
        }
        result
    }

    /// Ensure the response has a success status code, or turn the status
    /// and body into an [`ApiError`].
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ApiError::from_status(status.as_u16(), &body));
        }
        Ok(response)
    }

    /// Decode a successful body. An empty body decodes as JSON `null`, so
    /// `()` and `Option<T>` targets accept `204 No Content`.
    async fn parse_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let response = Self::ensure_success(response).await?;
        let bytes = response.bytes().await?;
        let body: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
            b"null"
        } else {
            &bytes
        };
        serde_json::from_slice(body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Anonymous;

    fn client(base: &str) -> ApiClient {
        ApiClient::with_client(reqwest::Client::new(), base, Arc::new(Anonymous))
    }

    #[test]
    fn url_joins_with_single_slash() {
        let api = client("http://localhost:8000/api/");
        assert_eq!(api.url("/admin/courses"), "http://localhost:8000/api/admin/courses");
        assert_eq!(api.url("admin/courses"), "http://localhost:8000/api/admin/courses");
    }

    #[test]
    fn new_from_default_config() {
        let api = ApiClient::new(&ClientConfig::default(), Arc::new(Anonymous)).unwrap();
        assert_eq!(api.base_url(), "http://localhost:8000/api");
    }
}
