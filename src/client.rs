//! HTTP client implementations for the site CMS backend
//!
//! [`BaseClient::request`] is the single request primitive: it resolves the
//! URL, applies default headers, sends through the [`Transport`] and decodes
//! the response envelope. [`HttpClient`] layers bearer-token injection and
//! session sliding on top of it.
//!
//! An envelope with `success: false` is returned as-is. Callers that want a
//! domain failure as an error use [`ApiResponse::into_result`].

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::config::Config;
use crate::error::{DeskError, Result};
use crate::retry::{fetch_with_retry, RetryOptions};
use crate::storage::{FileStore, KeyValueStore};
use crate::store::TokenStore;
use crate::transport::{
    HttpRequest, HttpResponse, MultipartForm, ReqwestTransport, RequestBody, Transport,
};

/// Message of the synthetic envelope returned for bodiless responses
pub const EMPTY_RESPONSE_MESSAGE: &str = "Operation completed successfully";

/// API response envelope
///
/// List endpoints additionally fill the pagination fields. The client never
/// follows `next` on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Envelope for 204 and zero-length responses
    pub fn completed() -> Self {
        Self {
            success: true,
            data: None,
            message: EMPTY_RESPONSE_MESSAGE.to_string(),
            count: None,
            next: None,
            previous: None,
        }
    }

    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    /// Turn `success: false` into an `Api` error
    pub fn into_result(self) -> Result<Self> {
        if self.success {
            Ok(self)
        } else {
            let message = if self.message.is_empty() {
                "Request was not successful".to_string()
            } else {
                self.message
            };
            Err(DeskError::api(200, message))
        }
    }

    /// Payload of a successful envelope; missing data is an error
    pub fn into_data(self) -> Result<T> {
        self.into_result()?
            .data
            .ok_or_else(|| DeskError::api(200, "No data in response"))
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Per-call request options
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: HeaderMap,
    pub body: RequestBody,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self::new(Method::GET)
    }
}

impl RequestOptions {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            headers: HeaderMap::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn get() -> Self {
        Self::new(Method::GET)
    }

    pub fn delete() -> Self {
        Self::new(Method::DELETE)
    }

    pub fn json<T: Serialize + ?Sized>(mut self, payload: &T) -> Result<Self> {
        self.body = RequestBody::Json(serde_json::to_vec(payload)?);
        Ok(self)
    }

    pub fn multipart(mut self, form: MultipartForm) -> Self {
        self.body = RequestBody::Multipart(form);
        self
    }

    pub fn header(mut self, name: HeaderName, value: &str) -> Result<Self> {
        let value = HeaderValue::from_str(value)
            .map_err(|e| DeskError::invalid_input(format!("Invalid header value: {}", e)))?;
        self.headers.insert(name, value);
        Ok(self)
    }
}

/// Unauthenticated HTTP client for API operations
#[derive(Debug, Clone)]
pub struct BaseClient<T: Transport = ReqwestTransport> {
    transport: T,
    config: Config,
}

impl BaseClient<ReqwestTransport> {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let transport = ReqwestTransport::new(&config)?;
        Ok(Self { transport, config })
    }
}

impl<T: Transport> BaseClient<T> {
    pub fn with_transport(config: Config, transport: T) -> Result<Self> {
        config.validate()?;
        Ok(Self { transport, config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send a request and decode the envelope.
    ///
    /// `Content-Type: application/json` is set unless the body is multipart;
    /// caller headers win over the default.
    pub async fn request<R>(&self, path: &str, options: RequestOptions) -> Result<ApiResponse<R>>
    where
        R: DeserializeOwned,
    {
        let request = self.build_request(path, options);
        debug!(method = %request.method, url = %request.url, "sending request");
        let response = self.transport.send(request).await?;
        decode_response(response)
    }

    /// Like [`BaseClient::request`], but through [`fetch_with_retry`]
    pub async fn request_with_retry<R>(
        &self,
        path: &str,
        options: RequestOptions,
        retry: &RetryOptions,
    ) -> Result<ApiResponse<R>>
    where
        R: DeserializeOwned,
    {
        let request = self.build_request(path, options);
        debug!(method = %request.method, url = %request.url, retries = retry.retries, "sending request with retry");
        let response = fetch_with_retry(&self.transport, request, retry).await?;
        decode_response(response)
    }

    fn build_request(&self, path: &str, options: RequestOptions) -> HttpRequest {
        let mut headers = HeaderMap::new();
        if !options.body.is_multipart() {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }
        headers.extend(options.headers);

        HttpRequest {
            method: options.method,
            url: self.config.endpoint_url(path),
            headers,
            body: options.body,
        }
    }
}

fn decode_response<R: DeserializeOwned>(response: HttpResponse) -> Result<ApiResponse<R>> {
    let status = response.status;

    if !status.is_success() {
        let message = serde_json::from_slice::<ErrorBody>(&response.body)
            .ok()
            .and_then(|body| body.message)
            .unwrap_or_else(|| format!("HTTP error! status: {}", status.as_u16()));
        debug!(status = status.as_u16(), %message, "request failed");
        return Err(DeskError::http(status.as_u16(), message));
    }

    if response.is_empty() {
        return Ok(ApiResponse::completed());
    }

    serde_json::from_slice(&response.body)
        .map_err(|e| DeskError::invalid_response(status.as_u16(), e))
}

/// HTTP client with authentication support
#[derive(Debug, Clone)]
pub struct HttpClient<T: Transport = ReqwestTransport> {
    base_client: BaseClient<T>,
    tokens: TokenStore,
}

impl HttpClient<ReqwestTransport> {
    /// Client with the session persisted under the configured storage dir
    pub fn new(config: Config) -> Result<Self> {
        let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(config.session_store()));
        let base_client = BaseClient::new(config)?;
        Ok(Self {
            base_client,
            tokens: TokenStore::new(store),
        })
    }
}

impl<T: Transport> HttpClient<T> {
    pub fn from_parts(base_client: BaseClient<T>, tokens: TokenStore) -> Self {
        Self {
            base_client,
            tokens,
        }
    }

    pub fn config(&self) -> &Config {
        self.base_client.config()
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    pub fn base(&self) -> &BaseClient<T> {
        &self.base_client
    }

    pub fn is_authenticated(&self) -> bool {
        self.tokens.is_authenticated()
    }

    pub async fn request<R>(&self, path: &str, options: RequestOptions) -> Result<ApiResponse<R>>
    where
        R: DeserializeOwned,
    {
        self.base_client.request(path, options).await
    }

    pub async fn request_with_retry<R>(
        &self,
        path: &str,
        options: RequestOptions,
        retry: &RetryOptions,
    ) -> Result<ApiResponse<R>>
    where
        R: DeserializeOwned,
    {
        self.base_client.request_with_retry(path, options, retry).await
    }

    /// Request with `Authorization: Token <token>`.
    ///
    /// Fails with "No authentication token found" before touching the
    /// network when there is no live session. Any caller-supplied
    /// `Authorization` header is replaced; other headers are kept.
    pub async fn authenticated_request<R>(
        &self,
        path: &str,
        mut options: RequestOptions,
    ) -> Result<ApiResponse<R>>
    where
        R: DeserializeOwned,
    {
        let token = self.tokens.get_token().ok_or_else(DeskError::missing_token)?;
        let value = HeaderValue::from_str(&format!("Token {}", token))
            .map_err(|_| DeskError::authentication("Stored token is not a valid header value"))?;
        options.headers.insert(AUTHORIZATION, value);

        let response = self.base_client.request(path, options).await?;

        if self.config().sliding_session {
            self.tokens.refresh_token_expiry();
        }

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::mocks::MockTransport;
    use crate::tests::utils::{authenticated_client, client_with};
    use serde_json::json;
    use std::time::Duration;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        id: i64,
    }

    #[tokio::test]
    async fn test_request_returns_envelope_unmodified() {
        let transport = MockTransport::new();
        transport.push_json(200, json!({"success": true, "data": {"id": 1}, "message": "ok"}));
        let (client, _clock) = client_with(transport.clone());

        let response: ApiResponse<Item> = client.request("/api/careers/", RequestOptions::get()).await.unwrap();

        assert_eq!(
            response,
            ApiResponse {
                success: true,
                data: Some(Item { id: 1 }),
                message: "ok".to_string(),
                count: None,
                next: None,
                previous: None,
            }
        );
        let sent = transport.last_request().unwrap();
        assert_eq!(sent.url, "http://localhost:8000/api/careers/");
        assert_eq!(sent.headers.get(CONTENT_TYPE).unwrap(), "application/json");
        assert!(sent.headers.get(AUTHORIZATION).is_none());
    }

    #[tokio::test]
    async fn test_no_content_short_circuits() {
        let transport = MockTransport::new();
        transport.push_empty(204);
        let (client, _clock) = client_with(transport);

        let response: ApiResponse<Item> = client
            .request("/api/careers/3/", RequestOptions::delete())
            .await
            .unwrap();

        assert!(response.success);
        assert_eq!(response.data, None);
        assert_eq!(response.message, EMPTY_RESPONSE_MESSAGE);
    }

    #[tokio::test]
    async fn test_zero_content_length_short_circuits() {
        let transport = MockTransport::new();
        transport.push_raw(200, vec![("content-length", "0")], Vec::new());
        let (client, _clock) = client_with(transport);

        let response: ApiResponse<Item> = client.request("/api/team/1/", RequestOptions::get()).await.unwrap();
        assert_eq!(response, ApiResponse::completed());
    }

    #[tokio::test]
    async fn test_http_error_uses_server_message() {
        let transport = MockTransport::new();
        transport.push_json(400, json!({"success": false, "message": "Invalid credentials"}));
        let (client, _clock) = client_with(transport);

        let err = client
            .request::<Item>("/api/login/", RequestOptions::new(Method::POST))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "API Error: Invalid credentials");
        assert_eq!(err.status(), Some(400));
    }

    #[tokio::test]
    async fn test_http_error_without_message_falls_back() {
        let transport = MockTransport::new();
        transport.push_raw(502, vec![], b"<html>Bad gateway</html>".to_vec());
        let (client, _clock) = client_with(transport);

        let err = client
            .request::<Item>("/api/careers/", RequestOptions::get())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "API Error: HTTP error! status: 502");
    }

    #[tokio::test]
    async fn test_malformed_json_is_api_error() {
        let transport = MockTransport::new();
        transport.push_raw(200, vec![], b"{not json".to_vec());
        let (client, _clock) = client_with(transport);

        let err = client
            .request::<Item>("/api/careers/", RequestOptions::get())
            .await
            .unwrap_err();
        assert!(err.to_string().starts_with("API Error: Invalid API response"));
    }

    #[tokio::test]
    async fn test_transport_failure_is_api_error() {
        let transport = MockTransport::new();
        transport.push_failure("connection refused");
        let (client, _clock) = client_with(transport);

        let err = client
            .request::<Item>("/api/careers/", RequestOptions::get())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "API Error: connection refused");
    }

    #[tokio::test]
    async fn test_success_false_is_not_an_error() {
        let transport = MockTransport::new();
        transport.push_json(200, json!({"success": false, "data": null, "message": "No codes available"}));
        let (client, _clock) = client_with(transport);

        let response: ApiResponse<Vec<Item>> = client.request("/api/codes/list/", RequestOptions::get()).await.unwrap();
        assert!(!response.success);

        let err = response.into_result().unwrap_err();
        assert_eq!(err.to_string(), "API Error: No codes available");
    }

    #[tokio::test]
    async fn test_caller_content_type_wins() {
        let transport = MockTransport::new();
        transport.push_json(200, json!({"success": true}));
        let (client, _clock) = client_with(transport.clone());

        let options = RequestOptions::new(Method::POST)
            .header(CONTENT_TYPE, "application/vnd.api+json")
            .unwrap();
        let _: ApiResponse<Item> = client.request("/api/messages/", options).await.unwrap();

        let sent = transport.last_request().unwrap();
        assert_eq!(sent.headers.get(CONTENT_TYPE).unwrap(), "application/vnd.api+json");
    }

    #[tokio::test]
    async fn test_multipart_omits_content_type() {
        let transport = MockTransport::new();
        transport.push_json(201, json!({"success": true, "data": {"id": 5}}));
        let (client, _clock) = authenticated_client(transport.clone(), "T1");

        let options = RequestOptions::new(Method::POST).multipart(MultipartForm::new().text("name", "Ada"));
        let _: ApiResponse<Item> = client.authenticated_request("/api/team/", options).await.unwrap();

        let sent = transport.last_request().unwrap();
        assert!(sent.headers.get(CONTENT_TYPE).is_none());
        assert_eq!(sent.headers.get(AUTHORIZATION).unwrap(), "Token T1");
        assert!(sent.body.is_multipart());
    }

    #[tokio::test]
    async fn test_authenticated_request_without_token_fails_fast() {
        let transport = MockTransport::new();
        transport.push_json(200, json!({"success": true}));
        let (client, _clock) = client_with(transport.clone());

        let err = client
            .authenticated_request::<Item>("/api/applications/", RequestOptions::get())
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "No authentication token found");
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_login_then_authenticated_fetch() {
        let transport = MockTransport::new();
        transport.push_json(200, json!({"success": true, "data": [], "message": "ok"}));
        let (client, _clock) = client_with(transport.clone());

        client
            .tokens()
            .set_auth(&crate::store::Credential {
                token: "T1".to_string(),
                user_id: 7,
                username: "admin".to_string(),
            })
            .unwrap();
        let user = client.tokens().get_user().unwrap();
        assert_eq!(user.username, "admin");
        assert_eq!(user.user_id, 7);

        let _: ApiResponse<Vec<Item>> = client
            .authenticated_request("/api/applications/", RequestOptions::get())
            .await
            .unwrap();

        let sent = transport.last_request().unwrap();
        assert_eq!(sent.headers.get(AUTHORIZATION).unwrap(), "Token T1");
    }

    #[tokio::test]
    async fn test_authorization_override_keeps_other_headers() {
        let transport = MockTransport::new();
        transport.push_json(200, json!({"success": true}));
        let (client, _clock) = authenticated_client(transport.clone(), "T1");

        let options = RequestOptions::get()
            .header(AUTHORIZATION, "Bearer stale")
            .unwrap()
            .header(HeaderName::from_static("x-request-id"), "req-1")
            .unwrap();
        let _: ApiResponse<Item> = client.authenticated_request("/api/messages/", options).await.unwrap();

        let sent = transport.last_request().unwrap();
        assert_eq!(sent.headers.get(AUTHORIZATION).unwrap(), "Token T1");
        assert_eq!(sent.headers.get("x-request-id").unwrap(), "req-1");
    }

    #[tokio::test]
    async fn test_authenticated_success_slides_session() {
        let transport = MockTransport::new();
        transport.push_json(200, json!({"success": true}));
        let (client, clock) = authenticated_client(transport, "T1");

        clock.advance(Duration::from_secs(6 * 60 * 60));
        let before = client.tokens().get_token_remaining_time();

        let _: ApiResponse<Item> = client
            .authenticated_request("/api/messages/", RequestOptions::get())
            .await
            .unwrap();

        assert!(client.tokens().get_token_remaining_time() > before);
        assert_eq!(client.tokens().get_token().as_deref(), Some("T1"));
    }

    #[tokio::test]
    async fn test_failed_authenticated_call_does_not_slide_session() {
        let transport = MockTransport::new();
        transport.push_json(500, json!({"message": "boom"}));
        let (client, clock) = authenticated_client(transport, "T1");

        clock.advance(Duration::from_secs(60));
        let before = client.tokens().get_token_remaining_time();
        let _ = client
            .authenticated_request::<Item>("/api/messages/", RequestOptions::get())
            .await;
        assert_eq!(client.tokens().get_token_remaining_time(), before);
    }

    #[tokio::test]
    async fn test_expired_session_fails_fast_and_clears() {
        let transport = MockTransport::new();
        let (client, clock) = authenticated_client(transport.clone(), "T1");

        clock.advance(Duration::from_secs(25 * 60 * 60));
        let err = client
            .authenticated_request::<Item>("/api/messages/", RequestOptions::get())
            .await
            .unwrap_err();

        assert_eq!(err.code(), crate::error::ErrorCode::MissingToken);
        assert_eq!(transport.call_count(), 0);
        assert!(client.tokens().get_user().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_requests_are_not_deduplicated() {
        let transport = MockTransport::new();
        transport.push_json(200, json!({"success": true, "data": []}));
        transport.push_json(200, json!({"success": true, "data": []}));
        let (client, _clock) = client_with(transport.clone());

        let (first, second) = tokio::join!(
            client.request::<Vec<Item>>("/api/careers/", RequestOptions::get()),
            client.request::<Vec<Item>>("/api/careers/", RequestOptions::get()),
        );
        assert!(first.is_ok() && second.is_ok());
        assert_eq!(transport.call_count(), 2);
    }

    #[tokio::test]
    async fn test_pagination_fields_are_exposed() {
        let transport = MockTransport::new();
        transport.push_json(
            200,
            json!({
                "success": true,
                "data": [{"id": 1}, {"id": 2}],
                "message": "",
                "count": 12,
                "next": "http://localhost:8000/api/messages/?page=2",
                "previous": null
            }),
        );
        let (client, _clock) = authenticated_client(transport.clone(), "T1");

        let page: ApiResponse<Vec<Item>> = client
            .authenticated_request("/api/messages/", RequestOptions::get())
            .await
            .unwrap();

        assert_eq!(page.count, Some(12));
        assert!(page.has_next());
        assert_eq!(page.previous, None);
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn test_request_with_retry_recovers_from_server_error() {
        let transport = MockTransport::new();
        transport.push_json(503, json!({"message": "busy"}));
        transport.push_json(200, json!({"success": true, "data": {"id": 4}}));
        let (client, _clock) = client_with(transport.clone());

        let retry = RetryOptions {
            retry_delay: Duration::from_millis(1),
            ..RetryOptions::default()
        };
        let response: ApiResponse<Item> = client
            .request_with_retry("/api/careers/4/", RequestOptions::get(), &retry)
            .await
            .unwrap();

        assert_eq!(response.data, Some(Item { id: 4 }));
        assert_eq!(transport.call_count(), 2);
    }

    #[test]
    fn test_into_data_requires_payload() {
        let response: ApiResponse<Item> = ApiResponse::completed();
        assert!(response.into_data().is_err());

        let response = ApiResponse {
            success: true,
            data: Some(Item { id: 9 }),
            message: String::new(),
            count: None,
            next: None,
            previous: None,
        };
        assert_eq!(response.into_data().unwrap(), Item { id: 9 });
    }

    #[test]
    fn test_corrupt_session_file_reads_as_logged_out() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("session.json"), "{not json").unwrap();
        let config = Config {
            storage_dir: dir.path().to_path_buf(),
            ..crate::tests::utils::test_config()
        };

        let client = HttpClient::new(config).unwrap();
        assert!(!client.is_authenticated());
        assert!(client.tokens().get_token().is_none());

        crate::auth::AuthService::new(&client).logout();
        let content = std::fs::read_to_string(dir.path().join("session.json")).unwrap();
        assert!(serde_json::from_str::<serde_json::Value>(&content).is_ok());
    }
}
