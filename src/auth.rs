//! Admin authentication against the site backend

use reqwest::Method;
use sitedesk_protocol::api::{LoginRequest, LoginResponse};
use tracing::info;
use validator::Validate;

use crate::client::{ApiResponse, HttpClient, RequestOptions};
use crate::error::{DeskError, Result};
use crate::store::{Credential, SessionUser};
use crate::transport::Transport;

/// Snapshot of the local session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStatus {
    pub user: Option<SessionUser>,
    /// Milliseconds until the session lapses, 0 when logged out
    pub remaining_ms: u64,
}

impl SessionStatus {
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some() && self.remaining_ms > 0
    }
}

/// Login, logout and session inspection
pub struct AuthService<'a, T: Transport> {
    client: &'a HttpClient<T>,
}

impl<'a, T: Transport> AuthService<'a, T> {
    pub fn new(client: &'a HttpClient<T>) -> Self {
        Self { client }
    }

    /// Exchange credentials for a token and persist the session.
    ///
    /// Any previous session is replaced. A `success: false` answer is an
    /// authentication error and leaves the stored session untouched.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse> {
        let request = LoginRequest {
            username: username.trim().to_string(),
            password: password.to_string(),
        };
        request.validate()?;

        let options = RequestOptions::new(Method::POST).json(&request)?;
        let response: ApiResponse<LoginResponse> =
            self.client.request("/api/login/", options).await?;

        if !response.success {
            let message = if response.message.is_empty() {
                "Login failed".to_string()
            } else {
                response.message
            };
            return Err(DeskError::authentication(message));
        }

        let login = response
            .data
            .ok_or_else(|| DeskError::authentication("No data in login response"))?;

        self.client.tokens().set_auth(&Credential {
            token: login.token.clone(),
            user_id: login.user_id,
            username: login.username.clone(),
        })?;

        info!(username = %login.username, "logged in");
        Ok(login)
    }

    /// Forget the local session. Safe to call when already logged out.
    pub fn logout(&self) {
        let user = self.client.tokens().get_user();
        self.client.tokens().clear_auth();
        if let Some(user) = user {
            info!(username = %user.username, "logged out");
        }
    }

    pub fn status(&self) -> SessionStatus {
        let tokens = self.client.tokens();
        SessionStatus {
            user: tokens.get_user(),
            remaining_ms: tokens.get_token_remaining_time(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::mocks::MockTransport;
    use crate::tests::utils::{authenticated_client, client_with};
    use serde_json::json;
    use std::time::Duration;

    #[tokio::test]
    async fn test_login_stores_session() {
        let transport = MockTransport::new();
        transport.push_json(
            200,
            json!({
                "success": true,
                "data": {"token": "T1", "userId": 7, "username": "admin"},
                "message": "Login successful"
            }),
        );
        let (client, _clock) = client_with(transport.clone());
        let service = AuthService::new(&client);

        let login = service.login(" admin ", "hunter2").await.unwrap();
        assert_eq!(login.token, "T1");

        let sent = transport.last_request().unwrap();
        assert_eq!(sent.method, Method::POST);
        assert!(sent.url.ends_with("/api/login/"));
        match sent.body {
            crate::transport::RequestBody::Json(bytes) => {
                let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
                assert_eq!(body, json!({"username": "admin", "password": "hunter2"}));
            }
            other => panic!("unexpected body {:?}", other),
        }

        let status = service.status();
        assert!(status.is_authenticated());
        assert_eq!(
            status.user,
            Some(SessionUser {
                username: "admin".to_string(),
                user_id: 7
            })
        );
        assert_eq!(client.tokens().get_token().as_deref(), Some("T1"));
    }

    #[tokio::test]
    async fn test_login_rejected_by_envelope() {
        let transport = MockTransport::new();
        transport.push_json(200, json!({"success": false, "message": "Invalid credentials"}));
        let (client, _clock) = client_with(transport);
        let service = AuthService::new(&client);

        let err = service.login("admin", "wrong").await.unwrap_err();
        assert!(err.is_auth_error());
        assert_eq!(err.to_string(), "Invalid credentials");
        assert!(!client.is_authenticated());
    }

    #[tokio::test]
    async fn test_login_http_error_keeps_previous_session() {
        let transport = MockTransport::new();
        transport.push_json(401, json!({"message": "Invalid credentials"}));
        let (client, _clock) = authenticated_client(transport, "OLD");
        let service = AuthService::new(&client);

        let err = service.login("admin", "wrong").await.unwrap_err();
        assert_eq!(err.to_string(), "API Error: Invalid credentials");
        assert_eq!(client.tokens().get_token().as_deref(), Some("OLD"));
    }

    #[tokio::test]
    async fn test_login_validates_before_sending() {
        let transport = MockTransport::new();
        let (client, _clock) = client_with(transport.clone());
        let service = AuthService::new(&client);

        let err = service.login("   ", "pw").await.unwrap_err();
        assert_eq!(err.code(), crate::error::ErrorCode::ValidationFailed);
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_logout_clears_session() {
        let (client, _clock) = authenticated_client(MockTransport::new(), "T1");
        let service = AuthService::new(&client);

        service.logout();
        service.logout();

        let status = service.status();
        assert_eq!(status.user, None);
        assert_eq!(status.remaining_ms, 0);
        assert!(!status.is_authenticated());
    }

    #[tokio::test]
    async fn test_status_after_expiry() {
        let (client, clock) = authenticated_client(MockTransport::new(), "T1");
        let service = AuthService::new(&client);

        clock.advance(Duration::from_secs(24 * 60 * 60));
        assert!(!service.status().is_authenticated());
    }
}
