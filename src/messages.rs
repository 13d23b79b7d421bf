//! Contact form messages

use reqwest::Method;
use sitedesk_protocol::api::{CreateMessageRequest, Message};
use validator::Validate;

use crate::applications::page_query;
use crate::client::{ApiResponse, HttpClient, RequestOptions};
use crate::error::Result;
use crate::helpers::sanitize_input;
use crate::transport::Transport;

const MESSAGES_PATH: &str = "/api/messages/";

pub struct MessageService<'a, T: Transport> {
    client: &'a HttpClient<T>,
}

impl<'a, T: Transport> MessageService<'a, T> {
    pub fn new(client: &'a HttpClient<T>) -> Self {
        Self { client }
    }

    /// Public contact form. Text fields are sanitized before validation.
    pub async fn submit(&self, request: &CreateMessageRequest) -> Result<ApiResponse<Message>> {
        let request = CreateMessageRequest {
            name: sanitize_input(&request.name),
            email: request.email.trim().to_string(),
            subject: request.subject.as_deref().map(sanitize_input),
            message: sanitize_input(&request.message),
        };
        request.validate()?;

        let options = RequestOptions::new(Method::POST).json(&request)?;
        self.client.request(MESSAGES_PATH, options).await
    }

    pub async fn list(&self, page: Option<u32>) -> Result<ApiResponse<Vec<Message>>> {
        self.client
            .authenticated_request(&page_query(MESSAGES_PATH, page), RequestOptions::get())
            .await
    }

    pub async fn get(&self, id: i64) -> Result<ApiResponse<Message>> {
        self.client
            .authenticated_request(&format!("{}{}/", MESSAGES_PATH, id), RequestOptions::get())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::mocks::MockTransport;
    use crate::tests::utils::{authenticated_client, client_with};
    use crate::transport::RequestBody;
    use reqwest::header::AUTHORIZATION;
    use serde_json::json;

    fn message_json(id: i64) -> serde_json::Value {
        json!({
            "id": id,
            "name": "Grace",
            "email": "grace@example.com",
            "subject": "Hi",
            "message": "Hello there",
            "is_read": false
        })
    }

    #[tokio::test]
    async fn test_submit_sanitizes_fields() {
        let transport = MockTransport::new();
        transport.push_json(201, json!({"success": true, "data": message_json(1)}));
        let (client, _clock) = client_with(transport.clone());

        let request = CreateMessageRequest {
            name: "  <b>Grace</b> ".to_string(),
            email: " grace@example.com ".to_string(),
            subject: Some("<Hi>".to_string()),
            message: "Hello <script>".to_string(),
        };
        MessageService::new(&client).submit(&request).await.unwrap();

        let sent = transport.last_request().unwrap();
        assert!(sent.headers.get(AUTHORIZATION).is_none());
        let RequestBody::Json(bytes) = sent.body else {
            panic!("expected JSON body");
        };
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            body,
            json!({
                "name": "bGrace/b",
                "email": "grace@example.com",
                "subject": "Hi",
                "message": "Hello script"
            })
        );
    }

    #[tokio::test]
    async fn test_submit_blank_message_is_rejected() {
        let transport = MockTransport::new();
        let (client, _clock) = client_with(transport.clone());

        let request = CreateMessageRequest {
            name: "Grace".to_string(),
            email: "grace@example.com".to_string(),
            subject: None,
            message: " <> ".to_string(),
        };
        let err = MessageService::new(&client).submit(&request).await.unwrap_err();
        assert!(err.to_string().contains("message"));
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_list_and_get_are_authenticated() {
        let transport = MockTransport::new();
        transport.push_json(200, json!({"success": true, "data": [message_json(1)], "count": 1}));
        transport.push_json(200, json!({"success": true, "data": message_json(1)}));
        let (client, _clock) = authenticated_client(transport.clone(), "T1");
        let service = MessageService::new(&client);

        let page = service.list(None).await.unwrap();
        assert_eq!(page.count, Some(1));
        let message = service.get(1).await.unwrap().into_data().unwrap();
        assert_eq!(message.name, "Grace");

        let requests = transport.requests();
        assert_eq!(requests[0].url, "http://localhost:8000/api/messages/");
        assert_eq!(requests[1].url, "http://localhost:8000/api/messages/1/");
        assert!(requests
            .iter()
            .all(|r| r.headers.get(AUTHORIZATION).unwrap() == "Token T1"));
    }

    #[tokio::test]
    async fn test_get_missing_message() {
        let transport = MockTransport::new();
        transport.push_json(404, json!({"detail": "Not found."}));
        let (client, _clock) = authenticated_client(transport, "T1");

        let err = MessageService::new(&client).get(99).await.unwrap_err();
        assert_eq!(err.to_string(), "API Error: HTTP error! status: 404");
    }
}
