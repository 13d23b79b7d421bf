//! Single-use access codes

use reqwest::Method;
use sitedesk_protocol::api::{AccessCode, GenerateCodesRequest, UseCodeRequest};
use validator::Validate;

use crate::client::{ApiResponse, HttpClient, RequestOptions};
use crate::error::Result;
use crate::transport::Transport;

pub struct CodeService<'a, T: Transport> {
    client: &'a HttpClient<T>,
}

impl<'a, T: Transport> CodeService<'a, T> {
    pub fn new(client: &'a HttpClient<T>) -> Self {
        Self { client }
    }

    pub async fn generate(&self, count: u32) -> Result<ApiResponse<Vec<AccessCode>>> {
        let request = GenerateCodesRequest { count };
        request.validate()?;
        let options = RequestOptions::new(Method::POST).json(&request)?;
        self.client
            .authenticated_request("/api/codes/generate/", options)
            .await
    }

    /// All codes. An empty pool may come back as `success: false`, which is
    /// returned rather than raised.
    pub async fn list(&self) -> Result<ApiResponse<Vec<AccessCode>>> {
        self.client
            .authenticated_request("/api/codes/list/", RequestOptions::get())
            .await
    }

    /// Mark a code as used; public
    pub async fn redeem(&self, code: &str) -> Result<ApiResponse<AccessCode>> {
        let request = UseCodeRequest {
            code: code.trim().to_string(),
        };
        request.validate()?;
        let options = RequestOptions::new(Method::POST).json(&request)?;
        self.client.request("/api/codes/use/", options).await
    }
}
