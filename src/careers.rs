//! Job openings

use reqwest::Method;
use sitedesk_protocol::api::{Career, CreateCareerRequest, UpdateCareerRequest};
use validator::Validate;

use crate::client::{ApiResponse, HttpClient, RequestOptions};
use crate::error::Result;
use crate::transport::Transport;

const CAREERS_PATH: &str = "/api/careers/";

fn career_path(id: i64) -> String {
    format!("{}{}/", CAREERS_PATH, id)
}

/// Public listing plus admin management of job openings
pub struct CareerService<'a, T: Transport> {
    client: &'a HttpClient<T>,
}

impl<'a, T: Transport> CareerService<'a, T> {
    pub fn new(client: &'a HttpClient<T>) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<ApiResponse<Vec<Career>>> {
        self.client.request(CAREERS_PATH, RequestOptions::get()).await
    }

    pub async fn get(&self, id: i64) -> Result<ApiResponse<Career>> {
        self.client.request(&career_path(id), RequestOptions::get()).await
    }

    pub async fn create(&self, request: &CreateCareerRequest) -> Result<ApiResponse<Career>> {
        request.validate()?;
        let options = RequestOptions::new(Method::POST).json(request)?;
        self.client.authenticated_request(CAREERS_PATH, options).await
    }

    /// Partial update; absent fields are left as they are on the server
    pub async fn update(&self, id: i64, request: &UpdateCareerRequest) -> Result<ApiResponse<Career>> {
        request.validate()?;
        let options = RequestOptions::new(Method::PATCH).json(request)?;
        self.client.authenticated_request(&career_path(id), options).await
    }

    /// `data` holds whatever the server echoes for the removed record
    pub async fn delete(&self, id: i64) -> Result<ApiResponse<serde_json::Value>> {
        self.client
            .authenticated_request(&career_path(id), RequestOptions::delete())
            .await
    }
}
