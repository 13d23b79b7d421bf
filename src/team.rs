//! Team members shown on the about page

use reqwest::Method;
use sitedesk_protocol::api::{TeamMember, TeamMemberFields, TeamMemberUpdate};
use validator::Validate;

use crate::applications::form_from;
use crate::client::{ApiResponse, HttpClient, RequestOptions};
use crate::error::Result;
use crate::transport::{FilePart, Transport};

const TEAM_PATH: &str = "/api/team/";

fn member_path(id: i64) -> String {
    format!("{}{}/", TEAM_PATH, id)
}

pub struct TeamService<'a, T: Transport> {
    client: &'a HttpClient<T>,
}

impl<'a, T: Transport> TeamService<'a, T> {
    pub fn new(client: &'a HttpClient<T>) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<ApiResponse<Vec<TeamMember>>> {
        self.client.request(TEAM_PATH, RequestOptions::get()).await
    }

    pub async fn get(&self, id: i64) -> Result<ApiResponse<TeamMember>> {
        self.client.request(&member_path(id), RequestOptions::get()).await
    }

    /// Create a member; the photo travels as the `image` part
    pub async fn create(
        &self,
        fields: &TeamMemberFields,
        image: Option<FilePart>,
    ) -> Result<ApiResponse<TeamMember>> {
        fields.validate()?;
        let options = RequestOptions::new(Method::POST).multipart(form_from(fields, image));
        self.client.authenticated_request(TEAM_PATH, options).await
    }

    pub async fn update(
        &self,
        id: i64,
        fields: &TeamMemberUpdate,
        image: Option<FilePart>,
    ) -> Result<ApiResponse<TeamMember>> {
        fields.validate()?;
        let options = RequestOptions::new(Method::PATCH).multipart(form_from(fields, image));
        self.client.authenticated_request(&member_path(id), options).await
    }

    pub async fn delete(&self, id: i64) -> Result<ApiResponse<serde_json::Value>> {
        self.client
            .authenticated_request(&member_path(id), RequestOptions::delete())
            .await
    }
}
