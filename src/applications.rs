//! Job applications

use reqwest::Method;
use sitedesk_protocol::api::{ApplicationFields, FormFields, JobApplication};
use validator::Validate;

use crate::client::{ApiResponse, HttpClient, RequestOptions};
use crate::error::Result;
use crate::transport::{FilePart, MultipartForm, Transport};

/// Build the multipart body shared by every form upload
pub(crate) fn form_from<F: FormFields>(fields: &F, file: Option<FilePart>) -> MultipartForm {
    let mut form = fields
        .form_fields()
        .into_iter()
        .fold(MultipartForm::new(), |form, (name, value)| form.text(name, value));
    if let Some(file) = file {
        form = form.file(file);
    }
    form
}

pub(crate) fn page_query(path: &str, page: Option<u32>) -> String {
    match page {
        Some(page) => format!("{}?page={}", path, page),
        None => path.to_string(),
    }
}

pub struct ApplicationService<'a, T: Transport> {
    client: &'a HttpClient<T>,
}

impl<'a, T: Transport> ApplicationService<'a, T> {
    pub fn new(client: &'a HttpClient<T>) -> Self {
        Self { client }
    }

    /// Public application form, resume attached as the `resume` part
    pub async fn apply(
        &self,
        fields: &ApplicationFields,
        resume: Option<FilePart>,
    ) -> Result<ApiResponse<JobApplication>> {
        fields.validate()?;
        let options = RequestOptions::new(Method::POST).multipart(form_from(fields, resume));
        self.client.request("/api/apply/", options).await
    }

    /// One page of received applications; `next` is not followed
    pub async fn list(&self, page: Option<u32>) -> Result<ApiResponse<Vec<JobApplication>>> {
        self.client
            .authenticated_request(&page_query("/api/applications/", page), RequestOptions::get())
            .await
    }
}
