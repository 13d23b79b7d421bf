//! HTTP transport seam
//!
//! The API client builds plain [`HttpRequest`] values and hands them to a
//! [`Transport`]. [`ReqwestTransport`] is the production implementation; tests
//! substitute a recording mock.

use reqwest::header::{HeaderMap, CONTENT_LENGTH};
use reqwest::{Client, Method, StatusCode};
use std::future::Future;
use std::path::Path;
use std::time::Duration;

use crate::config::Config;
use crate::error::{DeskError, Result};

/// Request body encodings supported by the backend
#[derive(Debug, Clone, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    /// Serialized JSON document
    Json(Vec<u8>),
    Multipart(MultipartForm),
}

impl RequestBody {
    pub fn is_multipart(&self) -> bool {
        matches!(self, Self::Multipart(_))
    }
}

/// File attached to a multipart body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    pub field: String,
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl FilePart {
    /// Read a file from disk, guessing the mime type from its extension
    pub async fn from_path(field: impl Into<String>, path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            DeskError::invalid_input(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload")
            .to_string();
        Ok(Self {
            field: field.into(),
            mime_type: guess_mime_type(&file_name).to_string(),
            file_name,
            bytes,
        })
    }
}

/// Multipart form of text fields and files
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipartForm {
    pub fields: Vec<(String, String)>,
    pub files: Vec<FilePart>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    pub fn file(mut self, part: FilePart) -> Self {
        self.files.push(part);
        self
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    fn into_reqwest(self) -> Result<reqwest::multipart::Form> {
        let mut form = reqwest::multipart::Form::new();
        for (name, value) in self.fields {
            form = form.text(name, value);
        }
        for file in self.files {
            let part = reqwest::multipart::Part::bytes(file.bytes)
                .file_name(file.file_name)
                .mime_str(&file.mime_type)?;
            form = form.part(file.field, part);
        }
        Ok(form)
    }
}

/// Outbound request, fully resolved
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: RequestBody,
}

/// Raw response as received from the server
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn content_length(&self) -> Option<u64> {
        self.headers
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse().ok())
    }

    /// No body to decode: 204, or an explicit zero content length
    pub fn is_empty(&self) -> bool {
        self.status == StatusCode::NO_CONTENT || self.content_length() == Some(0)
    }
}

/// Something that can deliver an [`HttpRequest`]
pub trait Transport: Send + Sync {
    fn send(&self, request: HttpRequest) -> impl Future<Output = Result<HttpResponse>> + Send;
}

/// reqwest-backed transport
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(config: &Config) -> Result<Self> {
        let mut client_builder = Client::builder();

        // zero means no client-side timeout
        if config.timeout > 0 {
            client_builder = client_builder.timeout(Duration::from_secs(config.timeout));
        }

        if !config.use_proxy {
            client_builder = client_builder.no_proxy();
        }

        Ok(Self {
            client: client_builder.build()?,
        })
    }
}

impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let mut builder = self
            .client
            .request(request.method, &request.url)
            .headers(request.headers);

        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(bytes) => builder.body(bytes),
            RequestBody::Multipart(form) => builder.multipart(form.into_reqwest()?),
        };

        let response = builder.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn guess_mime_type(file_name: &str) -> &'static str {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "txt" => "text/plain",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;
    use tempfile::tempdir;

    #[test]
    fn test_guess_mime_type() {
        assert_eq!(guess_mime_type("photo.JPG"), "image/jpeg");
        assert_eq!(guess_mime_type("resume.pdf"), "application/pdf");
        assert_eq!(guess_mime_type("noext"), "application/octet-stream");
    }

    #[test]
    fn test_empty_response_detection() {
        let mut response = HttpResponse {
            status: StatusCode::NO_CONTENT,
            headers: HeaderMap::new(),
            body: Vec::new(),
        };
        assert!(response.is_empty());

        response.status = StatusCode::OK;
        assert!(!response.is_empty());

        response
            .headers
            .insert(CONTENT_LENGTH, HeaderValue::from_static("0"));
        assert!(response.is_empty());
    }

    #[test]
    fn test_multipart_form_builder() {
        let form = MultipartForm::new()
            .text("name", "Ada")
            .text("role", "Engineer");
        assert_eq!(form.field("role"), Some("Engineer"));
        assert_eq!(form.field("bio"), None);
        assert!(RequestBody::Multipart(form).is_multipart());
    }

    #[tokio::test]
    async fn test_file_part_from_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("portrait.png");
        std::fs::write(&path, b"\x89PNG").unwrap();

        let part = FilePart::from_path("image", &path).await.unwrap();
        assert_eq!(part.field, "image");
        assert_eq!(part.file_name, "portrait.png");
        assert_eq!(part.mime_type, "image/png");
        assert_eq!(part.bytes, b"\x89PNG".to_vec());
    }

    #[tokio::test]
    async fn test_file_part_missing_file() {
        let dir = tempdir().unwrap();
        let err = FilePart::from_path("image", &dir.path().join("missing.png"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }
}
