//! Gallery images and their categories

use reqwest::Method;
use sitedesk_protocol::api::{GalleryCategory, GalleryImage, GalleryImageFields, GalleryImageUpdate};
use std::collections::BTreeMap;
use validator::Validate;

use crate::applications::form_from;
use crate::client::{ApiResponse, HttpClient, RequestOptions};
use crate::error::Result;
use crate::transport::{FilePart, Transport};

const GALLERY_PATH: &str = "/api/gallery-images/";

/// Category name for images filed under none
pub const UNCATEGORIZED: &str = "uncategorized";

fn image_path(id: i64) -> String {
    format!("{}{}/", GALLERY_PATH, id)
}

/// Count images per category, sorted by name
pub fn group_categories(images: &[GalleryImage]) -> Vec<GalleryCategory> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for image in images {
        let name = image
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(UNCATEGORIZED);
        *counts.entry(name).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(name, image_count)| GalleryCategory {
            name: name.to_string(),
            image_count,
        })
        .collect()
}

pub struct GalleryService<'a, T: Transport> {
    client: &'a HttpClient<T>,
}

impl<'a, T: Transport> GalleryService<'a, T> {
    pub fn new(client: &'a HttpClient<T>) -> Self {
        Self { client }
    }

    pub async fn list(&self, category: Option<&str>) -> Result<ApiResponse<Vec<GalleryImage>>> {
        let path = match category {
            Some(category) => {
                let query = url::form_urlencoded::Serializer::new(String::new())
                    .append_pair("category", category)
                    .finish();
                format!("{}?{}", GALLERY_PATH, query)
            }
            None => GALLERY_PATH.to_string(),
        };
        self.client.request(&path, RequestOptions::get()).await
    }

    /// Categories derived from the full listing
    pub async fn categories(&self) -> Result<Vec<GalleryCategory>> {
        let images = self.list(None).await?.into_data()?;
        Ok(group_categories(&images))
    }

    pub async fn create(
        &self,
        fields: &GalleryImageFields,
        image: FilePart,
    ) -> Result<ApiResponse<GalleryImage>> {
        fields.validate()?;
        let options = RequestOptions::new(Method::POST).multipart(form_from(fields, Some(image)));
        self.client.authenticated_request(GALLERY_PATH, options).await
    }

    pub async fn update(
        &self,
        id: i64,
        fields: &GalleryImageUpdate,
        image: Option<FilePart>,
    ) -> Result<ApiResponse<GalleryImage>> {
        fields.validate()?;
        let options = RequestOptions::new(Method::PATCH).multipart(form_from(fields, image));
        self.client.authenticated_request(&image_path(id), options).await
    }

    pub async fn delete(&self, id: i64) -> Result<ApiResponse<serde_json::Value>> {
        self.client
            .authenticated_request(&image_path(id), RequestOptions::delete())
            .await
    }
}
