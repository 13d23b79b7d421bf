//! Gallery image DTOs (multipart)

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{push_optional, FormFields};

pub use crate::common::{GalleryCategory, GalleryImage};

/// Text parts for POST /api/gallery-images/
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GalleryImageFields {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub description: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub category: Option<String>,
}

impl FormFields for GalleryImageFields {
    fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![("title", self.title.clone())];
        push_optional(&mut fields, "description", self.description.as_ref());
        push_optional(&mut fields, "category", self.category.as_ref());
        fields
    }
}

/// Text parts for PATCH /api/gallery-images/{id}/
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct GalleryImageUpdate {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    pub description: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub category: Option<String>,
}

impl FormFields for GalleryImageUpdate {
    fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = Vec::new();
        push_optional(&mut fields, "title", self.title.as_ref());
        push_optional(&mut fields, "description", self.description.as_ref());
        push_optional(&mut fields, "category", self.category.as_ref());
        fields
    }
}
