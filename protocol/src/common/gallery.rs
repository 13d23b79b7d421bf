//! Gallery images and the categories they are filed under

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GalleryImage {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    /// URL of the stored image
    pub image: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Category summary derived from the image list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryCategory {
    pub name: String,
    pub image_count: usize,
}
