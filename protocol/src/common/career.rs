//! Job openings and the applications submitted against them

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Job opening listed on the careers page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Career {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub department: Option<String>,
    pub location: String,
    #[serde(rename = "job_type", alias = "employment_type")]
    pub employment_type: String,
    pub description: String,
    #[serde(default)]
    pub requirements: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

fn default_active() -> bool {
    true
}

/// Application submitted through the public apply form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobApplication {
    pub id: i64,
    #[serde(default)]
    pub career: Option<i64>,
    #[serde(default)]
    pub career_title: Option<String>,
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub cover_letter: Option<String>,
    /// URL of the uploaded resume
    #[serde(default)]
    pub resume: Option<String>,
    #[serde(default)]
    pub applied_at: Option<DateTime<Utc>>,
}
