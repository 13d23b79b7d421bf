use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One-time access code issued by an admin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessCode {
    pub id: i64,
    pub code: String,
    #[serde(default)]
    pub is_used: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub used_at: Option<DateTime<Utc>>,
}
