use serde::{Deserialize, Serialize};

/// Team member shown on the about page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMember {
    pub id: i64,
    pub name: String,
    pub role: String,
    #[serde(default)]
    pub bio: Option<String>,
    /// URL of the member photo
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub order: Option<i32>,
}
