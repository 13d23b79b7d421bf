//! Authentication-related common types

use serde::{Deserialize, Serialize};

/// Payload of a successful `POST /api/login/`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(alias = "userId")]
    pub user_id: i64,
    pub username: String,
}
