//! Authentication API DTOs

use serde::{Deserialize, Serialize};
use validator::Validate;

pub use crate::common::LoginResponse;

/// Admin login request for `POST /api/login/`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 150))]
    pub username: String,
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}
