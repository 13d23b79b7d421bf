//! Access code DTOs

use serde::{Deserialize, Serialize};
use validator::Validate;

pub use crate::common::AccessCode;

/// Used for POST /api/codes/generate/
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GenerateCodesRequest {
    #[validate(range(min = 1, max = 100))]
    pub count: u32,
}

/// Used for POST /api/codes/use/
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UseCodeRequest {
    #[validate(length(min = 1, max = 64))]
    pub code: String,
}
