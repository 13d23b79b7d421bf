//! Career and job application DTOs

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{push_optional, FormFields};

pub use crate::common::{Career, JobApplication};

/// Create job opening request
///
/// Used for POST /api/careers/
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCareerRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 100))]
    pub department: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub location: String,
    #[serde(rename = "job_type")]
    #[validate(length(min = 1, max = 50))]
    pub employment_type: String,
    #[validate(length(min = 1))]
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requirements: Option<String>,
    pub is_active: bool,
}

/// Partial job opening update
///
/// Used for PATCH /api/careers/{id}/. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateCareerRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 100))]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 200))]
    pub location: Option<String>,
    #[serde(rename = "job_type", skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 50))]
    pub employment_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1))]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requirements: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// Text parts of the public application form
///
/// Sent with the resume file to POST /api/apply/
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ApplicationFields {
    pub career: i64,
    #[validate(length(min = 1, max = 200))]
    pub full_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(max = 30))]
    pub phone: Option<String>,
    pub cover_letter: Option<String>,
}

impl FormFields for ApplicationFields {
    fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("career", self.career.to_string()),
            ("full_name", self.full_name.clone()),
            ("email", self.email.clone()),
        ];
        push_optional(&mut fields, "phone", self.phone.as_ref());
        push_optional(&mut fields, "cover_letter", self.cover_letter.as_ref());
        fields
    }
}
