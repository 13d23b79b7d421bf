//! Team member DTOs (multipart, the photo travels as a file part)

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{push_optional, FormFields};

pub use crate::common::TeamMember;

/// Text parts for POST /api/team/
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TeamMemberFields {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 1, max = 100))]
    pub role: String,
    pub bio: Option<String>,
    pub order: Option<i32>,
}

impl FormFields for TeamMemberFields {
    fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![("name", self.name.clone()), ("role", self.role.clone())];
        push_optional(&mut fields, "bio", self.bio.as_ref());
        push_optional(&mut fields, "order", self.order.as_ref());
        fields
    }
}

/// Text parts for PATCH /api/team/{id}/
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct TeamMemberUpdate {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub role: Option<String>,
    pub bio: Option<String>,
    pub order: Option<i32>,
}

impl FormFields for TeamMemberUpdate {
    fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = Vec::new();
        push_optional(&mut fields, "name", self.name.as_ref());
        push_optional(&mut fields, "role", self.role.as_ref());
        push_optional(&mut fields, "bio", self.bio.as_ref());
        push_optional(&mut fields, "order", self.order.as_ref());
        fields
    }
}
