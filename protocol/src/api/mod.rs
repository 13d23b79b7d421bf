//! API DTOs module
//!
//! Request bodies organised by resource. JSON bodies serialize directly;
//! multipart bodies expose their text parts through [`FormFields`].

pub mod auth;
pub mod career;
pub mod code;
pub mod gallery;
pub mod message;
pub mod team;

pub use auth::*;
pub use career::*;
pub use code::*;
pub use gallery::*;
pub use message::*;
pub use team::*;

/// Text parts of a multipart request body, in submission order
pub trait FormFields {
    fn form_fields(&self) -> Vec<(&'static str, String)>;
}

pub(crate) fn push_optional(
    fields: &mut Vec<(&'static str, String)>,
    name: &'static str,
    value: Option<&impl ToString>,
) {
    if let Some(value) = value {
        fields.push((name, value.to_string()));
    }
}
