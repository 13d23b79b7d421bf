//! Wire types shared between the sitedesk client and the site CMS backend
//!
//! - `common`: resource representations returned by the backend
//! - `api`: request bodies, validated before they leave the client

pub mod api;
pub mod common;
