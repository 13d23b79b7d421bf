//! Client library for the marketing site CMS backend
//!
//! [`client::HttpClient`] talks to the REST API and owns a
//! [`store::TokenStore`] for the admin session. Each resource has a thin
//! service wrapper (`CareerService`, `TeamService`, ...) that borrows the
//! client.

pub mod applications;
pub mod auth;
pub mod careers;
pub mod client;
pub mod codes;
pub mod config;
pub mod error;
pub mod gallery;
pub mod helpers;
pub mod messages;
pub mod retry;
pub mod storage;
pub mod store;
pub mod team;
pub mod transport;

pub use applications::ApplicationService;
pub use auth::{AuthService, SessionStatus};
pub use careers::CareerService;
pub use client::{ApiResponse, BaseClient, HttpClient, RequestOptions};
pub use codes::CodeService;
pub use config::Config;
pub use error::{DeskError, ErrorCode, Result};
pub use gallery::GalleryService;
pub use messages::MessageService;
pub use retry::{fetch_with_retry, RetryOptions};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use store::{Credential, SessionUser, TokenStore};
pub use team::TeamService;
pub use transport::{FilePart, MultipartForm, ReqwestTransport, Transport};

pub use sitedesk_protocol as protocol;
