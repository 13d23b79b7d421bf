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
