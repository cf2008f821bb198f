//! Request and response models for every backend area.
//!
//! Backend payloads are camelCase JSON and may grow new fields at any time, so response
//! models ignore unknown keys and default missing ones.

pub mod audit;
pub mod auth;
pub mod club;
pub mod common;
pub mod department;
pub mod document;
pub mod enums;
pub mod mail;
pub mod notification;
pub mod project;
pub mod user;

pub use audit::*;
pub use auth::*;
pub use club::*;
pub use common::*;
pub use department::*;
pub use document::*;
pub use enums::*;
pub use mail::*;
pub use notification::*;
pub use project::*;
pub use user::*;
