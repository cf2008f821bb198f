//! Typed backend clients, one per API area, plus the Mailpit client.
//!
//! Every client is a cheap clone over [`ApiClient`](crate::http::ApiClient) and returns the raw
//! [`ApiResponse`](crate::http::ApiResponse) so tests can assert on negative paths too.

pub mod audit;
pub mod auth;
pub mod department;
pub mod mail;
pub mod notification;
pub mod resource;
pub mod user;
pub mod webhook;

pub use audit::*;
pub use auth::*;
pub use department::*;
pub use mail::*;
pub use notification::*;
pub use resource::*;
pub use user::*;
pub use webhook::*;
