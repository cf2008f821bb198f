//! Auth contexts, cached bearer tokens, and the single-flight token cache.

pub mod context;
pub mod manager;
pub mod token;

pub use context::*;
pub use manager::*;
pub use token::*;
