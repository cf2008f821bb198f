//! Test data: LIFO cleanup tracking, randomized request builders, and tracked user creation.

pub mod cleanup;
pub mod factory;
pub mod manager;

pub use cleanup::*;
pub use factory::*;
pub use manager::*;
