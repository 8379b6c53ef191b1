//! Domain layer - core business logic and entities

pub mod pool;
pub mod swap;
pub mod execution;
