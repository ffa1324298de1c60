//! Application layer orchestrating domain logic and infrastructure.

pub mod aggregate;
pub mod resolve;
pub mod tabs;
