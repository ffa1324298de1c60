//! Core data model for document references, tabs, and resolution errors.

pub mod errors;
pub mod model;
