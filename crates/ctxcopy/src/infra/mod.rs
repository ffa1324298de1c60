//! Infrastructure adapters for config, clipboard, and scratch-file delivery.

pub mod clipboard;
pub mod config;
pub mod scratch;
