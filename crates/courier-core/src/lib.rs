//! # courier-core
//!
//! Core types, traits, configuration, and error handling for courier.

pub mod config;
pub mod error;
pub mod traits;
pub mod types;
