//! # Equinox Common Library
//!
//! Shared code for the Equinox banking dashboard service including:
//! - Error taxonomy (Error enum, Result alias)
//! - Configuration resolution
//! - Database pool and schema initialization
//! - Domain models (Identity, VerificationProfile)

pub mod config;
pub mod db;
pub mod error;
pub mod models;

pub use error::{Error, Result};
