//! # WKMP Common Library
//!
//! Shared code for the WKMP entity tooling including:
//! - Common error and result types
//! - TOML bootstrap configuration loading
//! - Tracing subscriber initialization

pub mod config;
pub mod error;
pub mod logging;

pub use error::{Error, Result};
