//! Shared utilities for the profile-agent workspace
//!
//! This crate provides logging setup and small environment helpers used by
//! the library crates and the binaries.

pub mod config;
pub mod logging;

pub use config::{env_flag, env_var, first_env_var};
pub use logging::{LogFormat, init_tracing, init_tracing_with};
