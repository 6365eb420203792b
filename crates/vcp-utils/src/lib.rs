//! Shared utilities for the VCP dashboard
//!
//! This crate provides the process-level pieces shared by the workspace:
//! logging setup and the environment-driven application config.

pub mod config;
pub mod logging;

pub use config::{Config, LogFormat};
pub use logging::init_tracing_with;
