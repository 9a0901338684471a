//! Common utilities for usb-watchguard
//!
//! This crate provides functionality shared by the denylist library and the
//! `usb-watchguard` binary: error handling, tracing setup, and resolution of
//! the per-user config folder where the denylist is persisted.

pub mod error;
pub mod logging;
pub mod paths;

pub use error::{Error, Result};
pub use logging::setup_logging;
pub use paths::{APP_FOLDER, ConfigFolder};
