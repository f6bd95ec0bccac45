//! Core types and configuration for laraship.
//!
//! This crate defines the `laraship.toml` schema ([`LarashipConfig`]), the
//! [`Directory`] snapshot type every artifact travels as, the declarative
//! [`ImageSpec`] value, and shared error types.

pub mod config;
pub mod directory;
pub mod error;
pub mod image;

pub use config::{BuildConfig, CONFIG_FILE, LarashipConfig, SourceConfig};
pub use directory::Directory;
pub use error::{Error, Result};
pub use image::{ImageSpec, Op};
