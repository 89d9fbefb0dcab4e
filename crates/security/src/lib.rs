//! Security module for ChatRelay.
//!
//! Provides:
//! - **Path validation**: keep directive paths inside the workspace root

pub mod path;

pub use path::{PathPolicy, PathValidationError, resolve_in_workspace};
