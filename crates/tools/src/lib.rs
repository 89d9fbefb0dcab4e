//! Workspace access implementations for ChatRelay.
//!
//! The agent loop only sees `chatrelay_core::WorkspaceFileAccessor`; this
//! crate provides the one that talks to the local disk.

pub mod local_fs;

pub use local_fs::LocalWorkspace;
