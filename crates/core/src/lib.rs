//! # ChatRelay Core
//!
//! Domain types, traits, and error definitions for the ChatRelay chat agent.
//! This crate has **no transport or filesystem dependencies**: it defines the
//! model that the other crates implement against.
//!
//! ## Design Philosophy
//!
//! The two outside collaborators of a chat turn are defined as traits here:
//! - [`TextGenerator`]: sends a prompt somewhere and returns the reply text
//! - [`WorkspaceFileAccessor`]: reads and writes files for the agent
//!
//! Implementations live in `chatrelay-providers` and `chatrelay-tools`, so the
//! agent loop can be tested with scripted stand-ins for both.

pub mod directive;
pub mod error;
pub mod event;
pub mod generation;
pub mod workspace;

// Re-export key types at crate root for ergonomics
pub use directive::{Directive, DirectiveKind, Fallthrough, Scan};
pub use error::{GenerationError, WorkspaceError};
pub use event::{DomainEvent, EventBus};
pub use generation::TextGenerator;
pub use workspace::WorkspaceFileAccessor;
