//! Domain event system — decoupled observation of what a turn did.
//!
//! The agent loop and the chat session publish events as they go; anything
//! that wants to count generation calls or directive fallthroughs subscribes.

use crate::directive::{DirectiveKind, Fallthrough};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;

/// All domain events in the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DomainEvent {
    /// A user message reached the session
    MessageReceived {
        content_preview: String,
        agent_mode: bool,
        timestamp: DateTime<Utc>,
    },

    /// A generation call returned a reply
    GenerationCompleted {
        /// 1 for the initial call, 2 for the follow-up
        call: u8,
        chars: usize,
        timestamp: DateTime<Utc>,
    },

    /// A generation call failed
    GenerationFailed {
        call: u8,
        error_message: String,
        timestamp: DateTime<Utc>,
    },

    /// A directive was executed against the workspace
    DirectiveExecuted {
        kind: DirectiveKind,
        path: String,
        success: bool,
        duration_ms: u64,
        timestamp: DateTime<Utc>,
    },

    /// A marker was present in a reply but not accepted
    DirectiveFallthrough {
        reason: Fallthrough,
        timestamp: DateTime<Utc>,
    },

    /// The user flipped agent mode
    AgentModeChanged {
        enabled: bool,
        timestamp: DateTime<Utc>,
    },
}

/// A broadcast-based event bus for domain events.
///
/// Uses `tokio::sync::broadcast` for multi-consumer pub/sub.
pub struct EventBus {
    sender: broadcast::Sender<Arc<DomainEvent>>,
}

impl EventBus {
    /// Create a new event bus with the given capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all subscribers.
    pub fn publish(&self, event: DomainEvent) {
        // No subscribers is fine
        let _ = self.sender.send(Arc::new(event));
    }

    /// Subscribe to receive events.
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<DomainEvent>> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}
