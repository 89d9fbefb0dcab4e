//! Chat session and host channels for ChatRelay.
//!
//! The [`ChatSession`] is the presentation boundary: it takes the user's text,
//! decides between a plain generation call and an agent-mode turn, and always
//! answers with display text. Channels carry the host's UI messages to it:
//!
//! - **cli**: a human at a terminal
//! - **json_lines**: an editor host speaking JSON messages over stdio

pub mod cli;
pub mod json_lines;
pub mod protocol;
pub mod session;

use async_trait::async_trait;
use tokio::sync::mpsc;

pub use cli::CliChannel;
pub use json_lines::JsonLinesChannel;
pub use protocol::{HostInbound, HostOutbound};
pub use session::ChatSession;

/// Errors raised while moving messages between the host and the session.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("Channel connection lost: {0}")]
    ConnectionLost(String),

    #[error("Invalid host message: {0}")]
    InvalidMessage(String),

    #[error("Message delivery failed: {0}")]
    DeliveryFailed(String),
}

/// A transport between the host UI and a chat session.
#[async_trait]
pub trait HostChannel: Send + Sync {
    /// A short name for logs (e.g. "cli").
    fn name(&self) -> &str;

    /// Start listening. The receiver yields inbound messages until the host
    /// goes away.
    async fn start(
        &self,
    ) -> Result<mpsc::Receiver<Result<HostInbound, ChannelError>>, ChannelError>;

    /// Deliver one outbound message to the host.
    async fn send(&self, message: &HostOutbound) -> Result<(), ChannelError>;
}
