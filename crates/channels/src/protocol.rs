//! Host UI messages.
//!
//! Serialized as JSON objects tagged by `command`, e.g.
//! `{"command":"sendMessage","text":"hi"}` or `{"command":"showLoading"}`.

use serde::{Deserialize, Serialize};

/// Messages from the host UI to the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum HostInbound {
    /// The user submitted a chat message.
    SendMessage { text: String },

    /// The user flipped the agent-mode toggle.
    SetAgentMode { enabled: bool },
}

/// Messages from the session to the host UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum HostOutbound {
    /// Text to show as the assistant's reply.
    ReceiveMessage { text: String },

    ShowLoading,

    HideLoading,
}
