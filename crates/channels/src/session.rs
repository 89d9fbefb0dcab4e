//! Chat session — the presentation boundary.
//!
//! A session lives as long as the chat panel. It owns the agent-mode flag,
//! serializes turns, and turns every failure into text for the chat window.

use crate::protocol::{HostInbound, HostOutbound};
use crate::{ChannelError, HostChannel};
use chatrelay_agent::{AgentLoop, TurnError};
use chatrelay_core::event::DomainEvent;
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

const PREVIEW_CHARS: usize = 80;

pub struct ChatSession {
    agent: AgentLoop,

    /// Directory directive paths resolve against. `None` = no folder open.
    workspace_root: Option<PathBuf>,

    agent_mode: AtomicBool,

    /// Held for the duration of a turn so file operations never interleave.
    turn_lock: Mutex<()>,
}

impl ChatSession {
    pub fn new(agent: AgentLoop, workspace_root: Option<PathBuf>) -> Self {
        Self {
            agent,
            workspace_root,
            agent_mode: AtomicBool::new(false),
            turn_lock: Mutex::new(()),
        }
    }

    /// Set the initial agent-mode flag.
    pub fn with_agent_mode(self, enabled: bool) -> Self {
        self.agent_mode.store(enabled, Ordering::SeqCst);
        self
    }

    pub fn agent_mode(&self) -> bool {
        self.agent_mode.load(Ordering::SeqCst)
    }

    pub fn workspace_root(&self) -> Option<&Path> {
        self.workspace_root.as_deref()
    }

    pub fn on_toggle_agent_mode(&self, enabled: bool) {
        let previous = self.agent_mode.swap(enabled, Ordering::SeqCst);
        if previous != enabled {
            info!(enabled, "Agent mode changed");
            self.agent.event_bus().publish(DomainEvent::AgentModeChanged {
                enabled,
                timestamp: Utc::now(),
            });
        }
    }

    /// The panel went away: agent mode does not survive it.
    pub fn dispose(&self) {
        debug!("Chat session disposed");
        self.on_toggle_agent_mode(false);
    }

    /// Answer a user message using the session's current agent-mode flag.
    pub async fn on_user_message(&self, text: &str) -> String {
        let agent_mode = self.agent_mode();
        self.respond(text, agent_mode).await
    }

    /// Answer a user message with an explicit agent-mode setting.
    ///
    /// Never fails: errors come back as the text to display.
    pub async fn respond(&self, text: &str, agent_mode: bool) -> String {
        let _turn = self.turn_lock.lock().await;

        info!(agent_mode, "User message: {}", preview(text));
        self.agent.event_bus().publish(DomainEvent::MessageReceived {
            content_preview: preview(text),
            agent_mode,
            timestamp: Utc::now(),
        });

        if agent_mode {
            return self.agent.run(text, self.workspace_root()).await;
        }

        match self.agent.generator().generate(text).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %e, "Generation failed");
                TurnError::Generation(e).to_string()
            }
        }
    }

    /// Handle one message from the host, replying through `channel`.
    pub async fn handle(
        &self,
        message: HostInbound,
        channel: &dyn HostChannel,
    ) -> Result<(), ChannelError> {
        match message {
            HostInbound::SetAgentMode { enabled } => {
                self.on_toggle_agent_mode(enabled);
                Ok(())
            }
            HostInbound::SendMessage { text } => {
                let text = text.trim();
                if text.is_empty() {
                    return Ok(());
                }

                channel.send(&HostOutbound::ShowLoading).await?;
                let reply = self.on_user_message(text).await;
                channel
                    .send(&HostOutbound::ReceiveMessage { text: reply })
                    .await?;
                channel.send(&HostOutbound::HideLoading).await
            }
        }
    }

    /// Pump messages from `channel` until the host goes away, then dispose.
    pub async fn serve(&self, channel: &dyn HostChannel) -> Result<(), ChannelError> {
        let mut rx = channel.start().await?;
        info!(channel = channel.name(), "Chat session started");

        while let Some(item) = rx.recv().await {
            match item {
                Ok(message) => {
                    // A reply that cannot be delivered means the host is gone
                    if let Err(e) = self.handle(message, channel).await {
                        self.dispose();
                        return Err(e);
                    }
                }
                Err(ChannelError::InvalidMessage(reason)) => {
                    warn!(%reason, "Skipping invalid host message");
                }
                Err(e) => {
                    self.dispose();
                    return Err(e);
                }
            }
        }

        self.dispose();
        Ok(())
    }
}

fn preview(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}…")
    } else {
        head
    }
}
