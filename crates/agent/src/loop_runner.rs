//! The agent-mode turn implementation.

use crate::prompt::Prompt;
use chatrelay_core::directive::{self, Directive, DirectiveKind, Scan};
use chatrelay_core::error::{GenerationError, WorkspaceError};
use chatrelay_core::event::{DomainEvent, EventBus};
use chatrelay_core::generation::TextGenerator;
use chatrelay_core::workspace::WorkspaceFileAccessor;
use chatrelay_security::{PathPolicy, resolve_in_workspace};
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// How a turn ended when nothing went wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The reply carried no directive and is returned unchanged.
    Plain(String),

    /// A file was read and fed back; this is the follow-up reply.
    Answered { path: String, reply: String },

    /// A file was written. No follow-up call is made for writes.
    Written { path: String, bytes: usize },
}

impl TurnOutcome {
    /// The text to show the user.
    pub fn into_display(self) -> String {
        match self {
            TurnOutcome::Plain(reply) | TurnOutcome::Answered { reply, .. } => reply,
            TurnOutcome::Written { path, bytes } => {
                format!("Wrote {bytes} bytes to {path}.")
            }
        }
    }
}

/// How a turn ended when something went wrong. Every variant renders as a
/// message fit for the chat window.
#[derive(Debug, thiserror::Error)]
pub enum TurnError {
    #[error("No workspace folder is open. Open a folder to let the assistant work with files.")]
    NoWorkspace,

    #[error("Could not get a response from the text generation service: {0}")]
    Generation(GenerationError),

    #[error("The assistant asked to read '{path}', but it could not be read: {source}")]
    Read {
        path: String,
        source: WorkspaceError,
    },

    #[error("The assistant asked to write '{path}', but it could not be written: {source}")]
    Write {
        path: String,
        source: WorkspaceError,
    },

    #[error("Read '{path}', but the follow-up request failed: {source}")]
    Followup {
        path: String,
        source: GenerationError,
    },
}

/// Runs one agent-mode turn: generate, execute at most one directive, and
/// for reads generate exactly once more.
pub struct AgentLoop {
    /// Where prompts are sent
    generator: Arc<dyn TextGenerator>,

    /// Host-provided file access
    workspace: Arc<dyn WorkspaceFileAccessor>,

    /// How directive paths are checked before touching the disk
    path_policy: PathPolicy,

    /// Event bus for domain events
    event_bus: Arc<EventBus>,
}

impl AgentLoop {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        workspace: Arc<dyn WorkspaceFileAccessor>,
    ) -> Self {
        Self {
            generator,
            workspace,
            path_policy: PathPolicy::default(),
            event_bus: Arc::new(EventBus::default()),
        }
    }

    pub fn with_path_policy(mut self, policy: PathPolicy) -> Self {
        self.path_policy = policy;
        self
    }

    pub fn with_event_bus(mut self, event_bus: Arc<EventBus>) -> Self {
        self.event_bus = event_bus;
        self
    }

    pub fn generator(&self) -> &Arc<dyn TextGenerator> {
        &self.generator
    }

    pub fn event_bus(&self) -> &Arc<EventBus> {
        &self.event_bus
    }

    /// Run a turn and render whatever happened as display text.
    pub async fn run(&self, user_message: &str, workspace_root: Option<&Path>) -> String {
        match self.run_turn(user_message, workspace_root).await {
            Ok(outcome) => outcome.into_display(),
            Err(e) => {
                warn!(error = %e, "Agent turn failed");
                e.to_string()
            }
        }
    }

    /// Run a turn, keeping the outcome structured.
    ///
    /// 1. No workspace root: stop before any generation call
    /// 2. Generate from the instruction-wrapped message
    /// 3. Scan the reply; no directive means the reply is the answer
    /// 4. Read: append the file as a tool result, generate once more, return that
    /// 5. Write: write the file and confirm, with no further generation
    pub async fn run_turn(
        &self,
        user_message: &str,
        workspace_root: Option<&Path>,
    ) -> Result<TurnOutcome, TurnError> {
        let Some(root) = workspace_root else {
            debug!("Agent turn without a workspace root");
            return Err(TurnError::NoWorkspace);
        };

        let mut prompt = Prompt::for_message(user_message, root);
        let reply = self
            .generate(1, &prompt)
            .await
            .map_err(TurnError::Generation)?;

        let scan = directive::scan(&reply);
        self.report_fallthroughs(&scan);

        let Some(found) = scan.into_directive() else {
            return Ok(TurnOutcome::Plain(reply));
        };

        info!(kind = %found.kind(), path = %found.path(), "Executing directive");

        match found {
            Directive::Read { path } => {
                let content = self.read_file(root, &path).await?;
                prompt.append_tool_result(&path, &content);

                // One follow-up only: a directive in this reply is not executed.
                let reply = match self.generate(2, &prompt).await {
                    Ok(reply) => reply,
                    Err(source) => return Err(TurnError::Followup { path, source }),
                };
                if directive::parse(&reply).is_some() {
                    debug!("Follow-up reply contains a directive; not executing it");
                }
                Ok(TurnOutcome::Answered { path, reply })
            }
            Directive::Write { path, content } => {
                self.write_file(root, &path, &content).await?;
                Ok(TurnOutcome::Written {
                    bytes: content.len(),
                    path,
                })
            }
        }
    }

    async fn generate(&self, call: u8, prompt: &Prompt) -> Result<String, GenerationError> {
        debug!(
            generator = %self.generator.name(),
            call,
            prompt_chars = prompt.len(),
            "Generation call"
        );

        match self.generator.generate(prompt.as_str()).await {
            Ok(reply) => {
                self.event_bus.publish(DomainEvent::GenerationCompleted {
                    call,
                    chars: reply.len(),
                    timestamp: Utc::now(),
                });
                Ok(reply)
            }
            Err(e) => {
                self.event_bus.publish(DomainEvent::GenerationFailed {
                    call,
                    error_message: e.to_string(),
                    timestamp: Utc::now(),
                });
                Err(e)
            }
        }
    }

    fn report_fallthroughs(&self, scan: &Scan) {
        for reason in &scan.fallthroughs {
            warn!(%reason, "Ignoring malformed directive marker");
            self.event_bus.publish(DomainEvent::DirectiveFallthrough {
                reason: reason.clone(),
                timestamp: Utc::now(),
            });
        }
    }

    fn resolve(&self, root: &Path, path: &str) -> Result<PathBuf, WorkspaceError> {
        resolve_in_workspace(root, path, self.path_policy).map_err(|e| {
            WorkspaceError::PathRejected {
                path: path.to_string(),
                reason: e.to_string(),
            }
        })
    }

    async fn read_file(&self, root: &Path, path: &str) -> Result<String, TurnError> {
        let start = std::time::Instant::now();
        let result = match self.resolve(root, path) {
            Ok(full) => self.workspace.read_text(&full).await,
            Err(e) => Err(e),
        };
        self.publish_executed(DirectiveKind::Read, path, result.is_ok(), start);

        result.map_err(|source| TurnError::Read {
            path: path.to_string(),
            source,
        })
    }

    async fn write_file(&self, root: &Path, path: &str, content: &str) -> Result<(), TurnError> {
        let start = std::time::Instant::now();
        let result = match self.resolve(root, path) {
            Ok(full) => self.workspace.write_text(&full, content).await,
            Err(e) => Err(e),
        };
        self.publish_executed(DirectiveKind::Write, path, result.is_ok(), start);

        result.map_err(|source| TurnError::Write {
            path: path.to_string(),
            source,
        })
    }

    fn publish_executed(
        &self,
        kind: DirectiveKind,
        path: &str,
        success: bool,
        start: std::time::Instant,
    ) {
        self.event_bus.publish(DomainEvent::DirectiveExecuted {
            kind,
            path: path.to_string(),
            success,
            duration_ms: start.elapsed().as_millis() as u64,
            timestamp: Utc::now(),
        });
    }
}
