//! Subcommand implementations.

pub mod ask;
pub mod chat;
pub mod init;
pub mod serve;

use chatrelay_agent::AgentLoop;
use chatrelay_channels::ChatSession;
use chatrelay_config::AppConfig;
use chatrelay_providers::HttpGenerationClient;
use chatrelay_security::PathPolicy;
use chatrelay_tools::LocalWorkspace;
use std::path::PathBuf;
use std::sync::Arc;

/// Load config and wire a chat session from it.
///
/// The workspace folder is `--workspace`, else `workspace.root` from config,
/// else the current directory.
pub fn build_session(workspace: Option<PathBuf>) -> Result<ChatSession, Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    Ok(session_from_config(&config, workspace))
}

fn session_from_config(config: &AppConfig, workspace: Option<PathBuf>) -> ChatSession {
    let generator = Arc::new(HttpGenerationClient::from_config(&config.endpoint));
    let files = Arc::new(LocalWorkspace::new().with_max_file_bytes(config.workspace.max_file_bytes));
    let policy = PathPolicy {
        reject_traversal: config.workspace.reject_traversal,
    };

    let root = workspace
        .or_else(|| config.workspace.root.as_ref().map(PathBuf::from))
        .or_else(|| std::env::current_dir().ok());
    if let Some(root) = &root {
        tracing::debug!(root = %root.display(), endpoint = %config.endpoint.base_url, "Session configured");
    }

    let agent = AgentLoop::new(generator, files).with_path_policy(policy);
    ChatSession::new(agent, root).with_agent_mode(config.session.agent_mode)
}
