//! `chatrelay serve` — JSON-lines host protocol over stdio.
//!
//! The host starts with agent mode off and sends `setAgentMode` to change it.

use chatrelay_channels::JsonLinesChannel;
use std::path::PathBuf;
use tracing::info;

pub async fn run(workspace: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let session = super::build_session(workspace)?.with_agent_mode(false);
    let channel = JsonLinesChannel::stdio();

    session.serve(&channel).await?;
    info!("Host disconnected");

    Ok(())
}
