//! `chatrelay ask` — Single-message mode.

use std::path::PathBuf;

pub async fn run(
    message: &str,
    agent: bool,
    workspace: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let session = super::build_session(workspace)?;
    let agent_mode = agent || session.agent_mode();

    eprint!("  Thinking...");
    let reply = session.respond(message, agent_mode).await;
    eprint!("\r              \r");
    println!("{reply}");

    Ok(())
}
