//! `chatrelay chat` — Interactive terminal chat.

use chatrelay_channels::CliChannel;
use std::path::PathBuf;

pub async fn run(agent: bool, workspace: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = super::build_session(workspace)?;
    if agent {
        session = session.with_agent_mode(true);
    }

    println!();
    println!("  ChatRelay — Interactive Mode");
    println!();
    match session.workspace_root() {
        Some(root) => println!("  Workspace:   {}", root.display()),
        None => println!("  Workspace:   (none)"),
    }
    println!(
        "  Agent mode:  {}",
        if session.agent_mode() { "on" } else { "off" }
    );
    println!();
    println!("  Type your message and press Enter.");
    println!("  '/agent on' or '/agent off' toggles agent mode.");
    println!("  Type 'exit' or Ctrl+D to quit.");
    println!();

    let channel = CliChannel::new();
    session
        .serve(&channel)
        .await
        .map_err(|e| format!("Channel error: {e}"))?;

    println!();
    println!("  Goodbye!");
    println!();

    Ok(())
}
