//! CLI channel — interactive terminal-based chat.
//!
//! Reads lines from stdin and prints replies to stdout. Used for
//! `chatrelay chat`. The loading indicator goes to stderr so piped output
//! stays clean.

use crate::protocol::{HostInbound, HostOutbound};
use crate::{ChannelError, HostChannel};
use async_trait::async_trait;
use std::io::Write;
use tokio::io::{self, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

const PROMPT: &str = "  You > ";
const LOADING: &str = "  ...";

/// What one line of terminal input means.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliInput {
    Message(HostInbound),
    Skip,
    Exit,
}

/// Interpret a line typed at the terminal.
///
/// `/agent on` and `/agent off` flip agent mode; `exit`, `quit` and friends
/// end the session; anything else is a chat message.
pub fn parse_line(line: &str) -> CliInput {
    let line = line.trim();
    if line.is_empty() {
        return CliInput::Skip;
    }

    if matches!(line, "exit" | "quit" | "/exit" | "/quit" | ":q") {
        return CliInput::Exit;
    }

    if let Some(arg) = line.strip_prefix("/agent") {
        match arg.trim() {
            "on" => return CliInput::Message(HostInbound::SetAgentMode { enabled: true }),
            "off" => return CliInput::Message(HostInbound::SetAgentMode { enabled: false }),
            _ => {}
        }
    }

    CliInput::Message(HostInbound::SendMessage { text: line.into() })
}

/// Format a reply the way the terminal shows it.
pub fn render_reply(text: &str) -> String {
    let mut out = String::from("\n");
    for line in text.lines() {
        out.push_str("  Assistant > ");
        out.push_str(line);
        out.push('\n');
    }
    out
}

/// Interactive CLI channel for terminal-based chat.
pub struct CliChannel;

impl CliChannel {
    pub fn new() -> Self {
        Self
    }

    fn show_prompt() {
        print!("{PROMPT}");
        let _ = std::io::stdout().flush();
    }
}

impl Default for CliChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HostChannel for CliChannel {
    fn name(&self) -> &str {
        "cli"
    }

    async fn start(
        &self,
    ) -> Result<mpsc::Receiver<Result<HostInbound, ChannelError>>, ChannelError> {
        let (tx, rx) = mpsc::channel(32);

        tokio::spawn(async move {
            let mut lines = BufReader::new(io::stdin()).lines();

            Self::show_prompt();
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => match parse_line(&line) {
                        CliInput::Exit => break,
                        CliInput::Skip => Self::show_prompt(),
                        CliInput::Message(msg) => {
                            // Toggles get no reply, so re-prompt here
                            let toggle = match &msg {
                                HostInbound::SetAgentMode { enabled } => {
                                    println!("  Agent mode {}", if *enabled { "on" } else { "off" });
                                    true
                                }
                                HostInbound::SendMessage { .. } => false,
                            };
                            if tx.send(Ok(msg)).await.is_err() {
                                break;
                            }
                            if toggle {
                                Self::show_prompt();
                            }
                        }
                    },
                    // EOF (Ctrl+D)
                    Ok(None) => break,
                    Err(e) => {
                        let _ = tx.send(Err(ChannelError::ConnectionLost(e.to_string()))).await;
                        break;
                    }
                }
            }
        });

        Ok(rx)
    }

    async fn send(&self, message: &HostOutbound) -> Result<(), ChannelError> {
        match message {
            HostOutbound::ShowLoading => {
                eprint!("{LOADING}");
                let _ = std::io::stderr().flush();
            }
            HostOutbound::HideLoading => {
                eprint!("\r{}\r", " ".repeat(LOADING.len()));
                Self::show_prompt();
            }
            HostOutbound::ReceiveMessage { text } => {
                println!("{}", render_reply(text));
            }
        }
        Ok(())
    }
}
