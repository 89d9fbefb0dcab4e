//! The agent-mode turn — the heart of ChatRelay.
//!
//! One turn follows a fixed, non-recursive shape:
//!
//! 1. **Wrap** the user message in instructions that declare the file commands
//! 2. **Generate** a reply from the endpoint
//! 3. **Scan** the reply for a `[READ_FILE: …]` or `[WRITE_FILE: …]` directive
//! 4. **Read**: append the file inside a `[TOOL_RESULT]` block and generate
//!    exactly once more; that reply is the answer
//! 5. **Write**: write the file and confirm; no further generation
//!
//! At most one file operation and two generation calls happen per turn.

pub mod loop_runner;
pub mod prompt;

#[cfg(test)]
mod test_helpers;

pub use loop_runner::{AgentLoop, TurnError, TurnOutcome};
pub use prompt::Prompt;
