//! Prompt construction for agent-mode turns.

use std::path::Path;

/// Markers around a tool result appended to the prompt.
pub const TOOL_RESULT_OPEN: &str = "[TOOL_RESULT]";
pub const TOOL_RESULT_CLOSE: &str = "[END_TOOL_RESULT]";

const INSTRUCTIONS: &str = "\
You are an assistant running inside the user's code editor. You can work with \
files in the open workspace by writing exactly one of these commands in your reply:

[READ_FILE: relative/path/to/file]
    Reads the file. Its content will be sent back to you.

[WRITE_FILE: relative/path/to/file]
<the complete new file content>
[END_WRITE_FILE]
    Creates or overwrites the file.

Use at most one command per reply. Paths are relative to the workspace root.
After any file operation, give the user a short summary of what you did.";

/// The accumulated text sent to the generation endpoint during one turn.
///
/// It only ever grows: tool results are appended, nothing is removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt(String);

impl Prompt {
    /// Wrap the user's message in the agent instructions.
    pub fn for_message(user_message: &str, workspace_root: &Path) -> Self {
        Self(format!(
            "{INSTRUCTIONS}\n\nWorkspace root: {}\n\nUser request:\n{user_message}",
            workspace_root.display()
        ))
    }

    /// Append the content of a file that was read for the model.
    pub fn append_tool_result(&mut self, path: &str, content: &str) {
        self.0.push_str(&format!(
            "\n\n{TOOL_RESULT_OPEN}\nContent of {path}:\n{content}\n{TOOL_RESULT_CLOSE}\n\n\
             Using the file content above, answer the user's request. \
             Do not issue another file command."
        ));
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_prompt_declares_both_commands_and_root() {
        let prompt = Prompt::for_message("tidy up my notes", Path::new("/home/me/project"));
        let text = prompt.as_str();
        assert!(text.contains("[READ_FILE:"));
        assert!(text.contains("[WRITE_FILE:"));
        assert!(text.contains("[END_WRITE_FILE]"));
        assert!(text.contains("/home/me/project"));
        assert!(text.ends_with("tidy up my notes"));
    }

    #[test]
    fn tool_result_is_appended_in_a_delimited_block() {
        let mut prompt = Prompt::for_message("what's on my list?", Path::new("/ws"));
        let before = prompt.clone();
        prompt.append_tool_result("notes.txt", "buy milk");

        assert!(prompt.as_str().starts_with(before.as_str()));
        assert!(prompt.len() > before.len());

        let text = prompt.as_str();
        let open = text.find(TOOL_RESULT_OPEN).unwrap();
        let close = text.find(TOOL_RESULT_CLOSE).unwrap();
        let block = &text[open..close];
        assert!(block.contains("notes.txt"));
        assert!(block.contains("buy milk"));
    }
}
