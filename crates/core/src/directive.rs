//! Directive parser — file operations embedded in a generation reply.
//!
//! The model asks for a file operation by writing one of two markers
//! literally into its reply:
//!
//! ```text
//! [READ_FILE: notes/todo.txt]
//!
//! [WRITE_FILE: out.txt]
//! file content, any number of lines
//! [END_WRITE_FILE]
//! ```
//!
//! Markers are case-sensitive. A reply carries at most one directive; when a
//! read marker is recognised anywhere in the text it wins over any write block.
//!
//! Scanning is lenient. A marker that does not parse never raises an error:
//! the reply is treated as plain text, and the reason is reported as a
//! [`Fallthrough`] so callers can log and count it.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const READ_MARKER: &str = "[READ_FILE:";
pub const WRITE_MARKER: &str = "[WRITE_FILE:";
pub const END_WRITE_MARKER: &str = "[END_WRITE_FILE]";

/// A file operation requested by the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// Read a workspace-relative file and feed it back to the model.
    Read { path: String },

    /// Write `content` to a workspace-relative file.
    Write { path: String, content: String },
}

impl Directive {
    pub fn kind(&self) -> DirectiveKind {
        match self {
            Directive::Read { .. } => DirectiveKind::Read,
            Directive::Write { .. } => DirectiveKind::Write,
        }
    }

    /// The relative path exactly as the model wrote it (trimmed).
    pub fn path(&self) -> &str {
        match self {
            Directive::Read { path } | Directive::Write { path, .. } => path,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectiveKind {
    Read,
    Write,
}

impl fmt::Display for DirectiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DirectiveKind::Read => write!(f, "read"),
            DirectiveKind::Write => write!(f, "write"),
        }
    }
}

/// Why a marker present in the text was not accepted as a directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", content = "kind", rename_all = "snake_case")]
pub enum Fallthrough {
    /// No `]` on the marker's line.
    Unclosed(DirectiveKind),

    /// Nothing but whitespace between the colon and the `]`.
    EmptyPath(DirectiveKind),

    /// A write header not followed by a newline.
    MissingContentNewline,

    /// A write block without `[END_WRITE_FILE]`.
    MissingEndMarker,
}

impl fmt::Display for Fallthrough {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fallthrough::Unclosed(kind) => write!(f, "{kind} marker is missing its closing bracket"),
            Fallthrough::EmptyPath(kind) => write!(f, "{kind} marker has an empty path"),
            Fallthrough::MissingContentNewline => {
                write!(f, "write marker is not followed by a newline")
            }
            Fallthrough::MissingEndMarker => write!(f, "write block has no {END_WRITE_MARKER}"),
        }
    }
}

/// The full result of scanning one reply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scan {
    /// The recognised directive, if any.
    pub directive: Option<Directive>,

    /// Markers that were present but rejected, in the order they were tried.
    pub fallthroughs: Vec<Fallthrough>,
}

impl Scan {
    pub fn into_directive(self) -> Option<Directive> {
        self.directive
    }

    /// True when the reply had no directive and no marker-like text at all.
    pub fn is_plain(&self) -> bool {
        self.directive.is_none() && self.fallthroughs.is_empty()
    }
}

/// Extract the directive from a reply, if one is recognised.
pub fn parse(reply: &str) -> Option<Directive> {
    scan(reply).into_directive()
}

/// Scan a reply for a directive, keeping track of rejected markers.
///
/// Read markers are tried first, in order of appearance; write blocks are
/// only considered when no read marker was recognised.
pub fn scan(reply: &str) -> Scan {
    let mut fallthroughs = Vec::new();

    for (start, _) in reply.match_indices(READ_MARKER) {
        match bracketed_path(reply, start + READ_MARKER.len(), DirectiveKind::Read) {
            Ok((path, _)) => {
                return Scan {
                    directive: Some(Directive::Read { path }),
                    fallthroughs,
                };
            }
            Err(reason) => fallthroughs.push(reason),
        }
    }

    for (start, _) in reply.match_indices(WRITE_MARKER) {
        match write_block(reply, start + WRITE_MARKER.len()) {
            Ok(directive) => {
                return Scan {
                    directive: Some(directive),
                    fallthroughs,
                };
            }
            Err(reason) => fallthroughs.push(reason),
        }
    }

    Scan {
        directive: None,
        fallthroughs,
    }
}

/// Read `<path>]` starting at `from`. Returns the trimmed path and the byte
/// offset just past the `]`.
fn bracketed_path(
    text: &str,
    from: usize,
    kind: DirectiveKind,
) -> Result<(String, usize), Fallthrough> {
    let rest = &text[from..];
    let line_end = rest.find('\n').unwrap_or(rest.len());
    let close = rest[..line_end]
        .find(']')
        .ok_or(Fallthrough::Unclosed(kind))?;

    let path = rest[..close].trim();
    if path.is_empty() {
        return Err(Fallthrough::EmptyPath(kind));
    }

    Ok((path.to_string(), from + close + 1))
}

fn write_block(text: &str, from: usize) -> Result<Directive, Fallthrough> {
    let (path, after_header) = bracketed_path(text, from, DirectiveKind::Write)?;

    let rest = &text[after_header..];
    let body = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))
        .ok_or(Fallthrough::MissingContentNewline)?;

    let end = body
        .find(END_WRITE_MARKER)
        .ok_or(Fallthrough::MissingEndMarker)?;

    // The newline in front of the end marker is a delimiter, not content.
    let content = &body[..end];
    let content = content
        .strip_suffix("\r\n")
        .or_else(|| content.strip_suffix('\n'))
        .unwrap_or(content);

    Ok(Directive::Write {
        path,
        content: content.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_reply_has_no_directive() {
        let scan = scan("Hello there");
        assert!(scan.is_plain());
        assert_eq!(parse("Hello there"), None);
    }

    #[test]
    fn read_marker_alone() {
        assert_eq!(
            parse("[READ_FILE: notes.txt]"),
            Some(Directive::Read {
                path: "notes.txt".into()
            })
        );
    }

    #[test]
    fn read_marker_inside_prose() {
        let reply = "Let me look at that first.\n[READ_FILE: src/main.rs]\nOne moment.";
        let directive = parse(reply).unwrap();
        assert_eq!(directive.kind(), DirectiveKind::Read);
        assert_eq!(directive.path(), "src/main.rs");
    }

    #[test]
    fn read_path_keeps_inner_spaces() {
        assert_eq!(
            parse("[READ_FILE:   my docs/plan v2.md  ]"),
            Some(Directive::Read {
                path: "my docs/plan v2.md".into()
            })
        );
    }

    #[test]
    fn read_wins_over_write() {
        let reply = "[WRITE_FILE: out.txt]\nhello\n[END_WRITE_FILE]\n[READ_FILE: in.txt]";
        assert_eq!(
            parse(reply),
            Some(Directive::Read {
                path: "in.txt".into()
            })
        );
    }

    #[test]
    fn read_first_ignores_trailing_write_block() {
        let reply = "[READ_FILE: a]\n[WRITE_FILE: b.txt]\nhello\n[END_WRITE_FILE]";
        let scan = scan(reply);
        assert_eq!(
            scan.directive,
            Some(Directive::Read { path: "a".into() })
        );
        assert!(scan.fallthroughs.is_empty());
    }

    #[test]
    fn write_block_content_excludes_delimiting_newlines() {
        let reply = "[WRITE_FILE: out.txt]\nhello\n[END_WRITE_FILE]";
        assert_eq!(
            parse(reply),
            Some(Directive::Write {
                path: "out.txt".into(),
                content: "hello".into(),
            })
        );
    }

    #[test]
    fn write_block_preserves_inner_blank_lines() {
        let reply = "Sure!\n[WRITE_FILE: a/b.md]\n# Title\n\nbody\n\n[END_WRITE_FILE]\nDone.";
        assert_eq!(
            parse(reply),
            Some(Directive::Write {
                path: "a/b.md".into(),
                content: "# Title\n\nbody\n".into(),
            })
        );
    }

    #[test]
    fn write_block_with_empty_content() {
        let reply = "[WRITE_FILE: empty.txt]\n[END_WRITE_FILE]";
        assert_eq!(
            parse(reply),
            Some(Directive::Write {
                path: "empty.txt".into(),
                content: String::new(),
            })
        );
    }

    #[test]
    fn write_block_with_crlf_line_endings() {
        let reply = "[WRITE_FILE: win.txt]\r\nline one\r\nline two\r\n[END_WRITE_FILE]";
        assert_eq!(
            parse(reply),
            Some(Directive::Write {
                path: "win.txt".into(),
                content: "line one\r\nline two".into(),
            })
        );
    }

    #[test]
    fn write_without_end_marker_falls_through() {
        let scan = scan("[WRITE_FILE: out.txt]\nhello");
        assert_eq!(scan.directive, None);
        assert_eq!(scan.fallthroughs, vec![Fallthrough::MissingEndMarker]);
    }

    #[test]
    fn write_without_newline_falls_through() {
        let scan = scan("[WRITE_FILE: out.txt] hello [END_WRITE_FILE]");
        assert_eq!(scan.directive, None);
        assert_eq!(scan.fallthroughs, vec![Fallthrough::MissingContentNewline]);
    }

    #[test]
    fn unclosed_read_marker_falls_through_to_write() {
        let reply = "[READ_FILE: oops\n[WRITE_FILE: out.txt]\nx\n[END_WRITE_FILE]";
        let scan = scan(reply);
        assert_eq!(
            scan.directive,
            Some(Directive::Write {
                path: "out.txt".into(),
                content: "x".into(),
            })
        );
        assert_eq!(
            scan.fallthroughs,
            vec![Fallthrough::Unclosed(DirectiveKind::Read)]
        );
    }

    #[test]
    fn later_read_marker_recovers_from_malformed_one() {
        let scan = scan("[READ_FILE: ]\n[READ_FILE: real.txt]");
        assert_eq!(
            scan.directive,
            Some(Directive::Read {
                path: "real.txt".into()
            })
        );
        assert_eq!(
            scan.fallthroughs,
            vec![Fallthrough::EmptyPath(DirectiveKind::Read)]
        );
    }

    #[test]
    fn markers_are_case_sensitive() {
        assert!(scan("[read_file: notes.txt]").is_plain());
    }

    #[test]
    fn fallthrough_messages_name_the_problem() {
        assert!(
            Fallthrough::MissingEndMarker
                .to_string()
                .contains(END_WRITE_MARKER)
        );
        assert!(
            Fallthrough::Unclosed(DirectiveKind::Write)
                .to_string()
                .starts_with("write")
        );
    }

    #[test]
    fn fallthrough_serializes_with_reason_tag() {
        let json = serde_json::to_string(&Fallthrough::EmptyPath(DirectiveKind::Read)).unwrap();
        assert_eq!(json, r#"{"reason":"empty_path","kind":"read"}"#);
    }
}
