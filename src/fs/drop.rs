//! Files dropped onto the tree from outside the workspace.
//!
//! Terminals deliver a drag-and-drop as a bracketed paste of file paths, so
//! [`parse_pasted_paths`] turns that text back into [`ExternalFile`]s.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

/// A dropped item: its declared name plus accessors for its content.
#[async_trait]
pub trait DroppedFile: Send + Sync {
    fn name(&self) -> &str;

    async fn read_text(&self) -> io::Result<String>;

    async fn read_bytes(&self) -> io::Result<Vec<u8>>;
}

/// A dropped file that lives on the host filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalFile {
    name: String,
    path: PathBuf,
}

impl ExternalFile {
    pub fn new(path: impl Into<PathBuf>) -> Option<Self> {
        let path = path.into();
        let name = path.file_name()?.to_string_lossy().to_string();
        Some(Self { name, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl DroppedFile for ExternalFile {
    fn name(&self) -> &str {
        &self.name
    }

    async fn read_text(&self) -> io::Result<String> {
        tokio::fs::read_to_string(&self.path).await
    }

    async fn read_bytes(&self) -> io::Result<Vec<u8>> {
        tokio::fs::read(&self.path).await
    }
}

/// Split pasted text into dropped files.
///
/// Accepts one path per line or several space-separated paths, with
/// optional quoting, backslash-escaped spaces and `file://` prefixes.
/// A backslash before anything else is kept, so Windows paths pass through.
pub fn parse_pasted_paths(text: &str) -> Vec<ExternalFile> {
    text.lines()
        .flat_map(split_shell_words)
        .filter_map(|word| {
            let word = word.strip_prefix("file://").unwrap_or(word.as_str());
            if word.is_empty() {
                None
            } else {
                ExternalFile::new(word)
            }
        })
        .collect()
}

fn split_shell_words(line: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut chars = line.trim().chars().peekable();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), c) => current.push(c),
            (None, '\'' | '"') => quote = Some(c),
            // Escapes only whitespace and quotes; Windows separators stay literal.
            (None, '\\') => match chars.peek() {
                Some(&next @ (' ' | '\t' | '\'' | '"')) => {
                    current.push(next);
                    chars.next();
                }
                _ => current.push('\\'),
            },
            (None, ' ' | '\t') => {
                if !current.is_empty() {
                    words.push(std::mem::take(&mut current));
                }
            }
            (None, c) => current.push(c),
        }
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}
