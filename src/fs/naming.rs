//! Entry classification and collision-avoiding names for new entries.

use std::future::Future;
use std::path::Path;

use chrono::NaiveDate;

use crate::error::{StorageError, StorageErrorKind, StorageResult};

/// Extension of document files shown in the viewer pane.
pub const DOCUMENT_EXTENSION: &str = ".pdf";
/// Extension of note files opened in the editor pane.
pub const NOTE_EXTENSION: &str = ".md";

/// New notes are numbered `_1`, `_2`, ... after the bare name is taken.
pub const NOTE_FIRST_SUFFIX: u32 = 1;
/// Copies are numbered `_copy2`, `_copy3`, ... after `_copy` is taken.
pub const COPY_FIRST_SUFFIX: u32 = 2;

/// Upper bound on probes before giving up on finding a free name.
const MAX_PROBES: u32 = 10_000;

/// What a file name means to the workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Document,
    Note,
    Ignored,
}

/// Classify a file name by case-insensitive suffix.
pub fn classify(name: &str) -> FileKind {
    let lower = name.to_lowercase();
    if lower.ends_with(DOCUMENT_EXTENSION) {
        FileKind::Document
    } else if lower.ends_with(NOTE_EXTENSION) {
        FileKind::Note
    } else {
        FileKind::Ignored
    }
}

/// Split `name` at its last dot. A leading dot does not start an extension.
///
/// Returns `(stem, extension)` where the extension keeps its dot.
pub fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) if idx > 0 => (&name[..idx], &name[idx..]),
        _ => (name, ""),
    }
}

/// Probe for the first name not reported as taken by `exists`.
///
/// `candidate(None)` is tried first, then `candidate(Some(first_suffix))`,
/// `candidate(Some(first_suffix + 1))`, and so on. The probe is not atomic
/// with whatever the caller creates afterwards.
pub async fn next_available_name<C, E, Fut>(
    candidate: C,
    first_suffix: u32,
    mut exists: E,
) -> StorageResult<String>
where
    C: Fn(Option<u32>) -> String,
    E: FnMut(String) -> Fut,
    Fut: Future<Output = StorageResult<bool>>,
{
    let bare = candidate(None);
    if !exists(bare.clone()).await? {
        return Ok(bare);
    }
    for n in first_suffix..first_suffix.saturating_add(MAX_PROBES) {
        let name = candidate(Some(n));
        if !exists(name.clone()).await? {
            return Ok(name);
        }
    }
    Err(StorageError::new(
        StorageErrorKind::AlreadyExists,
        Path::new(&bare),
        "no free name left",
    ))
}

/// `note_<date>.md`, or `note_<date>_<n>.md` when numbered.
pub fn note_name(date: &str, n: Option<u32>) -> String {
    match n {
        None => format!("note_{date}{NOTE_EXTENSION}"),
        Some(n) => format!("note_{date}_{n}{NOTE_EXTENSION}"),
    }
}

/// `<stem>_copy<ext>`, or `<stem>_copy<n><ext>` when numbered.
pub fn copy_name(original: &str, n: Option<u32>) -> String {
    let (stem, ext) = split_extension(original);
    match n {
        None => format!("{stem}_copy{ext}"),
        Some(n) => format!("{stem}_copy{n}{ext}"),
    }
}

/// Date stamp used in new note file names.
pub fn note_date_stamp(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Body written into a freshly created note.
pub fn new_note_content(date_label: &str) -> String {
    format!("# New note\n\nCreated: {date_label}\n\n## Memo\n\n")
}

/// Placeholder shown in the editor before any note is opened.
pub const DEFAULT_NOTE_CONTENT: &str =
    "\n> Edit here to write your note.\n> Markdown syntax is supported.\n";

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    async fn probe(taken: &[&str], candidate: impl Fn(Option<u32>) -> String, first: u32) -> String {
        let taken: HashSet<String> = taken.iter().map(|s| s.to_string()).collect();
        next_available_name(candidate, first, |name| {
            let hit = taken.contains(&name);
            async move { Ok(hit) }
        })
        .await
        .unwrap()
    }

    #[test]
    fn classify_by_suffix_case_insensitive() {
        assert_eq!(classify("paper.pdf"), FileKind::Document);
        assert_eq!(classify("PAPER.PDF"), FileKind::Document);
        assert_eq!(classify("todo.md"), FileKind::Note);
        assert_eq!(classify("Todo.Md"), FileKind::Note);
        assert_eq!(classify("x.txt"), FileKind::Ignored);
        assert_eq!(classify("md"), FileKind::Ignored);
        assert_eq!(classify("notes.md.bak"), FileKind::Ignored);
    }

    #[test]
    fn split_extension_uses_last_dot() {
        assert_eq!(split_extension("report.md"), ("report", ".md"));
        assert_eq!(split_extension("archive.tar.gz"), ("archive.tar", ".gz"));
        assert_eq!(split_extension("Makefile"), ("Makefile", ""));
        assert_eq!(split_extension(".hidden"), (".hidden", ""));
    }

    #[tokio::test]
    async fn note_name_bare_when_free() {
        let date = "2024-01-01";
        let name = probe(&[], |n| note_name(date, n), NOTE_FIRST_SUFFIX).await;
        assert_eq!(name, "note_2024-01-01.md");
    }

    #[tokio::test]
    async fn note_name_numbering_starts_at_one() {
        let date = "2024-01-01";
        let name = probe(&["note_2024-01-01.md"], |n| note_name(date, n), NOTE_FIRST_SUFFIX).await;
        assert_eq!(name, "note_2024-01-01_1.md");

        let name = probe(
            &["note_2024-01-01.md", "note_2024-01-01_1.md"],
            |n| note_name(date, n),
            NOTE_FIRST_SUFFIX,
        )
        .await;
        assert_eq!(name, "note_2024-01-01_2.md");
    }

    #[tokio::test]
    async fn copy_name_numbering_starts_at_two() {
        let name = probe(&[], |n| copy_name("report.md", n), COPY_FIRST_SUFFIX).await;
        assert_eq!(name, "report_copy.md");

        let name = probe(&["report_copy.md"], |n| copy_name("report.md", n), COPY_FIRST_SUFFIX).await;
        assert_eq!(name, "report_copy2.md");

        let name = probe(
            &["report_copy.md", "report_copy2.md"],
            |n| copy_name("report.md", n),
            COPY_FIRST_SUFFIX,
        )
        .await;
        assert_eq!(name, "report_copy3.md");
    }

    #[test]
    fn copy_name_without_extension() {
        assert_eq!(copy_name("Makefile", None), "Makefile_copy");
        assert_eq!(copy_name("Makefile", Some(2)), "Makefile_copy2");
    }

    #[tokio::test]
    async fn probe_error_propagates() {
        let result = next_available_name(|n| note_name("d", n), NOTE_FIRST_SUFFIX, |_| async {
            Err(StorageError::new(
                StorageErrorKind::PermissionDenied,
                Path::new("/ws"),
                "denied",
            ))
        })
        .await;
        assert_eq!(result.unwrap_err().kind, StorageErrorKind::PermissionDenied);
    }

    #[test]
    fn date_stamp_is_iso() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(note_date_stamp(date), "2024-01-01");
    }

    #[test]
    fn new_note_content_mentions_date() {
        let body = new_note_content("2024/01/01");
        assert!(body.starts_with("# New note"));
        assert!(body.contains("Created: 2024/01/01"));
    }
}
