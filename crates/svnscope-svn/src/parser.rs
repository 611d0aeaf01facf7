// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! `svn log -v` output parsing
//!
//! The log is a sequence of blocks separated by a line of 72 dashes. Each
//! block starts with a `r<rev> | <author> | <date> | <n> lines` header,
//! followed by a localized "Changed paths:" marker, one line per changed
//! path, a blank line and the free-text message.
//!
//! Blocks that do not have this shape are skipped, never reported as errors.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, trace};

use crate::commit::{ChangeAction, CommitRecord, FileChange};

/// Marker lines that introduce the changed-paths section, one per supported
/// svn localization.
pub const CHANGED_PATHS_MARKERS: &[&str] = &["Changed paths:", "改变的路径:"];

/// Commit separator: exactly 72 dashes on a line of their own
static SEPARATOR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^-{72}$").expect("Invalid separator regex"));

/// `r<rev> | <author> | <date>`; the date stops at the next pipe
static HEADER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^r(\d+)\s*\|\s*(\S+)\s*\|\s*([^|\n]+)").expect("Invalid header regex")
});

/// Marker, path lines (lazy, up to the first blank line), then the message
static PATHS_SECTION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    let markers = CHANGED_PATHS_MARKERS
        .iter()
        .map(|m| regex::escape(m))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?s)(?:{markers})\s*\n(.*?)\n\n(.*)"))
        .expect("Invalid changed paths regex")
});

/// `<code> <path>` with the code limited to the known change kinds
static PATH_LINE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([AMDRU])\s+(.+)$").expect("Invalid path line regex"));

/// Parse `svn log -v` output into commit records.
///
/// Records come back in the order their blocks appear in `output` (svn prints
/// newest first). When `author_filter` is given, only commits whose author
/// contains it, ignoring case, are returned.
///
/// Text before the first separator line is not part of any entry, so input
/// without separators yields no records.
#[must_use]
pub fn parse_log(output: &str, author_filter: Option<&str>) -> Vec<CommitRecord> {
    let normalized = output.replace("\r\n", "\n");
    let filter = author_filter.map(str::to_lowercase);

    let records: Vec<CommitRecord> = SEPARATOR_REGEX
        .split(&normalized)
        .skip(1)
        .filter(|block| !block.trim().is_empty())
        .filter_map(|block| parse_block(block, filter.as_deref()))
        .collect();

    debug!(records = records.len(), "Parsed svn log");
    records
}

/// Parse a single block; `None` means the block is skipped.
///
/// `filter` must already be lowercased.
fn parse_block(block: &str, filter: Option<&str>) -> Option<CommitRecord> {
    let Some(header) = HEADER_REGEX.captures(block) else {
        trace!(block = %preview(block), "Skipping block without revision header");
        return None;
    };

    let revision = &header[1];
    let author = &header[2];
    let date = header[3].trim();

    if let Some(filter) = filter {
        if !author.to_lowercase().contains(filter) {
            trace!(revision, author, "Skipping commit filtered by author");
            return None;
        }
    }

    let Some(section) = PATHS_SECTION_REGEX.captures(block) else {
        debug!(revision, "Skipping commit without changed paths section");
        return None;
    };

    let files = section[1].lines().filter_map(parse_path_line).collect();

    Some(CommitRecord {
        revision: revision.to_string(),
        author: author.to_string(),
        date: date.to_string(),
        message: section[2].trim().to_string(),
        files,
    })
}

fn parse_path_line(line: &str) -> Option<FileChange> {
    let caps = PATH_LINE_REGEX.captures(line)?;
    let action = caps[1].chars().next().and_then(ChangeAction::from_code)?;
    Some(FileChange {
        action,
        path: caps[2].trim().to_string(),
    })
}

fn preview(block: &str) -> &str {
    let end = block
        .char_indices()
        .nth(80)
        .map_or(block.len(), |(idx, _)| idx);
    &block[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    const SEP: &str = "------------------------------------------------------------------------";

    fn log(blocks: &[&str]) -> String {
        let mut out = String::from(SEP);
        out.push('\n');
        for block in blocks {
            out.push_str(block);
            out.push_str(SEP);
            out.push('\n');
        }
        out
    }

    fn change(action: ChangeAction, path: &str) -> FileChange {
        FileChange {
            action,
            path: path.to_string(),
        }
    }

    const ENGLISH_BLOCK: &str = "r1205 | alice | 2026-03-02 10:15:04 +0800 (Mon, 02 Mar 2026) | 3 lines
Changed paths:
   M /trunk/src/session.c
   A /trunk/docs/timeout.md

Fix session timeout

Refresh interval is now configurable.
";

    const CHINESE_BLOCK: &str = "r1204 | 张三 | 2026-03-01 09:00:00 +0800 (周日, 01 3月 2026) | 1 行
改变的路径:
   D /trunk/legacy/old.c

删除旧代码
";

    #[test]
    fn test_parse_single_english_block() {
        let records = parse_log(&log(&[ENGLISH_BLOCK]), None);
        assert_eq!(records.len(), 1);

        let record = &records[0];
        assert_eq!(record.revision, "1205");
        assert_eq!(record.author, "alice");
        assert_eq!(record.date, "2026-03-02 10:15:04 +0800 (Mon, 02 Mar 2026)");
        assert_eq!(
            record.message,
            "Fix session timeout\n\nRefresh interval is now configurable."
        );
        assert_eq!(
            record.files,
            vec![
                change(ChangeAction::Modified, "/trunk/src/session.c"),
                change(ChangeAction::Added, "/trunk/docs/timeout.md"),
            ]
        );
    }

    #[test]
    fn test_parse_localized_marker() {
        let records = parse_log(&log(&[CHINESE_BLOCK]), None);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].author, "张三");
        assert_eq!(records[0].message, "删除旧代码");
        assert_eq!(
            records[0].files,
            vec![change(ChangeAction::Deleted, "/trunk/legacy/old.c")]
        );
    }

    #[test]
    fn test_crlf_line_endings() {
        let text = log(&[ENGLISH_BLOCK]).replace('\n', "\r\n");
        let records = parse_log(&text, None);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].files.len(), 2);
        assert!(!records[0].message.contains('\r'));
    }

    #[test]
    fn test_no_separator_yields_nothing() {
        assert!(parse_log("", None).is_empty());
        assert!(parse_log("svn: warning: W155010\n", None).is_empty());
        assert!(parse_log(ENGLISH_BLOCK, None).is_empty());
    }

    #[test]
    fn test_empty_log_is_single_separator() {
        assert!(parse_log(&format!("{SEP}\n"), None).is_empty());
    }

    #[test]
    fn test_longer_dash_line_is_not_a_separator() {
        let text = format!("{SEP}\n{ENGLISH_BLOCK}-{SEP}\n");
        let records = parse_log(&text, None);
        assert_eq!(records.len(), 1);
        assert!(records[0].message.ends_with(&format!("-{SEP}")));
    }

    #[test]
    fn test_malformed_header_dropped_neighbours_kept() {
        let bad = "not a header at all
Changed paths:
   M /trunk/x

message
";
        let records = parse_log(&log(&[ENGLISH_BLOCK, bad, CHINESE_BLOCK]), None);
        let revisions: Vec<&str> = records.iter().map(|r| r.revision.as_str()).collect();
        assert_eq!(revisions, vec!["1205", "1204"]);
    }

    #[test]
    fn test_missing_changed_paths_marker_drops_block() {
        let no_paths = "r99 | bob | 2026-02-02 08:00:00 +0000 (Mon, 02 Feb 2026) | 1 line

Plain log without -v
";
        let records = parse_log(&log(&[no_paths, ENGLISH_BLOCK]), None);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].revision, "1205");
    }

    #[test]
    fn test_unknown_path_lines_skipped() {
        let block = "r10 | carol | 2026-01-05 12:00:00 +0000 | 1 line
Changed paths:
A foo.txt
_  property change
M bar/baz.c

Mixed lines
";
        let records = parse_log(&log(&[block]), None);
        assert_eq!(
            records[0].files,
            vec![
                change(ChangeAction::Added, "foo.txt"),
                change(ChangeAction::Modified, "bar/baz.c"),
            ]
        );
    }

    #[test]
    fn test_section_with_only_unrecognized_lines_has_empty_files() {
        let block = "r11 | carol | 2026-01-06 12:00:00 +0000 | 1 line
Changed paths:
   X /trunk/weird

Nothing recognizable
";
        let records = parse_log(&log(&[block]), None);
        assert_eq!(records.len(), 1);
        assert!(records[0].files.is_empty());
        assert_eq!(records[0].message, "Nothing recognizable");
    }

    #[test]
    fn test_copy_source_kept_in_path() {
        let block = "r12 | dave | 2026-01-07 12:00:00 +0000 | 1 line
Changed paths:
   A /branches/rel-1 (from /trunk:11)
   R /trunk/Makefile

Branch for release
";
        let records = parse_log(&log(&[block]), None);
        assert_eq!(
            records[0].files,
            vec![
                change(ChangeAction::Added, "/branches/rel-1 (from /trunk:11)"),
                change(ChangeAction::Replaced, "/trunk/Makefile"),
            ]
        );
    }

    #[test]
    fn test_author_filter_case_insensitive_substring() {
        let text = log(&[ENGLISH_BLOCK, CHINESE_BLOCK]);
        let records = parse_log(&text, Some("ALI"));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].author, "alice");

        let records = parse_log(&text, Some("张"));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].revision, "1204");

        assert!(parse_log(&text, Some("nobody")).is_empty());
    }

    #[test]
    fn test_order_is_preserved_not_sorted() {
        let older = "r3 | a | 2026-01-01 | 1 line
Changed paths:
   M /x

old
";
        let newest = "r9 | a | 2026-01-09 | 1 line
Changed paths:
   M /x

new
";
        let middle = "r5 | a | 2026-01-05 | 1 line
Changed paths:
   M /x

mid
";
        let records = parse_log(&log(&[newest, older, middle]), None);
        let revisions: Vec<&str> = records.iter().map(|r| r.revision.as_str()).collect();
        assert_eq!(revisions, vec!["9", "3", "5"]);
    }

    #[test]
    fn test_message_keeps_internal_formatting() {
        let block = "r20 | eve | 2026-01-10 | 4 lines
Changed paths:
   M /trunk/a

  indented first line
* bullet

   trailing paragraph
";
        let records = parse_log(&log(&[block]), None);
        assert_eq!(
            records[0].message,
            "indented first line\n* bullet\n\n   trailing paragraph"
        );
    }

    #[test]
    fn test_header_must_start_the_line() {
        let indented = "  r3 | carol | 2026-01-03 | 1 line
Changed paths:
   M /x

indented header
";
        let records = parse_log(&log(&[indented, ENGLISH_BLOCK]), None);
        assert_eq!(records.len(), 1);
        assert_ne!(records[0].revision, "3");
    }

    #[test]
    fn test_whitespace_only_blocks_ignored() {
        let text = format!("{SEP}\n\n   \n{SEP}\n{ENGLISH_BLOCK}{SEP}\n");
        assert_eq!(parse_log(&text, None).len(), 1);
    }

    #[test]
    fn test_markers_table_contains_both_localizations() {
        assert!(CHANGED_PATHS_MARKERS.contains(&"Changed paths:"));
        assert!(CHANGED_PATHS_MARKERS.contains(&"改变的路径:"));
    }
}
