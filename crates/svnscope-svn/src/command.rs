// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! svn command line construction
//!
//! Commands are rendered as a single shell line so they can be logged and run
//! verbatim. Every path is double-quoted before interpolation, and so is the
//! svn program when it contains anything beyond plain path characters.

use std::fmt;
use std::path::Path;

use chrono::NaiveDate;

use crate::commit::CommitRecord;
use crate::error::SvnError;

/// Default svn binary name
pub const SVN_PROGRAM: &str = "svn";

/// svn subcommands
pub mod commands {
    /// `svn log`
    pub const LOG: &str = "log";
    /// `svn cat`
    pub const CAT: &str = "cat";
}

/// svn flags
pub mod flags {
    /// Include changed paths in log output
    pub const VERBOSE: &str = "-v";
    /// Revision or revision range
    pub const REVISION: &str = "-r";
}

/// A rendered svn command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SvnCommand {
    line: String,
}

impl SvnCommand {
    /// `svn log -v -r {<start>}:HEAD "<dir>"`
    #[must_use]
    pub fn log_since(program: &str, start: NaiveDate, dir: &Path) -> Self {
        Self {
            line: format!(
                "{} {} {} {} {{{}}}:HEAD {}",
                quote_program(program),
                commands::LOG,
                flags::VERBOSE,
                flags::REVISION,
                start.format("%Y-%m-%d"),
                quote_path(dir)
            ),
        }
    }

    /// `svn cat -r <revision> "<file>"`
    ///
    /// # Errors
    ///
    /// Returns `SvnError::InvalidRevision` unless `revision` is a plain
    /// revision number.
    pub fn cat(program: &str, revision: &str, file: &Path) -> Result<Self, SvnError> {
        if !CommitRecord::is_valid_revision(revision) {
            return Err(SvnError::InvalidRevision {
                revision: revision.to_string(),
            });
        }
        Ok(Self {
            line: format!(
                "{} {} {} {revision} {}",
                quote_program(program),
                commands::CAT,
                flags::REVISION,
                quote_path(file)
            ),
        })
    }

    /// Wrap an already formed command line
    #[must_use]
    pub fn raw(line: impl Into<String>) -> Self {
        Self { line: line.into() }
    }

    /// The shell command line
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.line
    }
}

impl fmt::Display for SvnCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.line)
    }
}

/// Double-quote a path for the platform shell.
///
/// On Unix the characters that stay special inside double quotes are
/// backslash-escaped. Windows paths cannot contain `"`.
#[must_use]
pub fn quote_path(path: &Path) -> String {
    let raw = path.to_string_lossy();
    let mut quoted = String::with_capacity(raw.len() + 2);
    quoted.push('"');
    for c in raw.chars() {
        if cfg!(unix) && matches!(c, '"' | '\\' | '$' | '`') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

/// Render the svn program for the start of a command line.
///
/// Names made only of path characters stay bare; anything else (spaces,
/// shell specials) is quoted like a path.
#[must_use]
pub fn quote_program(program: &str) -> String {
    let bare = !program.is_empty()
        && program.chars().all(|c| {
            c.is_alphanumeric()
                || matches!(c, '/' | '.' | '_' | '-' | '+' | ':' | '@' | '%' | ',' | '=')
                || (cfg!(windows) && c == '\\')
        });
    if bare {
        program.to_string()
    } else {
        quote_path(Path::new(program))
    }
}
