// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! svnscope-svn: Subversion log processing for svnscope
//!
//! This library crate builds and runs `svn` command lines against a working
//! copy and parses the verbose log output into structured commit records.

#![warn(missing_docs)]

//! # Example
//!
//! ```no_run
//! # async fn demo() -> Result<(), svnscope_svn::SvnError> {
//! use std::path::Path;
//! use svnscope_svn::{SvnCommand, SvnRunner, parse_log};
//!
//! let runner = SvnRunner::default();
//! let start = chrono::NaiveDate::from_ymd_opt(2026, 1, 1).expect("valid date");
//! let command = SvnCommand::log_since(runner.program(), start, Path::new("/work/trunk"));
//! let output = runner.run(&command, Path::new("/work/trunk")).await?;
//!
//! for record in parse_log(&output, Some("alice")) {
//!     println!("r{} - {}", record.revision, record.subject());
//! }
//! # Ok(())
//! # }
//! ```

pub mod command;
pub mod commit;
pub mod error;
pub mod parser;
pub mod runner;

pub use command::SvnCommand;
pub use commit::{ChangeAction, CommitRecord, FileChange};
pub use error::SvnError;
pub use parser::{CHANGED_PATHS_MARKERS, parse_log};
pub use runner::{DEFAULT_ENCODING, DEFAULT_MAX_OUTPUT_BYTES, SvnRunner};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::command::SvnCommand;
    pub use crate::commit::{ChangeAction, CommitRecord, FileChange};
    pub use crate::error::SvnError;
    pub use crate::parser::parse_log;
    pub use crate::runner::SvnRunner;
}
