// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Error types for svnscope-svn

use thiserror::Error;

/// Errors that can occur while running svn commands
#[derive(Debug, Error)]
pub enum SvnError {
    /// The shell or svn binary could not be started
    #[error("Failed to start svn command: {0}")]
    Spawn(#[from] std::io::Error),

    /// svn exited with a non-zero status; the message is its decoded stderr
    #[error("{}", .stderr.trim_end())]
    CommandFailed {
        /// Decoded error stream text
        stderr: String,
        /// Process exit code (-1 when terminated by a signal)
        exit_code: i32,
    },

    /// Standard output exceeded the configured ceiling
    #[error("svn output exceeded {limit} bytes")]
    OutputTooLarge {
        /// The ceiling in bytes
        limit: usize,
    },

    /// The configured code page label is not known
    #[error("Unknown text encoding: {label}")]
    UnknownEncoding {
        /// The label that failed to resolve
        label: String,
    },

    /// A revision token that is not a plain revision number
    #[error("Invalid revision: {revision}")]
    InvalidRevision {
        /// The rejected token
        revision: String,
    },
}
