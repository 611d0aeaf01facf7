// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! svn subprocess execution
//!
//! Runs one shell command line per call in a given working directory and
//! decodes both output streams from a fixed legacy code page.

use std::io;
use std::path::Path;
use std::process::Stdio;

use encoding_rs::Encoding;
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::command::{SVN_PROGRAM, SvnCommand};
use crate::error::SvnError;

/// Code page used when none is configured
pub const DEFAULT_ENCODING: &str = "gbk";

/// Stdout ceiling used when none is configured (50 MiB)
pub const DEFAULT_MAX_OUTPUT_BYTES: usize = 50 * 1024 * 1024;

/// Windows code page names that are not WHATWG labels but mean GBK
const GBK_CODE_PAGE_ALIASES: &[&str] = &["cp936", "936", "windows-936", "ms936"];

/// Resolve an encoding label, accepting Windows code page names for GBK
#[must_use]
pub fn encoding_for_label(label: &str) -> Option<&'static Encoding> {
    let label = label.trim();
    if GBK_CODE_PAGE_ALIASES
        .iter()
        .any(|alias| alias.eq_ignore_ascii_case(label))
    {
        return Some(encoding_rs::GBK);
    }
    Encoding::for_label(label.as_bytes())
}

/// Executor for svn command lines
#[derive(Debug, Clone)]
pub struct SvnRunner {
    program: String,
    encoding: &'static Encoding,
    max_output_bytes: usize,
}

impl Default for SvnRunner {
    fn default() -> Self {
        Self {
            program: SVN_PROGRAM.to_string(),
            encoding: encoding_rs::GBK,
            max_output_bytes: DEFAULT_MAX_OUTPUT_BYTES,
        }
    }
}

impl SvnRunner {
    /// Create a runner for a specific svn binary, code page and output ceiling
    ///
    /// # Errors
    ///
    /// Returns `SvnError::UnknownEncoding` if `encoding` is neither a WHATWG
    /// encoding label nor a GBK code page name such as `cp936`.
    pub fn new(
        program: impl Into<String>,
        encoding: &str,
        max_output_bytes: usize,
    ) -> Result<Self, SvnError> {
        let encoding =
            encoding_for_label(encoding).ok_or_else(|| SvnError::UnknownEncoding {
                label: encoding.to_string(),
            })?;
        Ok(Self {
            program: program.into(),
            encoding,
            max_output_bytes,
        })
    }

    /// The svn binary commands are built for
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Name of the code page output is decoded from
    #[must_use]
    pub fn encoding_name(&self) -> &'static str {
        self.encoding.name()
    }

    /// Stdout ceiling in bytes
    #[must_use]
    pub fn max_output_bytes(&self) -> usize {
        self.max_output_bytes
    }

    /// Run a built svn command in `cwd`
    ///
    /// # Errors
    ///
    /// See [`SvnRunner::run_line`].
    pub async fn run(&self, command: &SvnCommand, cwd: &Path) -> Result<String, SvnError> {
        self.run_line(command.as_str(), cwd).await
    }

    /// Run a shell command line in `cwd` and return its decoded stdout
    ///
    /// # Errors
    ///
    /// - `SvnError::Spawn` if the shell cannot be started (including a
    ///   missing working directory)
    /// - `SvnError::OutputTooLarge` if stdout exceeds the ceiling; the child
    ///   is killed
    /// - `SvnError::CommandFailed` with the decoded stderr on non-zero exit
    pub async fn run_line(&self, line: &str, cwd: &Path) -> Result<String, SvnError> {
        debug!(command = %line, cwd = %cwd.display(), "Running svn command");

        let mut child = shell(line)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        let (Some(stdout), Some(mut stderr)) = (child.stdout.take(), child.stderr.take()) else {
            return Err(SvnError::Spawn(io::Error::other("child output pipes unavailable")));
        };

        // Drained separately so a child blocked on a full stdout pipe can
        // still be killed.
        let stderr_task = tokio::spawn(async move {
            let mut buf = Vec::new();
            stderr.read_to_end(&mut buf).await.map(|_| buf)
        });

        let limit = self.max_output_bytes;
        let mut stdout_buf = Vec::new();
        let mut bounded = stdout.take((limit as u64).saturating_add(1));
        bounded.read_to_end(&mut stdout_buf).await?;

        if stdout_buf.len() > limit {
            warn!(limit, command = %line, "svn output exceeded ceiling, killing process");
            let _ = child.start_kill();
            let _ = child.wait().await;
            stderr_task.abort();
            return Err(SvnError::OutputTooLarge { limit });
        }

        let status = child.wait().await?;
        let stderr_buf = stderr_task.await.map_err(io::Error::other)??;

        if status.success() {
            debug!(bytes = stdout_buf.len(), "svn command succeeded");
            Ok(self.decode(&stdout_buf))
        } else {
            let stderr = self.decode(&stderr_buf);
            let exit_code = status.code().unwrap_or(-1);
            warn!(exit_code, stderr = %stderr.trim_end(), "svn command failed");
            Err(SvnError::CommandFailed { stderr, exit_code })
        }
    }

    fn decode(&self, bytes: &[u8]) -> String {
        let (text, had_errors) = self.encoding.decode_without_bom_handling(bytes);
        if had_errors {
            debug!(encoding = self.encoding.name(), "Replaced undecodable bytes");
        }
        text.into_owned()
    }
}

/// Build a command that runs `line` through the platform shell
#[cfg(unix)]
#[must_use]
pub fn shell(line: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(line);
    cmd
}

/// Build a command that runs `line` through the platform shell
#[cfg(windows)]
#[must_use]
pub fn shell(line: &str) -> Command {
    // `/S` makes cmd strip exactly the outer quotes, so a quoted program
    // at the start of `line` survives.
    let mut cmd = Command::new("cmd");
    cmd.args(["/S", "/C"]).raw_arg(format!("\"{line}\""));
    cmd
}
