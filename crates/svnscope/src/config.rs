//! Configuration for the svnscope bridge
//!
//! This module provides the command-line/environment configuration: which
//! svn binary to run, how its output is decoded, the directory chooser
//! command and logging options.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use svnscope_svn::{DEFAULT_ENCODING, SvnError, SvnRunner};

/// Default number of days of history for `get-svn-log`
pub const DEFAULT_LOG_DAYS: u32 = 7;

/// svnscope - browse Subversion history of a working copy
#[derive(Parser, Debug, Clone)]
#[command(name = "svnscope")]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Subcommand to run (defaults to MCP bridge mode)
    #[command(subcommand)]
    pub command: Option<Command>,

    /// svn binary to invoke
    #[arg(long, env = "SVNSCOPE_SVN", default_value = "svn", global = true)]
    pub svn: String,

    /// Code page svn output is decoded from
    ///
    /// Any WHATWG encoding label is accepted (`gbk`, `cp936`, `utf-8`, ...).
    #[arg(long, env = "SVNSCOPE_ENCODING", default_value = DEFAULT_ENCODING, global = true)]
    pub encoding: String,

    /// Maximum size of a single svn command's output, in MiB
    #[arg(long, default_value_t = 50, global = true)]
    pub max_output_mb: usize,

    /// Shell command that opens a directory chooser and prints the choice
    ///
    /// Defaults to a platform chooser (zenity, osascript or PowerShell).
    #[arg(long, env = "SVNSCOPE_PICKER")]
    pub picker: Option<String>,

    /// Enable verbose logging (debug level)
    ///
    /// Logs are written to stderr to avoid interfering with the MCP stdio
    /// transport.
    #[arg(short, long, default_value = "false", global = true)]
    pub verbose: bool,

    /// Quiet mode - suppress info-level logs
    #[arg(short, long, default_value = "false", global = true)]
    pub quiet: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            command: None,
            svn: "svn".to_string(),
            encoding: DEFAULT_ENCODING.to_string(),
            max_output_mb: 50,
            picker: None,
            verbose: false,
            quiet: false,
        }
    }
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print the log of a working copy as JSON and exit
    ///
    /// Example:
    ///   svnscope log ~/work/trunk --days 30 --author alice
    Log {
        /// Working copy directory
        dir: PathBuf,

        /// Number of days of history to fetch
        #[arg(long, default_value_t = DEFAULT_LOG_DAYS)]
        days: u32,

        /// Only show commits whose author contains this text
        #[arg(long)]
        author: Option<String>,
    },

    /// Print a file as of a revision and exit
    Cat {
        /// File inside a working copy
        file: PathBuf,

        /// Revision number
        #[arg(short, long)]
        revision: String,
    },
}

impl Config {
    /// Output ceiling in bytes
    #[must_use]
    pub fn max_output_bytes(&self) -> usize {
        self.max_output_mb.saturating_mul(1024 * 1024)
    }

    /// Build the svn runner described by this configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Svn` if the encoding label is unknown.
    pub fn runner(&self) -> Result<SvnRunner, ConfigError> {
        Ok(SvnRunner::new(
            self.svn.clone(),
            &self.encoding,
            self.max_output_bytes(),
        )?)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The svn program name is empty
    /// - The output ceiling is zero
    /// - The encoding label is unknown
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.svn.trim().is_empty() {
            return Err(ConfigError::EmptySvnProgram);
        }
        if self.max_output_mb == 0 {
            return Err(ConfigError::ZeroOutputLimit);
        }
        if self.picker.as_deref().is_some_and(|p| p.trim().is_empty()) {
            return Err(ConfigError::EmptyPickerCommand);
        }
        self.runner()?;
        Ok(())
    }

    /// Get the log level based on verbose/quiet flags
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        if self.verbose {
            tracing::Level::DEBUG
        } else if self.quiet {
            tracing::Level::WARN
        } else {
            tracing::Level::INFO
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// `--svn` was blank
    #[error("svn program must not be empty")]
    EmptySvnProgram,

    /// `--max-output-mb 0`
    #[error("Output limit must be at least 1 MiB")]
    ZeroOutputLimit,

    /// `--picker` was blank
    #[error("Picker command must not be empty")]
    EmptyPickerCommand,

    /// Runner construction failed
    #[error(transparent)]
    Svn(#[from] SvnError),
}
