//! Request handlers for the bridge operations
//!
//! Each handler decodes its JSON arguments into a typed input, composes the
//! svn runner, the log parser and filesystem calls, and returns a typed
//! result. `get-svn-log` and `write-file` propagate failures; `read-file`,
//! `get-svn-file` and `list-files` report any failure as an empty result.

use std::path::{Path, PathBuf};

use chrono::{Days, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use svnscope_svn::{CommitRecord, SvnCommand, SvnError, parse_log};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::DEFAULT_LOG_DAYS;
use crate::context::AppContext;
use crate::files::{self, FileEntry};

// ============================================================================
// Error Types
// ============================================================================

/// Handler errors
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Invalid input - missing or malformed field
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// svn failed; the message is svn's own error text
    #[error(transparent)]
    Svn(#[from] SvnError),

    /// Writing a local file failed
    #[error("Failed to write {path}: {source}")]
    WriteFailed {
        /// Target path
        path: String,
        /// Underlying filesystem error
        source: std::io::Error,
    },

    /// The directory chooser could not be started
    #[error("Directory chooser failed: {0}")]
    Picker(std::io::Error),

    /// JSON serialization error
    #[error("Failed to process JSON: {0}")]
    Json(#[from] serde_json::Error),
}

// ============================================================================
// Input Types
// ============================================================================

/// Input for `select-directory` (no fields)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SelectDirectoryInput {}

/// Input for `get-svn-log`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SvnLogInput {
    /// Working copy directory
    pub dir_path: String,
    /// Number of days of history, counted back from today
    #[serde(default = "default_log_days")]
    pub days: u32,
    /// Case-insensitive author substring
    pub author: Option<String>,
}

fn default_log_days() -> u32 {
    DEFAULT_LOG_DAYS
}

/// Input for `read-file`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadFileInput {
    /// Local file path
    pub file_path: String,
}

/// Input for `get-svn-file`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SvnFileInput {
    /// File inside a working copy
    pub file_path: String,
    /// Revision number, as a string or a number
    pub revision: Revision,
}

/// Revision accepted either as `"1205"` or `1205`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Revision {
    /// Numeric form
    Number(u64),
    /// String form
    Text(String),
}

impl std::fmt::Display for Revision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s.trim()),
        }
    }
}

/// Input for `write-file`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteFileInput {
    /// Local file path, overwritten
    pub file_path: String,
    /// New content
    pub content: String,
}

/// Input for `list-files`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListFilesInput {
    /// Root directory to walk
    pub dir_path: String,
}

// ============================================================================
// Output Types
// ============================================================================

/// Result of `select-directory`: the chosen path, or `null` when cancelled
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SelectedDirectory(pub Option<String>);

// ============================================================================
// Handler Functions
// ============================================================================

/// Parse input from bridge arguments into a typed struct
pub fn parse_input<T: for<'de> Deserialize<'de>>(
    args: Option<Map<String, Value>>,
) -> Result<T, HandlerError> {
    let value = args
        .map(Value::Object)
        .unwrap_or(Value::Object(serde_json::Map::new()));
    serde_json::from_value(value).map_err(|e| HandlerError::InvalidInput(e.to_string()))
}

/// First day included in a log covering the last `days` days
#[must_use]
pub fn log_start_date(today: NaiveDate, days: u32) -> NaiveDate {
    today
        .checked_sub_days(Days::new(u64::from(days)))
        .unwrap_or(NaiveDate::MIN)
}

/// Handle `select-directory`
///
/// Opens the context's directory chooser.
pub async fn handle_select_directory(
    ctx: &AppContext,
    args: Option<Map<String, Value>>,
) -> Result<SelectedDirectory, HandlerError> {
    let _: SelectDirectoryInput = parse_input(args)?;
    select_directory(ctx).await
}

/// Ask the user for a directory
pub async fn select_directory(ctx: &AppContext) -> Result<SelectedDirectory, HandlerError> {
    let chosen = ctx
        .picker()
        .pick_directory()
        .await
        .map_err(HandlerError::Picker)?;
    Ok(SelectedDirectory(
        chosen.map(|p| p.display().to_string()),
    ))
}

/// Handle `get-svn-log`
///
/// Fetches the verbose log from `days` ago through HEAD and parses it.
pub async fn handle_get_svn_log(
    ctx: &AppContext,
    args: Option<Map<String, Value>>,
) -> Result<Vec<CommitRecord>, HandlerError> {
    let input: SvnLogInput = parse_input(args)?;
    svn_log(ctx, &input, Local::now().date_naive()).await
}

/// Fetch and parse the log described by `input`, counting days back from `today`
pub async fn svn_log(
    ctx: &AppContext,
    input: &SvnLogInput,
    today: NaiveDate,
) -> Result<Vec<CommitRecord>, HandlerError> {
    if input.dir_path.trim().is_empty() {
        return Err(HandlerError::InvalidInput(
            "dirPath is required. Select a working copy directory first.".to_string(),
        ));
    }

    let dir = Path::new(&input.dir_path);
    let start = log_start_date(today, input.days);
    let command = SvnCommand::log_since(ctx.runner().program(), start, dir);
    info!(%command, "Fetching svn log");

    let output = ctx.runner().run(&command, dir).await?;
    let author = input
        .author
        .as_deref()
        .map(str::trim)
        .filter(|a| !a.is_empty());
    let records = parse_log(&output, author);

    info!(
        output_chars = output.len(),
        records = records.len(),
        "Parsed svn log"
    );
    Ok(records)
}

/// Handle `read-file`
///
/// Any failure yields an empty string.
pub async fn handle_read_file(
    _ctx: &AppContext,
    args: Option<Map<String, Value>>,
) -> Result<String, HandlerError> {
    let input: ReadFileInput = parse_input(args)?;
    Ok(read_file(Path::new(&input.file_path)).await)
}

/// Read a local file as text, or `""` if it cannot be read
pub async fn read_file(path: &Path) -> String {
    match tokio::fs::read(path).await {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "read-file failed, returning empty");
            String::new()
        }
    }
}

/// Handle `get-svn-file`
///
/// Any failure, including an invalid revision, yields an empty string.
pub async fn handle_get_svn_file(
    ctx: &AppContext,
    args: Option<Map<String, Value>>,
) -> Result<String, HandlerError> {
    let input: SvnFileInput = parse_input(args)?;
    Ok(svn_file(ctx, Path::new(&input.file_path), &input.revision.to_string()).await)
}

/// Fetch `file` as of `revision`, or `""` on any failure
pub async fn svn_file(ctx: &AppContext, file: &Path, revision: &str) -> String {
    match try_svn_file(ctx, file, revision).await {
        Ok(text) => text,
        Err(e) => {
            debug!(path = %file.display(), revision, error = %e, "get-svn-file failed, returning empty");
            String::new()
        }
    }
}

async fn try_svn_file(ctx: &AppContext, file: &Path, revision: &str) -> Result<String, SvnError> {
    let command = SvnCommand::cat(ctx.runner().program(), revision, file)?;
    let cwd = containing_dir(file);
    ctx.runner().run(&command, &cwd).await
}

fn containing_dir(file: &Path) -> PathBuf {
    match file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Handle `write-file`
///
/// Overwrites the file and returns `true`; failures propagate.
pub async fn handle_write_file(
    _ctx: &AppContext,
    args: Option<Map<String, Value>>,
) -> Result<bool, HandlerError> {
    let input: WriteFileInput = parse_input(args)?;
    tokio::fs::write(&input.file_path, input.content.as_bytes())
        .await
        .map_err(|source| HandlerError::WriteFailed {
            path: input.file_path.clone(),
            source,
        })?;
    debug!(path = %input.file_path, bytes = input.content.len(), "Wrote file");
    Ok(true)
}

/// Handle `list-files`
///
/// Any walk failure yields an empty list.
pub async fn handle_list_files(
    _ctx: &AppContext,
    args: Option<Map<String, Value>>,
) -> Result<Vec<FileEntry>, HandlerError> {
    let input: ListFilesInput = parse_input(args)?;
    let root = PathBuf::from(&input.dir_path);
    let root = std::path::absolute(&root).unwrap_or(root);

    let listed = tokio::task::spawn_blocking(move || files::list_files(&root)).await;
    match listed {
        Ok(Ok(entries)) => Ok(entries),
        Ok(Err(e)) => {
            debug!(dir = %input.dir_path, error = %e, "list-files failed, returning empty");
            Ok(Vec::new())
        }
        Err(e) => {
            warn!(error = %e, "list-files walker task failed");
            Ok(Vec::new())
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
