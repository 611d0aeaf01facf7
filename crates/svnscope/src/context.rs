//! Application context shared by all handlers
//!
//! The context is built once at startup and owns the svn runner and the
//! directory chooser that stands in for the application's main window.

use std::io;
use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use svnscope_svn::SvnRunner;
use svnscope_svn::runner::shell;
use tracing::{debug, info};

use crate::config::{Config, ConfigError};

/// Something that can ask the user for a directory
#[async_trait]
pub trait DirectoryPicker: Send + Sync {
    /// Show the chooser and wait for the user
    ///
    /// Returns `Ok(None)` when the user cancels.
    async fn pick_directory(&self) -> io::Result<Option<PathBuf>>;
}

/// Directory chooser driven by an external command
///
/// The command runs through the platform shell, starting in the user's home
/// directory, and prints the chosen path on stdout. A non-zero exit or empty
/// output means the user cancelled.
#[derive(Debug, Clone)]
pub struct CommandPicker {
    command: String,
    start_dir: Option<PathBuf>,
}

impl CommandPicker {
    /// Create a picker running `command`
    #[must_use]
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            start_dir: dirs::home_dir(),
        }
    }

    /// Override the directory the chooser starts in
    #[must_use]
    pub fn with_start_dir(mut self, dir: PathBuf) -> Self {
        self.start_dir = Some(dir);
        self
    }

    /// The chooser command line
    #[must_use]
    pub fn command(&self) -> &str {
        &self.command
    }
}

impl Default for CommandPicker {
    fn default() -> Self {
        Self::new(default_picker_command())
    }
}

/// Platform directory chooser command
#[must_use]
pub fn default_picker_command() -> &'static str {
    if cfg!(target_os = "macos") {
        "osascript -e 'POSIX path of (choose folder)'"
    } else if cfg!(windows) {
        "powershell -NoProfile -Command \"Add-Type -AssemblyName System.Windows.Forms; \
         $d = New-Object System.Windows.Forms.FolderBrowserDialog; \
         if ($d.ShowDialog() -eq 'OK') { $d.SelectedPath }\""
    } else {
        "zenity --file-selection --directory"
    }
}

#[async_trait]
impl DirectoryPicker for CommandPicker {
    async fn pick_directory(&self) -> io::Result<Option<PathBuf>> {
        let mut cmd = shell(&self.command);
        if let Some(dir) = self.start_dir.as_ref().filter(|d| d.is_dir()) {
            cmd.current_dir(dir);
        }

        debug!(command = %self.command, "Opening directory chooser");
        let output = cmd
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()
            .await?;

        if !output.status.success() {
            debug!(status = ?output.status.code(), "Directory chooser cancelled");
            return Ok(None);
        }

        let chosen = String::from_utf8_lossy(&output.stdout);
        let chosen = chosen.trim();
        if chosen.is_empty() {
            return Ok(None);
        }
        Ok(Some(PathBuf::from(chosen)))
    }
}

/// Shared state for request handlers
pub struct AppContext {
    runner: SvnRunner,
    picker: Box<dyn DirectoryPicker>,
}

impl AppContext {
    /// Create a context from its parts
    #[must_use]
    pub fn new(runner: SvnRunner, picker: Box<dyn DirectoryPicker>) -> Self {
        Self { runner, picker }
    }

    /// Build the context described by the configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the runner cannot be built.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let runner = config.runner()?;
        let picker = config
            .picker
            .as_deref()
            .map_or_else(CommandPicker::default, CommandPicker::new);

        info!(
            svn = runner.program(),
            encoding = runner.encoding_name(),
            picker = picker.command(),
            "Application context ready"
        );
        Ok(Self::new(runner, Box::new(picker)))
    }

    /// The svn runner
    #[must_use]
    pub fn runner(&self) -> &SvnRunner {
        &self.runner
    }

    /// The directory chooser
    #[must_use]
    pub fn picker(&self) -> &dyn DirectoryPicker {
        self.picker.as_ref()
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("runner", &self.runner)
            .finish_non_exhaustive()
    }
}
