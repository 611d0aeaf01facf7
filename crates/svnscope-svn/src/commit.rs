//! Subversion commit types

use serde::{Deserialize, Serialize};

/// Kind of change recorded for one path in a commit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeAction {
    /// `A`: the path was added
    #[serde(rename = "A")]
    Added,
    /// `M`: the path was modified
    #[serde(rename = "M")]
    Modified,
    /// `D`: the path was deleted
    #[serde(rename = "D")]
    Deleted,
    /// `R`: the path was replaced
    #[serde(rename = "R")]
    Replaced,
    /// `U`: the path was updated or merged
    #[serde(rename = "U")]
    Updated,
}

impl ChangeAction {
    /// All change kinds, in code order
    pub const ALL: [ChangeAction; 5] = [
        ChangeAction::Added,
        ChangeAction::Modified,
        ChangeAction::Deleted,
        ChangeAction::Replaced,
        ChangeAction::Updated,
    ];

    /// Map a single-character code to a change kind
    #[must_use]
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'A' => Some(Self::Added),
            'M' => Some(Self::Modified),
            'D' => Some(Self::Deleted),
            'R' => Some(Self::Replaced),
            'U' => Some(Self::Updated),
            _ => None,
        }
    }

    /// The single-character code svn prints for this change kind
    #[must_use]
    pub fn code(self) -> char {
        match self {
            Self::Added => 'A',
            Self::Modified => 'M',
            Self::Deleted => 'D',
            Self::Replaced => 'R',
            Self::Updated => 'U',
        }
    }

    /// Human-readable name
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Modified => "modified",
            Self::Deleted => "deleted",
            Self::Replaced => "replaced",
            Self::Updated => "updated",
        }
    }
}

impl std::fmt::Display for ChangeAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// One path touched by a commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileChange {
    /// Change kind
    pub action: ChangeAction,
    /// Repository path as listed by `svn log -v`
    pub path: String,
}

/// Represents one parsed `svn log -v` entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    /// Revision number as printed, without the leading `r`
    pub revision: String,
    /// Committer name
    pub author: String,
    /// Raw date string from the log header, trimmed
    pub date: String,
    /// Commit message, trimmed
    pub message: String,
    /// Changed paths in listing order
    pub files: Vec<FileChange>,
}

impl CommitRecord {
    /// Check whether a token is a plain svn revision number
    #[must_use]
    pub fn is_valid_revision(revision: &str) -> bool {
        !revision.is_empty() && revision.chars().all(|c| c.is_ascii_digit())
    }

    /// Numeric revision, if it fits in a `u64`
    #[must_use]
    pub fn revision_number(&self) -> Option<u64> {
        self.revision.parse().ok()
    }

    /// Get the first line of the commit message (subject)
    #[must_use]
    pub fn subject(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }
}
