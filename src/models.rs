use crate::errors::CoreError;
use crate::identifier::{ContainerName, GroupId};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

/// Operation family exposed to the command-line front end.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum CommandKind {
    Delete,
    List,
    Restore,
    Flush,
}

impl CommandKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Delete => "rm",
            Self::List => "ls",
            Self::Restore => "restore",
            Self::Flush => "flush",
        }
    }
}

impl std::fmt::Display for CommandKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Location of the trash, handed to the engine at construction time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrashConfig {
    pub trash_root: PathBuf,
}

impl TrashConfig {
    pub fn new(trash_root: impl Into<PathBuf>) -> Self {
        Self {
            trash_root: trash_root.into(),
        }
    }

    /// Builds a config from a raw setting, expanding environment variables
    /// and resolving relative results against `cwd`.
    pub fn from_raw(raw: &str, cwd: &Path) -> crate::Result<Self> {
        let expanded = crate::helpers::expand_env(raw);
        if expanded.trim().is_empty() {
            return Err(CoreError::invalid_input(format!(
                "trash directory setting '{raw}' expands to an empty path"
            )));
        }
        Ok(Self::new(crate::helpers::absolutize(Path::new(&expanded), cwd)))
    }
}

/// One deletion group stored in the trash root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionGroup {
    pub name: ContainerName,
    pub container: PathBuf,
}

impl DeletionGroup {
    pub fn new(name: ContainerName, trash_root: &Path) -> Self {
        let container = trash_root.join(name.to_string());
        Self { name, container }
    }

    pub fn id(&self) -> &GroupId {
        self.name.id()
    }

    pub fn container_name(&self) -> String {
        self.name.to_string()
    }

    pub fn created(&self) -> DateTime<Utc> {
        self.name.created()
    }
}

/// One argument moved into a deletion group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelocatedEntry {
    pub original_path: PathBuf,
    pub trashed_path: PathBuf,
}

/// Result of a completed delete operation.
#[derive(Debug, Clone)]
pub struct DeletionReceipt {
    pub group: DeletionGroup,
    pub entries: Vec<RelocatedEntry>,
}

/// Result of restoring one deletion group.
#[derive(Debug, Clone)]
pub struct RestoreReport {
    pub restore_root: PathBuf,
    pub restored: Vec<PathBuf>,
}

/// Outcome of one group within a batch restore.
#[derive(Debug)]
pub struct RestoreOutcome {
    pub requested: String,
    pub group: DeletionGroup,
    pub result: crate::Result<RestoreReport>,
}

/// What a flush invocation should remove.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlushRequest {
    All,
    Selected(Vec<String>),
}

/// Outcome of purging one deletion group.
#[derive(Debug)]
pub struct PurgeOutcome {
    pub group: DeletionGroup,
    pub result: crate::Result<()>,
}

/// Result of a flush invocation.
#[derive(Debug)]
pub enum FlushReport {
    All { removed: usize },
    Selected(Vec<PurgeOutcome>),
}

impl FlushReport {
    /// Number of groups that could not be removed.
    pub fn failure_count(&self) -> usize {
        match self {
            Self::All { .. } => 0,
            Self::Selected(outcomes) => outcomes.iter().filter(|o| o.result.is_err()).count(),
        }
    }
}

/// Listing row for one deletion group.
#[derive(Debug, Clone)]
pub struct GroupSummary {
    pub group: DeletionGroup,
    pub original_root: Option<PathBuf>,
    pub size_bytes: Option<u64>,
}
