use std::{io, path::PathBuf};

/// Error type shared by every deletion-group operation.
#[derive(thiserror::Error, Debug)]
pub enum CoreError {
    /// File system I/O failure.
    #[error("I/O error while accessing {0}")]
    Io(PathBuf, #[source] io::Error),

    /// A path requested for deletion does not exist.
    #[error("argument {0} is not a valid path")]
    PathNotFound(PathBuf),

    /// The current user lacks the access mode the operation needs.
    #[error("permission denied: {0} is not accessible with 'rwx' rights for current user")]
    PermissionDenied(PathBuf),

    /// A node exists where a directory is required.
    #[error("node {0} exists, but it's not a directory")]
    NotADirectory(PathBuf),

    /// Listing a directory failed mid-traversal.
    #[error("could not read contents of directory {0}")]
    DirectoryRead(PathBuf, #[source] io::Error),

    /// No deletion group matches the supplied identifier.
    #[error("id {0} not found")]
    NotFound(String),

    /// The supplied identifier prefix matches several deletion groups.
    #[error("id \"{id}\" has more than one match ({}), please specify more characters", .matches.join(", "))]
    Ambiguous { id: String, matches: Vec<String> },

    /// A single relocation or restoration move failed.
    #[error("could not move {from} to {to}")]
    MoveFailure {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A delete failed part way and every completed move was undone.
    #[error("delete failed, already moved entries were put back")]
    RolledBack(#[source] Box<CoreError>),

    /// A delete failed part way and some moves could not be undone.
    #[error("delete failed and {} entries could not be put back (left in {container})", .stranded.len())]
    InconsistentState {
        container: PathBuf,
        stranded: Vec<PathBuf>,
        #[source]
        cause: Box<CoreError>,
    },

    /// Some entries of a deletion group could not be restored.
    #[error("restore of {id} incomplete, {} entries left in {container}", .remaining.len())]
    PartialRestore {
        id: String,
        container: PathBuf,
        remaining: Vec<PathBuf>,
    },

    /// Another invocation currently holds the trash root.
    #[error("trash directory {0} is in use by another softrm process")]
    Locked(PathBuf),

    /// No unused deletion group name could be found.
    #[error("resource conflict: {0}")]
    Conflict(String),

    /// An operation was rejected due to argument issues.
    #[error("invalid command input: {0}")]
    InvalidInput(String),
}

impl CoreError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    /// Wraps an I/O error, promoting permission failures to `PermissionDenied`.
    pub fn io(path: impl Into<PathBuf>, error: io::Error) -> Self {
        let path = path.into();
        match error.kind() {
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path),
            _ => Self::Io(path, error),
        }
    }

    pub fn move_failure(from: impl Into<PathBuf>, to: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::MoveFailure {
            from: from.into(),
            to: to.into(),
            source,
        }
    }

    /// Returns the underlying I/O error kind, if any.
    pub fn io_kind(&self) -> Option<io::ErrorKind> {
        match self {
            Self::Io(_, err) | Self::DirectoryRead(_, err) | Self::MoveFailure { source: err, .. } => {
                Some(err.kind())
            }
            Self::PermissionDenied(_) => Some(io::ErrorKind::PermissionDenied),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.io_kind() == Some(io::ErrorKind::NotFound)
    }

    pub fn is_already_exists(&self) -> bool {
        self.io_kind() == Some(io::ErrorKind::AlreadyExists)
    }
}

/// Shared result alias for the core crate.
pub type Result<T> = std::result::Result<T, CoreError>;
