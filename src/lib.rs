//! Deletion-group lifecycle engine behind the `softrm` safe delete tool.
//!
//! Instead of removing files, a delete moves them into a fresh container
//! directory inside the trash root. Containers mirror the absolute paths of
//! what they hold, which is all the information restore needs.

pub mod errors;
pub mod fs;
pub mod helpers;
pub mod identifier;
pub mod lock;
pub mod models;
pub mod purger;
pub mod registry;
pub mod relocator;
pub mod restorer;
pub mod trash;

pub use errors::{CoreError, Result};
pub use fs::{FileSystem, RealFileSystem};
pub use helpers::{
    expand_env,
    print_size,
    sanitize_user_path,
    CONTAINER_TIME_FORMAT,
    DISPLAY_TIME_FORMAT,
};
pub use identifier::{ContainerName, GroupId, IdGenerator};
pub use models::{
    CommandKind,
    DeletionGroup,
    DeletionReceipt,
    FlushReport,
    FlushRequest,
    GroupSummary,
    PurgeOutcome,
    RelocatedEntry,
    RestoreOutcome,
    RestoreReport,
    TrashConfig,
};
pub use trash::Trash;

/// Re-export a small stable API surface for front ends.
pub mod prelude {
    pub use crate::{
        errors::{CoreError, Result},
        fs::{FileSystem, RealFileSystem},
        helpers::*,
        models::*,
        trash::Trash,
    };
}
