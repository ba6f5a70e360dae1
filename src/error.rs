//! Error types for mount, update and load.

use thiserror::Error;

use crate::types::Id;

/// Failure reported by the rendering backend while binding a node.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("host binding failed: {0}")]
pub struct HostError(pub String);

impl HostError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}

/// Mount errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MountError {
    #[error("descriptor id or depth is not set (id {id}, depth {depth})")]
    InvalidDescriptor { id: Id, depth: u32 },

    #[error("ui element {id} is already mounted (depth {depth})")]
    AlreadyMounted { id: Id, depth: u32 },

    #[error("depth {depth} exceeds the configured maximum of {max}")]
    DepthLimit { depth: u32, max: u32 },

    #[error(transparent)]
    Host(#[from] HostError),
}

/// Update errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UpdateError {
    #[error("ui element {id} is not mounted (depth {depth})")]
    NotMounted { id: Id, depth: u32 },

    #[error("updated ui element {id} does not match current depth: {current} != {next}")]
    DepthMismatch { id: Id, current: u32, next: u32 },

    #[error("ui element {id} does not match its mounted record")]
    Stale { id: Id },

    #[error("ui element {id} belongs to the root tree")]
    OwnedByRoot { id: Id },

    #[error("mounting new content failed: {0}")]
    Mount(#[from] MountError),
}

/// Dismount errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DismountError {
    #[error("ui element {id} belongs to the root tree")]
    OwnedByRoot { id: Id },
}

/// Load errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    #[error("page has no resolvable url")]
    MissingPageUrl,

    #[error("mounting page content failed: {0}")]
    Mount(#[from] MountError),

    #[error("updating page content failed: {0}")]
    Update(#[from] UpdateError),
}
