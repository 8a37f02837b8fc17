//! Error types for the container listing layer.

use std::path::PathBuf;

/// Result type alias for listing operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while aggregating a container listing.
///
/// Snapshot errors wrap the collaborator error that caused them so callers
/// can walk the chain: a `StateUnavailable` whose root cause is
/// `NoSuchContainer` means the container vanished mid-scan and the entry is
/// silently dropped rather than failing the whole call
/// (see [`Error::is_no_such_container`]).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    // =========================================================================
    // Filter Compilation Errors
    // =========================================================================
    /// Filter key is not one of the supported kinds.
    #[error("unsupported filter key: {0}")]
    UnsupportedFilterKey(String),

    /// Filter value cannot be interpreted for its key.
    #[error("invalid value '{value}' for filter key '{key}'")]
    InvalidFilterValue { key: String, value: String },

    // =========================================================================
    // Container Lookup Errors
    // =========================================================================
    /// Container not found (e.g. removed between enumeration and snapshot).
    #[error("no such container: {0}")]
    NoSuchContainer(String),

    // =========================================================================
    // Snapshot Errors
    // =========================================================================
    /// Force-resync against the OCI runtime failed.
    #[error("unable to update container '{id}' state from OCI runtime")]
    StateSyncFailed {
        id: String,
        #[source]
        source: Box<Error>,
    },

    /// Lifecycle state could not be read.
    #[error("unable to obtain state for container '{id}'")]
    StateUnavailable {
        id: String,
        #[source]
        source: Box<Error>,
    },

    /// Exit code could not be read.
    #[error("unable to obtain exit code for container '{id}'")]
    ExitCodeUnavailable {
        id: String,
        #[source]
        source: Box<Error>,
    },

    /// Process id could not be read; placement data depends on it.
    #[error("unable to obtain pid for container '{id}'")]
    PidUnavailable {
        id: String,
        #[source]
        source: Box<Error>,
    },

    /// Port mappings could not be resolved.
    #[error("unable to obtain port mappings for container '{id}'")]
    PortMappingUnavailable {
        id: String,
        #[source]
        source: Box<Error>,
    },

    /// Network attachments could not be resolved.
    #[error("unable to obtain network attachments for container '{id}'")]
    NetworkUnavailable {
        id: String,
        #[source]
        source: Box<Error>,
    },

    /// The pod a container claims membership in does not exist.
    #[error("could not find pod '{pod}' for container '{container}' in state")]
    NoSuchPod { container: String, pod: String },

    // =========================================================================
    // Storage (External Container) Errors
    // =========================================================================
    /// A storage-only container record could not be loaded.
    #[error("failed to load storage container '{id}': {reason}")]
    StorageLoad { id: String, reason: String },

    // =========================================================================
    // Namespace Errors
    // =========================================================================
    /// A namespace symlink could not be read. Always non-fatal to callers.
    #[error("failed to read namespace link {path}: {reason}")]
    NamespaceUnavailable { path: PathBuf, reason: String },

    // =========================================================================
    // I/O and Internal Errors
    // =========================================================================
    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Collaborator-reported error with no more specific classification.
    #[error("runtime error: {0}")]
    Runtime(String),

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Returns true if this error, or any error in its source chain, is
    /// [`Error::NoSuchContainer`].
    pub fn is_no_such_container(&self) -> bool {
        match self {
            Self::NoSuchContainer(_) => true,
            Self::StateSyncFailed { source, .. }
            | Self::StateUnavailable { source, .. }
            | Self::ExitCodeUnavailable { source, .. }
            | Self::PidUnavailable { source, .. }
            | Self::PortMappingUnavailable { source, .. }
            | Self::NetworkUnavailable { source, .. } => source.is_no_such_container(),
            _ => false,
        }
    }

    /// Returns true if this error is a per-record storage load failure.
    pub fn is_storage_load(&self) -> bool {
        matches!(self, Self::StorageLoad { .. })
    }
}
