//! Collaborator interfaces consumed by the listing pipeline.
//!
//! The listing layer does not own container lifecycle, storage, or
//! networking. It consumes them through three traits:
//!
//! - [`ContainerRuntime`]: the engine-level surface (enumerate containers,
//!   resolve pod names, look up images, enumerate storage-only records).
//! - [`Container`]: one runtime-managed container, borrowed for the duration
//!   of a scan. Cheap metadata accessors are lock-free hints used by filter
//!   predicates; consistent data comes from [`Container::batch`].
//! - [`ContainerView`]: the view of a container *inside* its lock. All
//!   fields read through one view are guaranteed mutually consistent.
//!
//! # Locking Model
//!
//! [`Container::batch`] is borrow-and-apply: the implementation acquires the
//! container's lock, hands the closure a [`ContainerView`], and releases the
//! lock when the closure returns — on every exit path, including early
//! `?` returns. The listing layer never holds two container locks at once,
//! so it cannot deadlock on its own.

use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

// =============================================================================
// Container Status
// =============================================================================

/// Lifecycle status of a runtime-managed container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerStatus {
    /// Container is configured but has never been created in the runtime.
    Configured,
    /// Container has been created but not started.
    Created,
    /// Container is running.
    Running,
    /// Container is paused.
    Paused,
    /// Container has been stopped by the runtime.
    Stopped,
    /// Container process has exited.
    Exited,
    /// Container is being removed.
    Removing,
    /// Status could not be determined.
    Unknown,
}

impl ContainerStatus {
    /// Parses a status from its display form (e.g. "running").
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "configured" => Some(Self::Configured),
            "created" => Some(Self::Created),
            "running" => Some(Self::Running),
            "paused" => Some(Self::Paused),
            "stopped" => Some(Self::Stopped),
            "exited" => Some(Self::Exited),
            "removing" => Some(Self::Removing),
            "unknown" => Some(Self::Unknown),
            _ => None,
        }
    }
}

impl std::fmt::Display for ContainerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Configured => write!(f, "configured"),
            Self::Created => write!(f, "created"),
            Self::Running => write!(f, "running"),
            Self::Paused => write!(f, "paused"),
            Self::Stopped => write!(f, "stopped"),
            Self::Exited => write!(f, "exited"),
            Self::Removing => write!(f, "removing"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

// =============================================================================
// Value Types
// =============================================================================

/// Immutable per-container configuration, read under the container lock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerConfig {
    /// Container ID.
    pub id: String,
    /// Primary container name.
    pub name: String,
    /// Command the container was created with.
    pub command: Vec<String>,
    /// Image reference the rootfs was built from.
    pub rootfs_image_name: String,
    /// Image ID the rootfs was built from.
    pub rootfs_image_id: String,
    /// User-supplied labels.
    pub labels: HashMap<String, String>,
    /// Creation timestamp.
    pub created: DateTime<Utc>,
    /// Owning pod ID, if the container belongs to a pod.
    pub pod: Option<String>,
    /// True if this is a pod's infra container.
    pub is_infra: bool,
    /// True if the container is removed automatically on exit.
    pub auto_remove: bool,
}

/// A single published port mapping, computed by the networking subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortMapping {
    /// Host IP the port is bound to (empty = all interfaces).
    pub host_ip: String,
    /// Port on the host.
    pub host_port: u16,
    /// Port inside the container.
    pub container_port: u16,
    /// Protocol ("tcp", "udp", "sctp").
    pub protocol: String,
}

/// Per-network attachment info, computed by the networking subsystem.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkAttachment {
    /// Name aliases for the container on this network.
    pub aliases: Vec<String>,
    /// IP addresses assigned on this network.
    pub ip_addresses: Vec<String>,
}

/// A container record tracked by the storage layer but not by the runtime
/// (e.g. a working container created by an external image-building tool).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageContainer {
    /// Container ID.
    pub id: String,
    /// Names attached to the record (may be empty).
    pub names: Vec<String>,
    /// Image ID the container layers on top of (empty for from-scratch builds).
    pub image_id: String,
    /// Creation timestamp.
    pub created: DateTime<Utc>,
}

// =============================================================================
// Filter Predicates
// =============================================================================

/// A compiled boolean predicate over a container's visible metadata.
///
/// Predicates for different filter keys combine with logical AND; the
/// runtime applies them during enumeration.
pub type ContainerFilter = Box<dyn Fn(&dyn Container) -> bool + Send + Sync>;

// =============================================================================
// Locked Container View
// =============================================================================

/// View of a container while its lock is held.
///
/// Every read through one view reflects the same point in time. Obtained
/// only through [`Container::batch`].
pub trait ContainerView {
    /// Reconciles recorded state against the live OCI runtime before any
    /// other read. Used by the force-resync listing option.
    fn sync_state(&mut self) -> Result<()>;

    /// Returns the container's immutable configuration.
    fn config(&self) -> ContainerConfig;

    /// Returns the current lifecycle status.
    fn state(&self) -> Result<ContainerStatus>;

    /// Returns `(exit_code, exited)` for the container's main process.
    fn exit_code(&self) -> Result<(i32, bool)>;

    /// Returns the time the container was last started.
    fn started_time(&self) -> Result<DateTime<Utc>>;

    /// Returns the time the container last finished.
    fn finished_time(&self) -> Result<DateTime<Utc>>;

    /// Returns the pid of the container's main process (0 if not running).
    fn pid(&self) -> Result<i32>;

    /// Computes the size of the read-only root filesystem, in bytes.
    fn root_fs_size(&self) -> Result<u64>;

    /// Computes the size of the read-write layer, in bytes.
    fn rw_size(&self) -> Result<u64>;
}

// =============================================================================
// Container
// =============================================================================

/// One runtime-managed container, borrowed by the listing layer for the
/// duration of a scan.
#[async_trait]
pub trait Container: Send + Sync {
    /// Container ID.
    fn id(&self) -> String;

    /// Names attached to the container.
    fn names(&self) -> Vec<String>;

    /// User-supplied labels.
    fn labels(&self) -> HashMap<String, String>;

    /// Image reference the container was created from.
    fn image_name(&self) -> String;

    /// Owning pod ID, if any.
    fn pod_id(&self) -> Option<String>;

    /// Creation timestamp.
    fn created(&self) -> DateTime<Utc>;

    /// Point-in-time status hint for filter predicates. The authoritative
    /// status comes from [`ContainerView::state`] under the lock.
    fn status_hint(&self) -> ContainerStatus;

    /// Acquires the container's lock and applies `op` to the locked view.
    ///
    /// The lock is held for exactly the duration of `op` and released on
    /// every exit path. An error returned by `op` is propagated unchanged.
    fn batch(
        &self,
        op: &mut dyn FnMut(&mut dyn ContainerView) -> Result<()>,
    ) -> Result<()>;

    /// Returns the container's user-mounted volume destinations.
    fn user_volumes(&self) -> Vec<String>;

    /// Resolves published port mappings. Consistency is owned by the
    /// networking subsystem, not this layer.
    async fn port_mappings(&self) -> Result<Vec<PortMapping>>;

    /// Resolves network attachments, keyed by network name.
    async fn networks(&self) -> Result<HashMap<String, NetworkAttachment>>;

    /// Fetches the latest health-check status string.
    async fn health_status(&self) -> Result<String>;
}

// =============================================================================
// Container Runtime
// =============================================================================

/// Engine-level surface the listing pipeline pulls from.
#[async_trait]
pub trait ContainerRuntime: Send + Sync {
    /// Enumerates runtime-managed containers matching *all* of the given
    /// predicates.
    async fn containers(&self, filters: &[ContainerFilter]) -> Result<Vec<Arc<dyn Container>>>;

    /// Resolves a pod ID to its display name. Returns
    /// [`crate::Error::NoSuchContainer`] if the pod is not in state.
    async fn pod_name(&self, pod_id: &str) -> Result<String>;

    /// Looks up an image by ID, returning its historical name list
    /// (most recent first).
    async fn image_names_history(&self, image_id: &str) -> Result<Vec<String>>;

    /// Returns true if the given storage container was produced by the
    /// external image-building tool. A per-record load failure surfaces as
    /// [`crate::Error::StorageLoad`].
    async fn is_buildah_container(&self, id: &str) -> Result<bool>;

    /// Enumerates container records tracked only by the storage layer.
    async fn storage_containers(&self) -> Result<Vec<StorageContainer>>;
}
