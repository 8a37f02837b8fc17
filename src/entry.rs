//! Unified output record for container listings.
//!
//! A [`ListEntry`] is the single shape every listed container is reduced to,
//! whether it came from the runtime (via a locked snapshot) or from the
//! storage layer (via the external adapter). Entries are constructed fresh
//! per listing call and never cached.

use crate::runtime::{NetworkAttachment, PortMapping};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// State label for entries adapted from storage-only records.
pub const STORAGE_STATE: &str = "storage";

// =============================================================================
// Size Info
// =============================================================================

/// Disk usage for one container, present only when size probing was
/// requested.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeInfo {
    /// Size of the read-only root filesystem, in bytes.
    pub root_fs_size: u64,
    /// Size of the read-write layer, in bytes.
    pub rw_size: u64,
}

// =============================================================================
// List Entry
// =============================================================================

/// One container in a listing.
///
/// Lifecycle and placement fields (`state`, `exited`, `exit_code`, `pid`,
/// timestamps) are always derived from a single lock acquisition on the
/// source container, never from two independent reads. Optional diagnostics
/// (`namespaces`, `size`) are `None` unless explicitly requested, so
/// "intentionally absent" is distinguishable from a genuine zero value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListEntry {
    /// Container ID.
    pub id: String,
    /// Container names (primary name first).
    pub names: Vec<String>,
    /// Image reference.
    pub image: String,
    /// Image ID.
    pub image_id: String,
    /// Command the container runs (synthetic marker for external records).
    pub command: Vec<String>,
    /// User-supplied labels.
    pub labels: HashMap<String, String>,
    /// Creation timestamp; the output sort key.
    pub created: DateTime<Utc>,
    /// Time the container was last started, if known.
    pub started_at: Option<DateTime<Utc>>,
    /// True if the container's main process has exited.
    pub exited: bool,
    /// Exit code of the main process (meaningful only if `exited`).
    pub exit_code: i32,
    /// Time the container last exited, if known.
    pub exited_at: Option<DateTime<Utc>>,
    /// Display state label: a runtime lifecycle state (e.g. "running") or
    /// [`STORAGE_STATE`] for externally-adapted records.
    pub state: String,
    /// Pid of the container's main process (0 if not running).
    pub pid: i32,
    /// Owning pod ID, if any.
    pub pod: Option<String>,
    /// Owning pod display name, resolved only when pod info was requested.
    pub pod_name: Option<String>,
    /// True if this is a pod's infra container.
    pub is_infra: bool,
    /// True if the container is removed automatically on exit.
    pub auto_remove: bool,
    /// User-mounted volume destinations.
    pub mounts: Vec<String>,
    /// Network attachments, keyed by network name.
    pub networks: HashMap<String, NetworkAttachment>,
    /// Published port mappings.
    pub ports: Vec<PortMapping>,
    /// Kernel namespace identifiers, present only when requested.
    pub namespaces: Option<crate::namespaces::NamespaceSet>,
    /// Disk usage, present only when requested.
    pub size: Option<SizeInfo>,
    /// Health-check status string (empty if unavailable).
    pub status: String,
}

impl Default for ListEntry {
    fn default() -> Self {
        Self {
            id: String::new(),
            names: Vec::new(),
            image: String::new(),
            image_id: String::new(),
            command: Vec::new(),
            labels: HashMap::new(),
            created: DateTime::<Utc>::UNIX_EPOCH,
            started_at: None,
            exited: false,
            exit_code: 0,
            exited_at: None,
            state: String::new(),
            pid: 0,
            pod: None,
            pod_name: None,
            is_infra: false,
            auto_remove: false,
            mounts: Vec::new(),
            networks: HashMap::new(),
            ports: Vec::new(),
            namespaces: None,
            size: None,
            status: String::new(),
        }
    }
}

// =============================================================================
// Sorting
// =============================================================================

/// Stable sort by creation time, most recent first.
///
/// One comparator serves both raw containers (pre-truncation) and finished
/// entries (final output ordering); only the timestamp accessor differs.
/// Ties keep their incoming relative order.
pub fn sort_by_created_desc<T>(items: &mut [T], created: impl Fn(&T) -> DateTime<Utc>) {
    items.sort_by(|a, b| created(b).cmp(&created(a)));
}
