//! Top-level listing aggregation.
//!
//! [`list_containers`] is the single entry point. One call moves through a
//! fixed pipeline, no stage re-entered:
//!
//! ```text
//! compile filters → enumerate → pre-truncate → snapshot per container
//!                 → merge external → sort → final truncate
//! ```
//!
//! The pre-truncation pass for `last > 0` is purely an optimization: it
//! avoids paying snapshot cost for containers that cannot appear in the
//! output. The final sort + truncate over the merged set is authoritative,
//! because externally-adapted records were not part of the first pass.

use crate::entry::{sort_by_created_desc, ListEntry};
use crate::error::Result;
use crate::external::external_containers;
use crate::filters::compile_filters;
use crate::runtime::ContainerRuntime;
use crate::snapshot::collect_batch;
use std::collections::HashMap;
use tracing::debug;

// =============================================================================
// Options
// =============================================================================

/// Options for one listing call.
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    /// Include non-running containers.
    pub all: bool,
    /// Also list storage-only containers (requires `all`).
    pub external: bool,
    /// Raw filter mapping, key → values.
    pub filters: HashMap<String, Vec<String>>,
    /// Return only the N most recently created containers (0 = no limit).
    pub last: usize,
    /// Resolve kernel namespace identifiers per container.
    pub namespace: bool,
    /// Resolve pod display names for containers in pods.
    pub pod: bool,
    /// Compute root filesystem and read-write layer sizes.
    pub size: bool,
    /// Force a state resync against the OCI runtime before reading.
    pub sync: bool,
}

// =============================================================================
// Aggregation
// =============================================================================

/// Produces the filtered, consistently-ordered container listing.
///
/// Returns all matching entries sorted by creation time, most recent
/// first, truncated to `last` when set. A container that vanishes between
/// enumeration and snapshot collection is dropped silently; every other
/// snapshot failure aborts the call with no partial result.
pub async fn list_containers(
    runtime: &dyn ContainerRuntime,
    options: &ListOptions,
) -> Result<Vec<ListEntry>> {
    // `last` implies looking at stopped containers too.
    let compiled = compile_filters(&options.filters, options.all || options.last > 0)?;

    let mut containers = runtime.containers(&compiled.filters).await?;

    if options.last > 0 {
        // Truncate before the expensive per-container snapshots. The final
        // pass below remains authoritative.
        sort_by_created_desc(&mut containers, |c| c.created());
        containers.truncate(options.last);
    }

    let mut entries: Vec<ListEntry> = Vec::with_capacity(containers.len());
    for container in &containers {
        match collect_batch(runtime, container.as_ref(), options).await {
            Ok(entry) => entries.push(entry),
            Err(err) if err.is_no_such_container() => {
                debug!("Container {} vanished during listing: {}", container.id(), err);
                continue;
            }
            Err(err) => return Err(err),
        }
    }

    // Filter predicates do not apply to external containers; they carry no
    // runtime metadata to match against.
    if options.all && options.external {
        entries.extend(external_containers(runtime).await?);
    }

    sort_by_created_desc(&mut entries, |e| e.created);

    if options.last > 0 {
        entries.truncate(options.last);
    }

    Ok(entries)
}
