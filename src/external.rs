//! Adapter for storage-only (external) container records.
//!
//! The storage layer can hold containers the runtime has never heard of,
//! typically working containers created by an external image-building tool.
//! They have no lifecycle state, no pid and no lock; this module folds them
//! into the same [`ListEntry`] shape with the `"storage"` sentinel state
//! and a synthetic one-element command marking their origin.

use crate::entry::{ListEntry, STORAGE_STATE};
use crate::error::Result;
use crate::runtime::{ContainerRuntime, StorageContainer};
use tracing::debug;

/// Command marker for records produced by the external image-building tool.
const BUILDAH_MARKER: &str = "buildah";
/// Command marker for all other storage-only records.
const STORAGE_MARKER: &str = "storage";
/// Image label for from-scratch build containers with no image ID.
const SCRATCH_IMAGE: &str = "scratch";

/// Lists all storage-only container records as [`ListEntry`] values.
///
/// A record that fails to load is skipped; any other per-record error
/// aborts the whole external batch.
pub async fn external_containers(runtime: &dyn ContainerRuntime) -> Result<Vec<ListEntry>> {
    let records = runtime.storage_containers().await?;
    let mut entries = Vec::with_capacity(records.len());
    for record in records {
        match storage_entry(runtime, &record).await {
            Ok(entry) => entries.push(entry),
            Err(err) if err.is_storage_load() => {
                debug!("Skipping unloadable storage container {}: {}", record.id, err);
                continue;
            }
            Err(err) => return Err(err),
        }
    }
    Ok(entries)
}

/// Converts one storage record into a [`ListEntry`].
pub async fn storage_entry(
    runtime: &dyn ContainerRuntime,
    record: &StorageContainer,
) -> Result<ListEntry> {
    let name = record
        .names
        .first()
        .cloned()
        .unwrap_or_else(|| "unknown".to_string());

    let buildah = runtime.is_buildah_container(&record.id).await?;
    let marker = if buildah { BUILDAH_MARKER } else { STORAGE_MARKER };

    let mut image = String::new();
    if !record.image_id.is_empty() {
        let history = runtime.image_names_history(&record.image_id).await?;
        if let Some(first) = history.first() {
            image = first.clone();
        }
    } else if buildah {
        image = SCRATCH_IMAGE.to_string();
    }

    Ok(ListEntry {
        id: record.id.clone(),
        names: vec![name],
        image,
        image_id: record.image_id.clone(),
        command: vec![marker.to_string()],
        created: record.created,
        state: STORAGE_STATE.to_string(),
        ..ListEntry::default()
    })
}
