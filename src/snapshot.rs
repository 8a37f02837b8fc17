//! Per-container batch snapshot collection.
//!
//! Listing a container touches many fields that can change under it: state,
//! exit status, pid, timestamps. Reading them one lock acquisition at a
//! time would allow a state transition to straddle two reads and produce an
//! entry that never existed (e.g. `state == "running"` with a nonzero exit
//! code). [`collect_batch`] instead acquires the container's lock exactly
//! once and extracts every lock-protected field through a single
//! [`ContainerView`].
//!
//! The critical section is also the performance hot spot, so it ends as
//! early as possible: the common "show me what's running" query reads
//! state, exit status, timestamps and pid, then releases the lock without
//! paying for namespace or disk-usage probing.

use crate::entry::{ListEntry, SizeInfo};
use crate::error::{Error, Result};
use crate::list::ListOptions;
use crate::namespaces::NamespaceSet;
use crate::runtime::{Container, ContainerConfig, ContainerRuntime, ContainerStatus};
use chrono::{DateTime, Utc};
use tracing::{debug, error};

/// Collects one consistent [`ListEntry`] for a runtime-managed container.
///
/// Structural read failures (state, exit code, pid, ports, networks, pod
/// lookup) abort the snapshot with the corresponding wrapping error.
/// Diagnostic reads (timestamps, sizes, per-namespace resolution, health)
/// degrade the affected field and are logged at most.
pub async fn collect_batch(
    runtime: &dyn ContainerRuntime,
    container: &dyn Container,
    opts: &ListOptions,
) -> Result<ListEntry> {
    let id = container.id();

    let mut config: Option<ContainerConfig> = None;
    let mut state = ContainerStatus::Unknown;
    let mut exit_code = 0i32;
    let mut exited = false;
    let mut pid = 0i32;
    let mut started_at: Option<DateTime<Utc>> = None;
    let mut exited_at: Option<DateTime<Utc>> = None;
    let mut namespaces: Option<NamespaceSet> = None;
    let mut size: Option<SizeInfo> = None;

    container.batch(&mut |c| {
        if opts.sync {
            c.sync_state().map_err(|err| Error::StateSyncFailed {
                id: id.clone(),
                source: Box::new(err),
            })?;
        }

        let conf = c.config();
        state = c.state().map_err(|err| Error::StateUnavailable {
            id: id.clone(),
            source: Box::new(err),
        })?;

        let (code, has_exited) = c.exit_code().map_err(|err| Error::ExitCodeUnavailable {
            id: id.clone(),
            source: Box::new(err),
        })?;
        exit_code = code;
        exited = has_exited;

        match c.started_time() {
            Ok(t) => started_at = Some(t),
            Err(err) => error!("Getting started time for {}: {}", id, err),
        }
        match c.finished_time() {
            Ok(t) => exited_at = Some(t),
            Err(err) => error!("Getting exited time for {}: {}", id, err),
        }

        pid = c.pid().map_err(|err| Error::PidUnavailable {
            id: id.clone(),
            source: Box::new(err),
        })?;

        config = Some(conf);

        // Common case: release the lock without probing namespaces or sizes.
        if !opts.size && !opts.namespace {
            return Ok(());
        }

        if opts.namespace {
            namespaces = Some(NamespaceSet::for_pid(pid));
        }
        if opts.size {
            let mut info = SizeInfo::default();
            match c.root_fs_size() {
                Ok(n) => info.root_fs_size = n,
                Err(err) => error!("Getting root fs size for {}: {}", id, err),
            }
            match c.rw_size() {
                Ok(n) => info.rw_size = n,
                Err(err) => error!("Getting rw size for {}: {}", id, err),
            }
            size = Some(info);
        }
        Ok(())
    })?;

    let config = config.ok_or_else(|| {
        Error::Internal(format!("batch for container '{id}' yielded no config"))
    })?;

    // Ports and networks carry their own consistency guarantees inside the
    // runtime; they are resolved outside the critical section.
    let ports = container
        .port_mappings()
        .await
        .map_err(|err| Error::PortMappingUnavailable {
            id: id.clone(),
            source: Box::new(err),
        })?;
    let networks = container
        .networks()
        .await
        .map_err(|err| Error::NetworkUnavailable {
            id: id.clone(),
            source: Box::new(err),
        })?;

    let mut entry = ListEntry {
        id: config.id.clone(),
        names: vec![config.name.clone()],
        image: config.rootfs_image_name.clone(),
        image_id: config.rootfs_image_id.clone(),
        command: config.command.clone(),
        labels: config.labels.clone(),
        created: config.created,
        started_at,
        exited,
        exit_code,
        exited_at,
        state: state.to_string(),
        pid,
        pod: config.pod.clone(),
        pod_name: None,
        is_infra: config.is_infra,
        auto_remove: config.auto_remove,
        mounts: container.user_volumes(),
        networks,
        ports,
        namespaces,
        size,
        status: String::new(),
    };

    if opts.pod {
        if let Some(pod) = &config.pod {
            match runtime.pod_name(pod).await {
                Ok(name) => entry.pod_name = Some(name),
                // The raw lookup error says "no such container", which would
                // mislead callers; surface the pod-shaped error instead.
                Err(err) if err.is_no_such_container() => {
                    return Err(Error::NoSuchPod {
                        container: config.id,
                        pod: pod.clone(),
                    });
                }
                Err(err) => return Err(err),
            }
        }
    }

    match container.health_status().await {
        Ok(health) => entry.status = health,
        Err(err) => debug!("Getting health status for {}: {}", id, err),
    }

    Ok(entry)
}
