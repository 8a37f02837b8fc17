//! Shared in-memory fakes for the collaborator traits.
//!
//! `TestContainer` guards all mutable state behind a `Mutex`, so its
//! `batch` implementation gives the same guarantee the real runtime does:
//! nothing can mutate the container while a snapshot closure runs.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use magikps::error::{Error, Result};
use magikps::runtime::{
    Container, ContainerConfig, ContainerFilter, ContainerRuntime, ContainerStatus,
    ContainerView, NetworkAttachment, PortMapping, StorageContainer,
};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

/// Convenience timestamp constructor for test data.
pub fn ts(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).unwrap()
}

// =============================================================================
// Test Container
// =============================================================================

/// Mutable half of a test container, guarded by the container "lock".
pub struct Inner {
    pub config: ContainerConfig,
    pub state: ContainerStatus,
    pub exit_code: i32,
    pub exited: bool,
    pub pid: i32,
    pub started: Option<DateTime<Utc>>,
    pub finished: Option<DateTime<Utc>>,
    pub root_fs_size: u64,
    pub rw_size: u64,
    /// Simulates a container removed between enumeration and snapshot.
    pub vanished: bool,
    /// Makes the force-resync step fail.
    pub sync_fails: bool,
    /// Makes the pid read fail with a generic runtime error.
    pub pid_fails: bool,
}

pub struct TestContainer {
    inner: Mutex<Inner>,
    pub volumes: Vec<String>,
    pub ports: Vec<PortMapping>,
    pub networks: HashMap<String, NetworkAttachment>,
    pub health: Option<String>,
}

impl TestContainer {
    /// A running container with sensible defaults.
    pub fn new(id: &str, name: &str, created: DateTime<Utc>) -> Arc<Self> {
        let config = ContainerConfig {
            id: id.to_string(),
            name: name.to_string(),
            command: vec!["/bin/sh".to_string()],
            rootfs_image_name: "docker.io/library/alpine:latest".to_string(),
            rootfs_image_id: "sha256:0a97eee8041e".to_string(),
            labels: HashMap::new(),
            created,
            pod: None,
            is_infra: false,
            auto_remove: false,
        };
        Arc::new(Self {
            inner: Mutex::new(Inner {
                config,
                state: ContainerStatus::Running,
                exit_code: 0,
                exited: false,
                pid: 4242,
                started: Some(created),
                finished: None,
                root_fs_size: 0,
                rw_size: 0,
                vanished: false,
                sync_fails: false,
                pid_fails: false,
            }),
            volumes: Vec::new(),
            ports: Vec::new(),
            networks: HashMap::new(),
            health: None,
        })
    }

    /// Direct access to the guarded state; used by tests to stage mutations.
    pub fn inner(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap()
    }

    pub fn set_exited(&self, code: i32, at: DateTime<Utc>) {
        let mut inner = self.inner();
        inner.state = ContainerStatus::Exited;
        inner.exit_code = code;
        inner.exited = true;
        inner.finished = Some(at);
        inner.pid = 0;
    }
}

struct ViewGuard<'a>(&'a mut Inner);

impl ViewGuard<'_> {
    fn check_exists(&self) -> Result<()> {
        if self.0.vanished {
            Err(Error::NoSuchContainer(self.0.config.id.clone()))
        } else {
            Ok(())
        }
    }
}

impl ContainerView for ViewGuard<'_> {
    fn sync_state(&mut self) -> Result<()> {
        self.check_exists()?;
        if self.0.sync_fails {
            Err(Error::Runtime("OCI runtime unreachable".to_string()))
        } else {
            Ok(())
        }
    }

    fn config(&self) -> ContainerConfig {
        self.0.config.clone()
    }

    fn state(&self) -> Result<ContainerStatus> {
        self.check_exists()?;
        Ok(self.0.state)
    }

    fn exit_code(&self) -> Result<(i32, bool)> {
        self.check_exists()?;
        Ok((self.0.exit_code, self.0.exited))
    }

    fn started_time(&self) -> Result<DateTime<Utc>> {
        self.0
            .started
            .ok_or_else(|| Error::Runtime("container has not been started".to_string()))
    }

    fn finished_time(&self) -> Result<DateTime<Utc>> {
        self.0
            .finished
            .ok_or_else(|| Error::Runtime("container has not exited".to_string()))
    }

    fn pid(&self) -> Result<i32> {
        self.check_exists()?;
        if self.0.pid_fails {
            Err(Error::Runtime("pid file unreadable".to_string()))
        } else {
            Ok(self.0.pid)
        }
    }

    fn root_fs_size(&self) -> Result<u64> {
        Ok(self.0.root_fs_size)
    }

    fn rw_size(&self) -> Result<u64> {
        Ok(self.0.rw_size)
    }
}

#[async_trait]
impl Container for TestContainer {
    fn id(&self) -> String {
        self.inner().config.id.clone()
    }

    fn names(&self) -> Vec<String> {
        vec![self.inner().config.name.clone()]
    }

    fn labels(&self) -> HashMap<String, String> {
        self.inner().config.labels.clone()
    }

    fn image_name(&self) -> String {
        self.inner().config.rootfs_image_name.clone()
    }

    fn pod_id(&self) -> Option<String> {
        self.inner().config.pod.clone()
    }

    fn created(&self) -> DateTime<Utc> {
        self.inner().config.created
    }

    fn status_hint(&self) -> ContainerStatus {
        self.inner().state
    }

    fn batch(
        &self,
        op: &mut dyn FnMut(&mut dyn ContainerView) -> Result<()>,
    ) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        let mut view = ViewGuard(&mut inner);
        op(&mut view)
    }

    fn user_volumes(&self) -> Vec<String> {
        self.volumes.clone()
    }

    async fn port_mappings(&self) -> Result<Vec<PortMapping>> {
        self.check_present()?;
        Ok(self.ports.clone())
    }

    async fn networks(&self) -> Result<HashMap<String, NetworkAttachment>> {
        self.check_present()?;
        Ok(self.networks.clone())
    }

    async fn health_status(&self) -> Result<String> {
        self.health
            .clone()
            .ok_or_else(|| Error::Runtime("no health check configured".to_string()))
    }
}

impl TestContainer {
    fn check_present(&self) -> Result<()> {
        let inner = self.inner();
        if inner.vanished {
            Err(Error::NoSuchContainer(inner.config.id.clone()))
        } else {
            Ok(())
        }
    }
}

// =============================================================================
// Test Runtime
// =============================================================================

/// In-memory engine: runtime-managed containers plus storage-only records.
#[derive(Default)]
pub struct TestRuntime {
    pub containers: Vec<Arc<TestContainer>>,
    pub storage: Vec<StorageContainer>,
    /// IDs reported as produced by the external image-building tool.
    pub buildah_ids: HashSet<String>,
    /// Storage record IDs whose load fails.
    pub load_error_ids: HashSet<String>,
    /// image_id → names history (most recent first).
    pub images: HashMap<String, Vec<String>>,
    /// pod_id → pod display name.
    pub pods: HashMap<String, String>,
}

impl TestRuntime {
    pub fn with_containers(containers: Vec<Arc<TestContainer>>) -> Self {
        Self {
            containers,
            ..Default::default()
        }
    }
}

#[async_trait]
impl ContainerRuntime for TestRuntime {
    async fn containers(&self, filters: &[ContainerFilter]) -> Result<Vec<Arc<dyn Container>>> {
        Ok(self
            .containers
            .iter()
            .filter(|c| filters.iter().all(|f| f(c.as_ref())))
            .map(|c| c.clone() as Arc<dyn Container>)
            .collect())
    }

    async fn pod_name(&self, pod_id: &str) -> Result<String> {
        self.pods
            .get(pod_id)
            .cloned()
            .ok_or_else(|| Error::NoSuchContainer(pod_id.to_string()))
    }

    async fn image_names_history(&self, image_id: &str) -> Result<Vec<String>> {
        self.images
            .get(image_id)
            .cloned()
            .ok_or_else(|| Error::Runtime(format!("no such image: {image_id}")))
    }

    async fn is_buildah_container(&self, id: &str) -> Result<bool> {
        if self.load_error_ids.contains(id) {
            return Err(Error::StorageLoad {
                id: id.to_string(),
                reason: "corrupt metadata".to_string(),
            });
        }
        Ok(self.buildah_ids.contains(id))
    }

    async fn storage_containers(&self) -> Result<Vec<StorageContainer>> {
        Ok(self.storage.clone())
    }
}
