//! # magikps
//!
//! **Container Listing Aggregation for the magik Container Stack**
//!
//! This crate produces a single, consistently-ordered, filtered snapshot of
//! every observable container — the `ps` subsystem for an operating system
//! of containers rather than processes. It merges four sources:
//!
//! - a live runtime with per-container locking,
//! - an on-disk storage layer holding containers the runtime doesn't manage,
//! - kernel namespace introspection under `/proc`,
//! - user-supplied filter predicates.
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                            magikps                                  │
//! ├─────────────────────────────────────────────────────────────────────┤
//! │  ┌─────────────────────────────────────────────────────────────┐    │
//! │  │                   list::list_containers                     │    │
//! │  │  compile filters → enumerate → pre-truncate → snapshot      │    │
//! │  │          → merge external → sort → final truncate           │    │
//! │  └───────┬─────────────────────┬───────────────────┬───────────┘    │
//! │          │                     │                   │                │
//! │  ┌───────┴────────┐   ┌────────┴─────────┐  ┌──────┴────────────┐   │
//! │  │ filters        │   │ snapshot         │  │ external          │   │
//! │  │ FilterKind     │   │ collect_batch    │  │ storage-only      │   │
//! │  │ (closed enum)  │   │ (one lock per    │  │ records → entries │   │
//! │  │                │   │  container)      │  │                   │   │
//! │  └────────────────┘   └────────┬─────────┘  └───────────────────┘   │
//! │                                │                                    │
//! │                       ┌────────┴─────────┐                          │
//! │                       │ namespaces       │                          │
//! │                       │ /proc/<pid>/ns/* │                          │
//! │                       └──────────────────┘                          │
//! ├─────────────────────────────────────────────────────────────────────┤
//! │        Collaborators (traits in `runtime`, implemented by           │
//! │        the engine): ContainerRuntime / Container / ContainerView    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Snapshot Consistency
//!
//! Every lifecycle and placement field of a [`ListEntry`] comes from a
//! single lock acquisition on the source container
//! ([`Container::batch`](runtime::Container::batch)). Two independent reads
//! could straddle a state transition and emit an entry that never existed;
//! one locked view cannot.
//!
//! # Ordering
//!
//! The only guaranteed order is the final output order: creation time,
//! most recent first, stable on ties. Collection order across containers
//! is unspecified.
//!
//! # Failure Policy
//!
//! All-or-nothing at the call boundary, with two deliberate exceptions
//! baked into the pipeline: containers that vanish between enumeration and
//! snapshot, and storage records that fail to load, are silently skipped.
//! Diagnostic fields (timestamps, sizes, namespaces, health) degrade to
//! empty values instead of failing the call.
//!
//! # Example
//!
//! ```rust,ignore
//! use magikps::{list_containers, ListOptions};
//!
//! #[tokio::main]
//! async fn main() -> magikps::Result<()> {
//!     let runtime = engine.runtime(); // implements ContainerRuntime
//!     let options = ListOptions {
//!         all: true,
//!         external: true,
//!         ..Default::default()
//!     };
//!     for entry in list_containers(runtime.as_ref(), &options).await? {
//!         println!("{}  {}  {}", entry.id, entry.state, entry.names[0]);
//!     }
//!     Ok(())
//! }
//! ```

pub mod entry;
pub mod error;
pub mod external;
pub mod filters;
pub mod list;
pub mod namespaces;
pub mod runtime;
pub mod snapshot;

// Re-exports
pub use entry::{sort_by_created_desc, ListEntry, SizeInfo, STORAGE_STATE};
pub use error::{Error, Result};
pub use external::external_containers;
pub use filters::{compile_filters, CompiledFilters, FilterKind};
pub use list::{list_containers, ListOptions};
pub use namespaces::{namespace_info, NamespaceSet};
pub use runtime::{
    Container, ContainerConfig, ContainerFilter, ContainerRuntime, ContainerStatus,
    ContainerView, NetworkAttachment, PortMapping, StorageContainer,
};
pub use snapshot::collect_batch;
