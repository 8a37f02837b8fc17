//! Filter predicate compilation.
//!
//! User-supplied filters arrive as a `key → [values]` mapping. Each known
//! key compiles to one [`ContainerFilter`]; values under one key combine
//! with logical OR, predicates for different keys combine with logical AND
//! (the runtime applies them during enumeration).
//!
//! Dispatch is a closed [`FilterKind`] enum rather than a stringly-typed
//! map lookup, so adding a key is an exhaustiveness-checked change. The
//! caller-facing contract is unchanged: an unknown key fails compilation
//! with [`Error::UnsupportedFilterKey`] and no partial predicate set is
//! returned.

use crate::error::{Error, Result};
use crate::runtime::{Container, ContainerFilter, ContainerStatus};
use std::collections::HashMap;

// =============================================================================
// Filter Kinds
// =============================================================================

/// The closed set of supported filter keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    /// Match on container ID prefix.
    Id,
    /// Match on any container name containing the value.
    Name,
    /// Match on label presence (`key`) or equality (`key=value`).
    Label,
    /// Match on the image reference containing the value.
    Ancestor,
    /// Match on lifecycle status.
    Status,
    /// Match on owning pod ID.
    Pod,
}

impl FilterKind {
    /// Maps a raw filter key to its kind. Unknown keys return `None`.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "id" => Some(Self::Id),
            "name" => Some(Self::Name),
            "label" => Some(Self::Label),
            "ancestor" => Some(Self::Ancestor),
            "status" => Some(Self::Status),
            "pod" => Some(Self::Pod),
            _ => None,
        }
    }

    /// Compiles this kind against its values into one predicate.
    ///
    /// Values combine with logical OR: the predicate holds if any value
    /// matches.
    pub fn compile(self, values: &[String]) -> Result<ContainerFilter> {
        match self {
            Self::Id => {
                let values = values.to_vec();
                Ok(Box::new(move |c: &dyn Container| {
                    values.iter().any(|v| c.id().starts_with(v.as_str()))
                }))
            }
            Self::Name => {
                let values = values.to_vec();
                Ok(Box::new(move |c: &dyn Container| {
                    values
                        .iter()
                        .any(|v| c.names().iter().any(|n| n.contains(v.as_str())))
                }))
            }
            Self::Label => {
                let values = values.to_vec();
                Ok(Box::new(move |c: &dyn Container| {
                    let labels = c.labels();
                    values.iter().any(|v| match v.split_once('=') {
                        Some((k, want)) => labels.get(k).is_some_and(|have| have.as_str() == want),
                        None => labels.contains_key(v.as_str()),
                    })
                }))
            }
            Self::Ancestor => {
                let values = values.to_vec();
                Ok(Box::new(move |c: &dyn Container| {
                    values.iter().any(|v| c.image_name().contains(v.as_str()))
                }))
            }
            Self::Status => {
                let mut statuses = Vec::with_capacity(values.len());
                for v in values {
                    let status =
                        ContainerStatus::from_str(v).ok_or_else(|| Error::InvalidFilterValue {
                            key: "status".to_string(),
                            value: v.clone(),
                        })?;
                    statuses.push(status);
                }
                Ok(Box::new(move |c: &dyn Container| {
                    statuses.contains(&c.status_hint())
                }))
            }
            Self::Pod => {
                let values = values.to_vec();
                Ok(Box::new(move |c: &dyn Container| {
                    c.pod_id()
                        .is_some_and(|pod| values.iter().any(|v| pod == *v))
                }))
            }
        }
    }
}

// =============================================================================
// Compilation
// =============================================================================

/// Result of compiling a raw filter mapping.
pub struct CompiledFilters {
    /// One predicate per filter key (plus the implicit running-only
    /// predicate when synthesized).
    pub filters: Vec<ContainerFilter>,
    /// Effective scope after the status-filter override.
    pub all: bool,
}

/// Compiles a raw filter mapping into predicates and resolves the scope.
///
/// A `status` filter is meaningless unless unfiltered data is visible
/// first, so its presence forces the effective scope to all containers.
/// Conversely, a call without `all` and without a `status` filter gets an
/// implicit running-only predicate appended: listing without flags shows
/// only active containers.
pub fn compile_filters(
    raw: &HashMap<String, Vec<String>>,
    all: bool,
) -> Result<CompiledFilters> {
    let mut filters: Vec<ContainerFilter> = Vec::with_capacity(raw.len() + 1);
    for (key, values) in raw {
        let kind = FilterKind::from_key(key)
            .ok_or_else(|| Error::UnsupportedFilterKey(key.clone()))?;
        filters.push(kind.compile(values)?);
    }

    let has_status = raw.get("status").is_some_and(|v| !v.is_empty());
    let all = all || has_status;
    if !all {
        let running = vec![ContainerStatus::Running.to_string()];
        filters.push(FilterKind::Status.compile(&running)?);
    }

    Ok(CompiledFilters { filters, all })
}
