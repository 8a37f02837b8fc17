//! Kernel namespace introspection via `/proc` symlinks.
//!
//! A process's namespace membership is exposed by the kernel as symlinks
//! under `/proc/<pid>/ns/`, each pointing at a pseudo-target of the form
//! `net:[4026531840]`. The identifier is the content inside the square
//! brackets. Resolution is best effort: a process that has already exited
//! simply yields empty identifiers, never an error to the listing caller.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default procfs mount point.
pub const PROC_DIR: &str = "/proc";

// =============================================================================
// Namespace Set
// =============================================================================

/// The seven namespace identifiers of one process.
///
/// Each field holds the bracket-delimited content of the corresponding
/// `/proc/<pid>/ns/*` symlink target, or the empty string if that link
/// could not be read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamespaceSet {
    pub cgroup: String,
    pub ipc: String,
    pub mnt: String,
    pub net: String,
    pub pidns: String,
    pub user: String,
    pub uts: String,
}

impl NamespaceSet {
    /// Resolves all seven namespaces of `pid` under the default procfs.
    pub fn for_pid(pid: i32) -> Self {
        Self::from_proc(Path::new(PROC_DIR), pid)
    }

    /// Resolves all seven namespaces of `pid` under `proc_root`.
    ///
    /// Individual resolution failures degrade to an empty string for that
    /// namespace only.
    pub fn from_proc(proc_root: &Path, pid: i32) -> Self {
        let ns_dir = proc_root.join(pid.to_string()).join("ns");
        let resolve = |name: &str| namespace_info(&ns_dir.join(name)).unwrap_or_default();
        Self {
            cgroup: resolve("cgroup"),
            ipc: resolve("ipc"),
            mnt: resolve("mnt"),
            net: resolve("net"),
            pidns: resolve("pid"),
            user: resolve("user"),
            uts: resolve("uts"),
        }
    }
}

// =============================================================================
// Symlink Resolution
// =============================================================================

/// Reads a namespace symlink and extracts the identifier from its target.
///
/// A read failure returns [`Error::NamespaceUnavailable`], which callers
/// in this crate always treat as non-fatal.
pub fn namespace_info(path: &Path) -> Result<String> {
    let target = fs::read_link(path).map_err(|err| Error::NamespaceUnavailable {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })?;
    Ok(bracket_contents(&target.to_string_lossy()))
}

/// Extracts the substring inside square brackets, verbatim.
///
/// Comma-separated tokens inside the brackets pass through unchanged; a
/// target without brackets is returned as-is.
fn bracket_contents(target: &str) -> String {
    match (target.find('['), target.rfind(']')) {
        (Some(open), Some(close)) if open < close => target[open + 1..close].to_string(),
        _ => target.to_string(),
    }
}
