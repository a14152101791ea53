//! Persistence for BeanIndex: versioned snapshot save/load.

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::BeanError;
use crate::model::{BeanDefinition, BeanInjectionPoint};
use crate::storage::{load_compressed, save_compressed};

use super::types::BeanIndex;

/// Bumped whenever the snapshot layout changes.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Logical persisted state of a bean index. The interface registry is not part
/// of it and is rebuilt by a full re-scan.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct IndexSnapshot {
    pub version: u32,
    /// Seconds since the Unix epoch.
    pub timestamp: u64,
    pub beans: Vec<BeanDefinition>,
    pub injection_points: Vec<BeanInjectionPoint>,
}

impl BeanIndex {
    /// Capture live beans and injection points in registration order.
    pub fn snapshot(&self) -> IndexSnapshot {
        IndexSnapshot {
            version: SNAPSHOT_VERSION,
            timestamp: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
            beans: self.beans().cloned().collect(),
            injection_points: self.injection_points().cloned().collect(),
        }
    }

    /// Replace all in-memory state with the snapshot's contents.
    pub fn restore(&mut self, snapshot: IndexSnapshot) {
        self.clear();
        self.add_beans(snapshot.beans);
        self.add_injection_points(snapshot.injection_points);
    }

    pub fn from_snapshot(snapshot: IndexSnapshot) -> Self {
        let mut index = Self::default();
        index.restore(snapshot);
        index
    }
}

pub fn save_snapshot(snapshot: &IndexSnapshot, path: &Path) -> Result<(), BeanError> {
    save_compressed(path, snapshot, "bean-snapshot")
}

/// Load a snapshot. A missing file or a snapshot written by another layout
/// version yields `Ok(None)` so the caller starts from an empty index.
pub fn load_snapshot(path: &Path) -> Result<Option<IndexSnapshot>, BeanError> {
    if !path.exists() {
        info!(path = %path.display(), "No snapshot found, starting empty");
        return Ok(None);
    }
    let snapshot: IndexSnapshot = load_compressed(path, "bean-snapshot")?;
    if snapshot.version != SNAPSHOT_VERSION {
        warn!(
            found = snapshot.version,
            expected = SNAPSHOT_VERSION,
            "Ignoring snapshot with incompatible version"
        );
        return Ok(None);
    }
    Ok(Some(snapshot))
}
