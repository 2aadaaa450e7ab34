//! Snapshot module split into submodules:
//! - mod.rs: Snapshot — one temporary ZFS snapshot and its mount point
//!   (idempotent cleanup, create+mount).
//! - manager.rs: SnapshotManager / SnapshotGuard — quiesce services,
//!   recreate all snapshots, trigger long-term retention, guaranteed
//!   cleanup on release.
//!
//! External API surface:
//! - Snapshot
//! - SnapshotManager
//! - SnapshotGuard

use anyhow::{Context, Result};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::metrics::{record_snapshot_created, record_snapshot_destroyed, record_snapshot_unmount};
use crate::runner::CommandRunner;

mod manager;

pub use manager::{SnapshotGuard, SnapshotManager};

/// Suffix of every temporary snapshot name. The name is deterministic and
/// reused across runs, which is what makes idempotent cleanup necessary.
pub const SNAPSHOT_SUFFIX: &str = "backup";

/// Low-level handle for one ZFS snapshot and its mount point.
///
/// Stateless: name and mount path are pure functions of the configuration.
/// All effects live in the filesystem and the mount table, so cleanup() is
/// safe to call both defensively (repairing a crashed prior run) and
/// finally (removing the temporary snapshot).
pub struct Snapshot {
    /// Fully qualified snapshot name, `<pool>/<dataset>@backup`.
    pub name: String,
    /// Mount point, `<directory>/<dataset>`.
    pub path: PathBuf,
}

impl Snapshot {
    pub fn new(dataset: &str, zpool: &str, directory: &Path) -> Self {
        Self {
            name: format!("{}/{}@{}", zpool, dataset, SNAPSHOT_SUFFIX),
            path: directory.join(dataset),
        }
    }

    /// Unmount and destroy the snapshot if present. Idempotent: a missing
    /// mount or snapshot is a no-op success. A failing umount aborts before
    /// the destroy — a still-busy mount must not lose its snapshot.
    pub fn cleanup(&self, runner: &dyn CommandRunner) -> Result<()> {
        let path = self.path.to_string_lossy();

        if runner.status(&["mountpoint", "-q", "--", path.as_ref()])? {
            runner
                .run(&["umount", path.as_ref()])
                .with_context(|| format!("unmount {}", self.path.display()))?;
            record_snapshot_unmount();
        }

        if runner.status(&["zfs", "list", &self.name])? {
            runner
                .run(&["zfs", "destroy", &self.name])
                .with_context(|| format!("destroy snapshot {}", self.name))?;
            record_snapshot_destroyed();
        }

        Ok(())
    }

    /// Create and mount the snapshot. Not idempotent: assumes cleanup()
    /// has just run. Any failure is fatal — a half-created snapshot must
    /// not be treated as usable.
    pub fn snapshot(&self, runner: &dyn CommandRunner) -> Result<()> {
        runner
            .run(&["zfs", "snapshot", &self.name])
            .with_context(|| format!("create snapshot {}", self.name))?;

        if !self.path.exists() {
            fs::create_dir_all(&self.path)
                .with_context(|| format!("create mount dir {}", self.path.display()))?;
        }

        let path = self.path.to_string_lossy();
        runner
            .run(&["mount", "-t", "zfs", &self.name, path.as_ref()])
            .with_context(|| format!("mount {} at {}", self.name, self.path.display()))?;
        record_snapshot_created();

        Ok(())
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.path.display())
    }
}
