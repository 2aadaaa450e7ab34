//! Snapshot manager: scoped acquire/release around the external backup run.
//!
//! acquire() walks a fixed sequence: stop services → per-dataset
//! cleanup+snapshot (fail fast) → trigger long-term retention → start
//! services. It hands back a SnapshotGuard; dropping or releasing the
//! guard sweeps every temporary snapshot away again (best-effort, the
//! whole list, even past failures).
//!
//! Failure policy:
//! - acquisition aborts on the first error; services stopped in step 1 are
//!   restarted on every abort path before the error propagates;
//! - a failed final service restart additionally sweeps the snapshots just
//!   created — the resource is not acquired and must not leak;
//! - release never stops at a failing dataset, logs each failure, and the
//!   explicit release() returns the first error so stale state is never
//!   reported as success.

use anyhow::{Context, Result};
use log::{error, info};

use crate::config::ZpoolConfig;
use crate::metrics::{
    record_cleanup_failure, record_long_term_trigger, record_services_started,
    record_services_stopped,
};
use crate::runner::CommandRunner;

use super::Snapshot;

/// Separate pre-configured systemd unit for long-term retention snapshots
/// (local recovery). Started synchronously; its failure is fatal.
const LONG_TERM_UNIT: &str = "sanoid.service";

/// Manages the temporary snapshots for one backup run: stops the
/// configured services, recreates every snapshot, and cleans all of it up
/// again when the guard goes away.
pub struct SnapshotManager<'r> {
    snapshots: Vec<Snapshot>,
    services: Vec<String>,
    runner: &'r dyn CommandRunner,
}

impl<'r> SnapshotManager<'r> {
    pub fn new(zpool: &ZpoolConfig, services: &[String], runner: &'r dyn CommandRunner) -> Self {
        let snapshots = zpool
            .datasets
            .iter()
            .map(|d| Snapshot::new(d, &zpool.name, &zpool.directory))
            .collect();
        Self {
            snapshots,
            services: services.to_vec(),
            runner,
        }
    }

    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    /// Enter the snapshotted state. On success all services are running
    /// again and every temporary snapshot is mounted, ready to be read by
    /// the external backup command; drop (or release()) the returned guard
    /// to clean up.
    pub fn acquire(&self) -> Result<SnapshotGuard<'_, 'r>> {
        let stopped = self.stop_services()?;

        if let Err(e) = self.create_all() {
            if stopped {
                // Оставить сервисы лежать после неудачного бэкапа нельзя.
                if let Err(restart) = self.start_services() {
                    error!("restart services after aborted acquisition: {:#}", restart);
                }
            }
            return Err(e);
        }

        if stopped {
            if let Err(e) = self.start_services() {
                // Snapshots already exist: not acquired, so don't leak them.
                let _ = self.cleanup_all();
                return Err(e);
            }
        }

        Ok(SnapshotGuard {
            manager: self,
            released: false,
        })
    }

    /// Manual repair path (`snapback cleanup`): one idempotent sweep over
    /// every dataset.
    pub fn cleanup(&self) -> Result<()> {
        self.cleanup_all()
    }

    /// Per dataset, in configured order: defensive cleanup of stale state
    /// from a crashed prior run, then create+mount. Fails fast so that a
    /// failure at dataset i leaves datasets after i untouched.
    fn create_all(&self) -> Result<()> {
        for snap in &self.snapshots {
            snap.cleanup(self.runner)
                .with_context(|| format!("cleanup {}", snap))?;
            snap.snapshot(self.runner)
                .with_context(|| format!("snapshot {}", snap))?;
        }
        info!("created {} temporary snapshot(s)", self.snapshots.len());

        self.runner
            .run(&["systemctl", "start", LONG_TERM_UNIT])
            .context("trigger long-term retention snapshots")?;
        record_long_term_trigger();
        info!("created long-term snapshots");

        Ok(())
    }

    fn stop_services(&self) -> Result<bool> {
        if self.services.is_empty() {
            return Ok(false);
        }
        let mut argv = vec!["systemctl", "stop"];
        argv.extend(self.services.iter().map(String::as_str));
        self.runner.run(&argv).context("stop services")?;
        record_services_stopped(self.services.len());
        info!("stopped {} service(s)", self.services.len());
        Ok(true)
    }

    fn start_services(&self) -> Result<()> {
        let mut argv = vec!["systemctl", "start"];
        argv.extend(self.services.iter().map(String::as_str));
        self.runner.run(&argv).context("start services")?;
        record_services_started(self.services.len());
        info!("started {} service(s)", self.services.len());
        Ok(())
    }

    /// Best-effort sweep over the full list: one failing dataset must not
    /// block cleanup of the others. Returns the first error once every
    /// dataset was attempted.
    fn cleanup_all(&self) -> Result<()> {
        let mut first_err = None;
        for snap in &self.snapshots {
            if let Err(e) = snap.cleanup(self.runner) {
                record_cleanup_failure();
                error!("cleanup {} failed: {:#}", snap, e);
                if first_err.is_none() {
                    first_err = Some(e.context(format!("cleanup {}", snap.name)));
                }
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => {
                info!("cleaned up snapshots");
                Ok(())
            }
        }
    }
}

/// Scoped handle over the snapshotted state. Held while the external
/// backup command reads the mounts; the temporary snapshots are swept
/// away exactly once, on release() or Drop.
pub struct SnapshotGuard<'a, 'r> {
    manager: &'a SnapshotManager<'r>,
    released: bool,
}

impl std::fmt::Debug for SnapshotGuard<'_, '_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotGuard")
            .field("released", &self.released)
            .finish_non_exhaustive()
    }
}

impl SnapshotGuard<'_, '_> {
    /// Success-path release. Propagates the first cleanup failure after
    /// sweeping the whole list, so a run with stale leftovers exits
    /// non-zero.
    pub fn release(mut self) -> Result<()> {
        self.released = true;
        self.manager.cleanup_all()
    }
}

impl Drop for SnapshotGuard<'_, '_> {
    fn drop(&mut self) {
        if !self.released {
            // Abort path: cleanup failures are already logged by
            // cleanup_all; the held block's error stays the primary one.
            let _ = self.manager.cleanup_all();
        }
    }
}
