//! Lightweight global metrics for snapback.
//!
//! Потокобезопасные атомарные счётчики для подсистем:
//! - Services (quiesce)
//! - Snapshots (create/destroy/unmount)
//! - Cleanup
//! - Backup runs

use std::sync::atomic::{AtomicU64, Ordering};

// ----- Services -----
static SERVICES_STOPPED: AtomicU64 = AtomicU64::new(0);
static SERVICES_STARTED: AtomicU64 = AtomicU64::new(0);

// ----- Snapshots -----
static SNAPSHOTS_CREATED: AtomicU64 = AtomicU64::new(0);
static SNAPSHOTS_DESTROYED: AtomicU64 = AtomicU64::new(0);
static SNAPSHOT_UNMOUNTS: AtomicU64 = AtomicU64::new(0);
static LONG_TERM_TRIGGERS: AtomicU64 = AtomicU64::new(0);

// ----- Cleanup -----
static CLEANUP_FAILURES: AtomicU64 = AtomicU64::new(0);

// ----- Backup -----
static BACKUP_RUNS: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone, Default)]
pub struct MetricsSnapshot {
    pub services_stopped: u64,
    pub services_started: u64,

    pub snapshots_created: u64,
    pub snapshots_destroyed: u64,
    pub snapshot_unmounts: u64,
    pub long_term_triggers: u64,

    pub cleanup_failures: u64,

    pub backup_runs: u64,
}

// ----- Recorders (Services) -----
pub fn record_services_stopped(count: usize) {
    SERVICES_STOPPED.fetch_add(count as u64, Ordering::Relaxed);
}
pub fn record_services_started(count: usize) {
    SERVICES_STARTED.fetch_add(count as u64, Ordering::Relaxed);
}

// ----- Recorders (Snapshots) -----
pub fn record_snapshot_created() {
    SNAPSHOTS_CREATED.fetch_add(1, Ordering::Relaxed);
}
pub fn record_snapshot_destroyed() {
    SNAPSHOTS_DESTROYED.fetch_add(1, Ordering::Relaxed);
}
pub fn record_snapshot_unmount() {
    SNAPSHOT_UNMOUNTS.fetch_add(1, Ordering::Relaxed);
}
pub fn record_long_term_trigger() {
    LONG_TERM_TRIGGERS.fetch_add(1, Ordering::Relaxed);
}

// ----- Recorders (Cleanup) -----
pub fn record_cleanup_failure() {
    CLEANUP_FAILURES.fetch_add(1, Ordering::Relaxed);
}

// ----- Recorders (Backup) -----
pub fn record_backup_run() {
    BACKUP_RUNS.fetch_add(1, Ordering::Relaxed);
}

// ----- Snapshot / Reset -----
pub fn snapshot() -> MetricsSnapshot {
    MetricsSnapshot {
        services_stopped: SERVICES_STOPPED.load(Ordering::Relaxed),
        services_started: SERVICES_STARTED.load(Ordering::Relaxed),

        snapshots_created: SNAPSHOTS_CREATED.load(Ordering::Relaxed),
        snapshots_destroyed: SNAPSHOTS_DESTROYED.load(Ordering::Relaxed),
        snapshot_unmounts: SNAPSHOT_UNMOUNTS.load(Ordering::Relaxed),
        long_term_triggers: LONG_TERM_TRIGGERS.load(Ordering::Relaxed),

        cleanup_failures: CLEANUP_FAILURES.load(Ordering::Relaxed),

        backup_runs: BACKUP_RUNS.load(Ordering::Relaxed),
    }
}

pub fn reset() {
    SERVICES_STOPPED.store(0, Ordering::Relaxed);
    SERVICES_STARTED.store(0, Ordering::Relaxed);

    SNAPSHOTS_CREATED.store(0, Ordering::Relaxed);
    SNAPSHOTS_DESTROYED.store(0, Ordering::Relaxed);
    SNAPSHOT_UNMOUNTS.store(0, Ordering::Relaxed);
    LONG_TERM_TRIGGERS.store(0, Ordering::Relaxed);

    CLEANUP_FAILURES.store(0, Ordering::Relaxed);

    BACKUP_RUNS.store(0, Ordering::Relaxed);
}
