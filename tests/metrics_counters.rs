//! Metrics counters over a full orchestration run. Kept in its own test
//! binary: the counters are process-global.

use anyhow::{bail, Result};
use std::cell::RefCell;
use std::collections::HashSet;

use snapback::{metrics, CommandRunner, SnapshotManager, ZpoolConfig};

#[derive(Default)]
struct WorldRunner {
    snapshots: RefCell<HashSet<String>>,
    mounts: RefCell<HashSet<String>>,
}

impl CommandRunner for WorldRunner {
    fn run(&self, argv: &[&str]) -> Result<()> {
        match argv {
            ["zfs", "snapshot", name] => {
                if !self.snapshots.borrow_mut().insert(name.to_string()) {
                    bail!("snapshot already exists: {}", name);
                }
            }
            ["zfs", "destroy", name] => {
                if !self.snapshots.borrow_mut().remove(*name) {
                    bail!("no such snapshot: {}", name);
                }
            }
            ["umount", path] => {
                if !self.mounts.borrow_mut().remove(*path) {
                    bail!("not mounted: {}", path);
                }
            }
            ["mount", "-t", "zfs", _name, path] => {
                self.mounts.borrow_mut().insert(path.to_string());
            }
            _ => {}
        }
        Ok(())
    }

    fn status(&self, argv: &[&str]) -> Result<bool> {
        Ok(match argv {
            ["mountpoint", "-q", "--", path] => self.mounts.borrow().contains(*path),
            ["zfs", "list", name] => self.snapshots.borrow().contains(*name),
            _ => true,
        })
    }

    fn output(&self, _argv: &[&str]) -> Result<String> {
        Ok(String::new())
    }
}

#[test]
fn full_run_records_expected_counters() -> Result<()> {
    metrics::reset();

    let dir = tempfile::tempdir()?;
    let zpool = ZpoolConfig {
        name: "tank".into(),
        directory: dir.path().to_path_buf(),
        datasets: vec!["home".into(), "data".into()],
    };
    let services = vec!["app.service".into()];
    let runner = WorldRunner::default();
    let mgr = SnapshotManager::new(&zpool, &services, &runner);

    let guard = mgr.acquire()?;
    guard.release()?;

    let m = metrics::snapshot();
    assert_eq!(m.services_stopped, 1);
    assert_eq!(m.services_started, 1);
    assert_eq!(m.snapshots_created, 2);
    assert_eq!(m.snapshots_destroyed, 2);
    assert_eq!(m.snapshot_unmounts, 2);
    assert_eq!(m.long_term_triggers, 1);
    assert_eq!(m.cleanup_failures, 0);
    Ok(())
}
