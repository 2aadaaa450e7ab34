//! Centralized configuration for snapback.
//!
//! One YAML file describes the whole deployment:
//! - services: systemd units to quiesce around the snapshots (may be empty).
//! - zpool: pool name, mount base directory, ordered dataset short names.
//! - motd: optional status modules for the `motd` subcommand.
//!
//! Loading parses only; validate() is the separate precondition pass that
//! the orchestrating subcommands run before any service is touched.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::motd::MotdConfig;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Systemd units stopped before and started after snapshot creation.
    #[serde(default)]
    pub services: Vec<String>,

    pub zpool: ZpoolConfig,

    /// Status modules for the motd subcommand.
    #[serde(default)]
    pub motd: Option<MotdConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ZpoolConfig {
    /// Pool name, e.g. "tank".
    pub name: String,

    /// Base directory under which every snapshot is mounted.
    pub directory: PathBuf,

    /// Dataset short names in processing order. One deterministic
    /// temporary snapshot name per dataset.
    pub datasets: Vec<String>,
}

impl Config {
    /// Read and parse the YAML config file. Does not validate; the
    /// orchestrating commands call validate() themselves so that the motd
    /// path does not require the backup directory to exist.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        serde_yaml::from_str(&text)
            .with_context(|| format!("parse config {}", path.display()))
    }

    /// Precondition pass. Everything rejected here is reported before any
    /// service or snapshot is touched.
    pub fn validate(&self) -> Result<()> {
        let zpool = &self.zpool;
        if zpool.name.trim().is_empty() {
            bail!("zpool.name must not be empty");
        }
        if zpool.name.contains('/') || zpool.name.contains('@') {
            bail!("zpool.name {:?} must be a bare pool name", zpool.name);
        }

        if zpool.datasets.is_empty() {
            bail!("zpool.datasets must name at least one dataset");
        }
        let mut seen = HashSet::new();
        for d in &zpool.datasets {
            if d.trim().is_empty() {
                bail!("zpool.datasets contains an empty dataset name");
            }
            if d.contains('/') || d.contains('@') || d.chars().any(char::is_whitespace) {
                bail!("invalid dataset name {:?}", d);
            }
            if !seen.insert(d.as_str()) {
                bail!("duplicate dataset name {:?}", d);
            }
        }

        if !zpool.directory.is_dir() {
            bail!(
                "backup directory {} does not exist",
                zpool.directory.display()
            );
        }

        for s in &self.services {
            if s.trim().is_empty() {
                bail!("services contains an empty service name");
            }
        }

        Ok(())
    }
}
