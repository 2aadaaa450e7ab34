//! MOTD module for backup status.
//!
//! Reads the resticprofile status file and renders the default profile's
//! last backup: status, age, bytes added, bytes total. A malformed or
//! missing status file renders a fallback line instead of failing the
//! whole banner.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::warn;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

use crate::util::{format_age, human_bytes};

#[derive(Debug, Clone, Deserialize)]
pub struct Backup {
    /// Path to the resticprofile status file.
    pub file: PathBuf,
}

// Status file layout: {"profiles": {"default": {"backup": {...}}}}
#[derive(Debug, Deserialize)]
struct StatusFile {
    profiles: Profiles,
}

#[derive(Debug, Deserialize)]
struct Profiles {
    #[serde(rename = "default")]
    default_profile: Profile,
}

#[derive(Debug, Deserialize)]
struct Profile {
    backup: BackupStatus,
}

#[derive(Debug, Deserialize)]
pub struct BackupStatus {
    pub success: bool,
    #[serde(default)]
    pub error: String,
    pub time: DateTime<Utc>,
    pub bytes_added: u64,
    pub bytes_total: u64,
}

impl Backup {
    pub const DISPLAY_NAME: &'static str = "Backup";

    pub fn render(&self) -> String {
        match self.read_status() {
            Ok(st) => {
                let status = if st.success {
                    "Success".to_string()
                } else {
                    st.error.clone()
                };
                format!(
                    "{}:\n  Status: {} ({})\n  Added: {}\n  Total: {}\n",
                    Self::DISPLAY_NAME,
                    status,
                    format_age(st.time),
                    human_bytes(st.bytes_added as f64),
                    human_bytes(st.bytes_total as f64),
                )
            }
            Err(e) => {
                warn!("backup status: {:#}", e);
                format!(
                    "{}:\n  Status: failed to parse status file\n",
                    Self::DISPLAY_NAME
                )
            }
        }
    }

    fn read_status(&self) -> Result<BackupStatus> {
        let text = fs::read_to_string(&self.file)
            .with_context(|| format!("read status file {}", self.file.display()))?;
        let parsed: StatusFile = serde_json::from_str(&text)
            .with_context(|| format!("parse status file {}", self.file.display()))?;
        Ok(parsed.profiles.default_profile.backup)
    }
}
