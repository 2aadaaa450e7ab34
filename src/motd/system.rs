//! MOTD module for system status: OS version, uptime, load averages and
//! the state of the configured systemd units.

use chrono::Duration;
use log::warn;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::runner::CommandRunner;
use crate::util::format_duration;

#[derive(Debug, Clone, Deserialize)]
pub struct System {
    /// Units whose `systemctl is-active` state is shown.
    #[serde(default)]
    pub services: Vec<String>,
}

impl System {
    pub const DISPLAY_NAME: &'static str = "System";

    pub fn render(&self, runner: &dyn CommandRunner) -> String {
        let mut out = format!(
            "{}:\n  Version: {}\n  Uptime: {}\n  Load: {}\n",
            Self::DISPLAY_NAME,
            os_version(Path::new("/etc/os-release")).unwrap_or_else(|| "unknown".into()),
            uptime(Path::new("/proc/uptime")).unwrap_or_else(|| "unknown".into()),
            loadavg(Path::new("/proc/loadavg")).unwrap_or_else(|| "unknown".into()),
        );

        if !self.services.is_empty() {
            out.push_str("  Services:\n");
            for name in &self.services {
                let state = match runner.output(&["systemctl", "is-active", name]) {
                    Ok(s) if !s.is_empty() => s,
                    Ok(_) => "unknown".to_string(),
                    Err(e) => {
                        warn!("systemctl is-active {}: {:#}", name, e);
                        "unknown".to_string()
                    }
                };
                out.push_str(&format!("    {}: {}\n", name, state));
            }
        }

        out
    }
}

/// PRETTY_NAME from an os-release file.
fn os_version(path: &Path) -> Option<String> {
    let text = fs::read_to_string(path).ok()?;
    text.lines()
        .find_map(|line| line.strip_prefix("PRETTY_NAME="))
        .map(|rest| rest.trim_matches('"').to_string())
}

/// First field of /proc/uptime (seconds since boot), humanized.
fn uptime(path: &Path) -> Option<String> {
    let text = fs::read_to_string(path).ok()?;
    let secs: f64 = text.split_whitespace().next()?.parse().ok()?;
    Some(format_duration(Duration::seconds(secs as i64)))
}

/// 1/5/15-minute load averages from /proc/loadavg.
fn loadavg(path: &Path) -> Option<String> {
    let text = fs::read_to_string(path).ok()?;
    let mut fields = text.split_whitespace();
    Some(format!(
        "{}, {}, {}",
        fields.next()?,
        fields.next()?,
        fields.next()?
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn fixture(contents: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        f
    }

    #[test]
    fn os_version_reads_pretty_name() {
        let f = fixture("NAME=\"NixOS\"\nPRETTY_NAME=\"NixOS 25.05 (Warbler)\"\n");
        assert_eq!(
            os_version(f.path()).as_deref(),
            Some("NixOS 25.05 (Warbler)")
        );
    }

    #[test]
    fn os_version_missing_file() {
        assert_eq!(os_version(Path::new("/nonexistent/os-release")), None);
    }

    #[test]
    fn uptime_parses_first_field() {
        let f = fixture("93784.21 180000.00\n");
        // 93784 s = 1d 2h 3m
        assert_eq!(uptime(f.path()).as_deref(), Some("1d 2h"));
    }

    #[test]
    fn loadavg_takes_three_fields() {
        let f = fixture("0.52 0.58 0.59 1/389 12345\n");
        assert_eq!(loadavg(f.path()).as_deref(), Some("0.52, 0.58, 0.59"));
    }
}
