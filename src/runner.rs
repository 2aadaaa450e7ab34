//! Command runner: the single seam over external process invocation.
//!
//! Every side effect of the orchestration is external (systemctl, zfs,
//! mount/umount, the backup command itself), so everything goes through
//! one trait:
//! - run(): inherit stdio, non-zero exit is an error.
//! - status(): quiet probe, non-zero exit is Ok(false), never an error.
//! - output(): capture stdout, non-zero exit still yields the output.
//!
//! SystemRunner is the production implementation. Tests drive the
//! orchestration with scripted implementations of the same trait.

use anyhow::{anyhow, Context, Result};
use std::process::{Command, Stdio};

pub trait CommandRunner {
    /// Spawn argv and wait, stdio inherited. Non-zero exit is an error
    /// naming the command line.
    fn run(&self, argv: &[&str]) -> Result<()>;

    /// Spawn argv and wait with stdio silenced. Ok(true) on exit 0,
    /// Ok(false) on any non-zero exit; Err only if the spawn itself fails.
    fn status(&self, argv: &[&str]) -> Result<bool>;

    /// Spawn argv and capture stdout (trimmed). Exit code is ignored:
    /// probes like `systemctl is-active` report state via stdout.
    fn output(&self, argv: &[&str]) -> Result<String>;
}

/// Runner backed by std::process::Command.
pub struct SystemRunner;

fn split_argv<'a>(argv: &'a [&'a str]) -> Result<(&'a str, &'a [&'a str])> {
    argv.split_first()
        .map(|(p, rest)| (*p, rest))
        .ok_or_else(|| anyhow!("empty command line"))
}

impl CommandRunner for SystemRunner {
    fn run(&self, argv: &[&str]) -> Result<()> {
        let (prog, args) = split_argv(argv)?;
        let status = Command::new(prog)
            .args(args)
            .status()
            .with_context(|| format!("spawn {}", argv.join(" ")))?;
        if status.success() {
            Ok(())
        } else {
            Err(anyhow!("command failed ({}): {}", status, argv.join(" ")))
        }
    }

    fn status(&self, argv: &[&str]) -> Result<bool> {
        let (prog, args) = split_argv(argv)?;
        let status = Command::new(prog)
            .args(args)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .with_context(|| format!("spawn {}", argv.join(" ")))?;
        Ok(status.success())
    }

    fn output(&self, argv: &[&str]) -> Result<String> {
        let (prog, args) = split_argv(argv)?;
        let out = Command::new(prog)
            .args(args)
            .stderr(Stdio::null())
            .output()
            .with_context(|| format!("spawn {}", argv.join(" ")))?;
        Ok(String::from_utf8_lossy(&out.stdout).trim().to_string())
    }
}
