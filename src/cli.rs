use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use std::path::PathBuf;

use crate::config::Config;
use crate::metrics::record_backup_run;
use crate::motd;
use crate::runner::{CommandRunner, SystemRunner};
use crate::snapshot::SnapshotManager;

/// External backup command run while the snapshots are held.
const BACKUP_ARGV: &[&str] = &["resticprofile", "backup"];

#[derive(Parser, Debug)]
#[command(
    name = "snapback",
    version,
    about = "Quiesce services, snapshot ZFS datasets, run the backup, clean up",
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Recreate all temporary snapshots, run the backup command, clean up.
    Backup {
        #[arg(long)]
        config: PathBuf,
    },
    /// Remove stale temporary snapshots and mounts left by a crashed run.
    Cleanup {
        #[arg(long)]
        config: PathBuf,
    },
    /// Render the configured status modules.
    Motd {
        #[arg(long)]
        config: PathBuf,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let runner = SystemRunner;

    match cli.cmd {
        Cmd::Backup { config } => {
            let cfg = Config::load(&config)?;
            cfg.validate()?;
            let manager = SnapshotManager::new(&cfg.zpool, &cfg.services, &runner);

            let guard = manager.acquire()?;
            // Держим снапшоты смонтированными, пока работает внешний бэкап.
            // При ошибке guard уходит в Drop и подчищает за собой.
            runner.run(BACKUP_ARGV).context("backup command")?;
            info!("finished backup");
            guard.release()?;

            record_backup_run();
            println!("Backup finished: {} dataset(s)", cfg.zpool.datasets.len());
        }
        Cmd::Cleanup { config } => {
            let cfg = Config::load(&config)?;
            cfg.validate()?;
            let manager = SnapshotManager::new(&cfg.zpool, &cfg.services, &runner);
            manager.cleanup()?;
            println!("Cleaned up {} dataset(s)", cfg.zpool.datasets.len());
        }
        Cmd::Motd { config } => {
            let cfg = Config::load(&config)?;
            let motd_cfg = cfg.motd.unwrap_or_default();
            print!("{}", motd::render_all(&motd_cfg, &runner));
        }
    }

    Ok(())
}
