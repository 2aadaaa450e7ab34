//! Status (motd) modules.
//!
//! Renders already-produced status into text for the login banner; no
//! coordination, no failure recovery. The module set is a closed tagged
//! enum selected by the `module:` tag in the config:
//! - backup.rs: last backup from the resticprofile status file.
//! - system.rs: OS version, uptime, load, service states.

use serde::Deserialize;

use crate::runner::CommandRunner;

pub mod backup;
pub mod system;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MotdConfig {
    #[serde(default)]
    pub modules: Vec<Module>,
}

/// Closed set of status modules.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "module", rename_all = "lowercase")]
pub enum Module {
    Backup(backup::Backup),
    System(system::System),
}

impl Module {
    pub fn display_name(&self) -> &'static str {
        match self {
            Module::Backup(_) => backup::Backup::DISPLAY_NAME,
            Module::System(_) => system::System::DISPLAY_NAME,
        }
    }

    pub fn render(&self, runner: &dyn CommandRunner) -> String {
        match self {
            Module::Backup(m) => m.render(),
            Module::System(m) => m.render(runner),
        }
    }
}

/// Render every configured module in config order. Each module ends with a
/// newline; modules are separated by a blank line.
pub fn render_all(cfg: &MotdConfig, runner: &dyn CommandRunner) -> String {
    cfg.modules
        .iter()
        .map(|m| m.render(runner))
        .collect::<Vec<_>>()
        .join("\n")
}
