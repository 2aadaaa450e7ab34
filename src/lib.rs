// Базовые модули
pub mod config;
pub mod metrics;
pub mod runner;
pub mod util;

// Ядро: снапшоты и оркестрация (папка с mod.rs)
pub mod snapshot; // src/snapshot/{mod,manager}.rs

// Статусные модули (motd)
pub mod motd; // src/motd/{mod,backup,system}.rs

// CLI
pub mod cli;

// Удобные реэкспорты
pub use config::{Config, ZpoolConfig};
pub use runner::{CommandRunner, SystemRunner};
pub use snapshot::{Snapshot, SnapshotGuard, SnapshotManager};
