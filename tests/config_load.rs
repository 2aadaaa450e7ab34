use anyhow::Result;
use std::fs;

use snapback::motd::Module;
use snapback::Config;

#[test]
fn load_full_config() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let backup_dir = dir.path().join("backup");
    fs::create_dir_all(&backup_dir)?;

    let yaml = format!(
        "
services:
  - app.service
zpool:
  name: tank
  directory: {}
  datasets:
    - home
    - data
motd:
  modules:
    - module: backup
      file: /var/lib/resticprofile/status.json
    - module: system
      services: [nginx.service]
",
        backup_dir.display()
    );
    let path = dir.path().join("config.yaml");
    fs::write(&path, yaml)?;

    let cfg = Config::load(&path)?;
    cfg.validate()?;

    assert_eq!(cfg.services, ["app.service"]);
    assert_eq!(cfg.zpool.name, "tank");
    assert_eq!(cfg.zpool.datasets, ["home", "data"]);

    let motd = cfg.motd.expect("motd section must parse");
    assert_eq!(motd.modules.len(), 2);
    assert!(matches!(motd.modules[0], Module::Backup(_)));
    assert!(matches!(motd.modules[1], Module::System(_)));
    Ok(())
}

#[test]
fn services_and_motd_are_optional() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let yaml = format!(
        "zpool:\n  name: tank\n  directory: {}\n  datasets: [home]\n",
        dir.path().display()
    );
    let path = dir.path().join("config.yaml");
    fs::write(&path, yaml)?;

    let cfg = Config::load(&path)?;
    cfg.validate()?;
    assert!(cfg.services.is_empty());
    assert!(cfg.motd.is_none());
    Ok(())
}

#[test]
fn malformed_yaml_is_a_parse_error() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("config.yaml");
    fs::write(&path, "zpool: [not, a, mapping]\n")?;
    assert!(Config::load(&path).is_err());
    Ok(())
}

#[test]
fn missing_file_names_the_path() {
    let err = Config::load(std::path::Path::new("/nonexistent/config.yaml"))
        .expect_err("missing config must fail");
    assert!(format!("{:#}", err).contains("/nonexistent/config.yaml"));
}

#[test]
fn validation_happens_before_anything_runs() -> Result<()> {
    let dir = tempfile::tempdir()?;
    // Directory does not exist: precondition error, nothing to clean up.
    let yaml = format!(
        "zpool:\n  name: tank\n  directory: {}\n  datasets: [home]\n",
        dir.path().join("missing").display()
    );
    let path = dir.path().join("config.yaml");
    fs::write(&path, yaml)?;

    let cfg = Config::load(&path)?;
    assert!(cfg.validate().is_err());
    Ok(())
}
