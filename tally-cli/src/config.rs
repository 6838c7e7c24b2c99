use anyhow::{Context, Result, bail};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tally_core::categories::{DEFAULT_CURRENCY, currency};
use tally_core::time::parse_timezone;
use tally_ingest::CsvDialect;
use tally_sync::ImportMode;

use crate::state::{default_data_path, ensure_tally_home};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub profile: ProfileSection,
    pub storage: StorageSection,
    pub import: ImportSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileSection {
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// ISO code from the supported currency list
    pub currency: String,
    /// IANA name; decides what "today" means for validation and ranges
    pub timezone: String,
}

impl Default for ProfileSection {
    fn default() -> Self {
        Self {
            user_id: "local".to_string(),
            display_name: None,
            currency: DEFAULT_CURRENCY.to_string(),
            timezone: "UTC".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSection {
    /// Defaults to `<tally home>/transactions.json`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportSection {
    pub mode: ImportMode,
    pub dialect: CsvDialect,
}

impl Config {
    pub fn timezone(&self) -> Result<Tz> {
        parse_timezone(&self.profile.timezone).context("profile.timezone")
    }

    pub fn data_path(&self) -> Result<PathBuf> {
        match &self.storage.data_file {
            Some(p) => Ok(p.clone()),
            None => default_data_path(),
        }
    }

    /// Reject settings that would only fail later, mid-command.
    pub fn check(&self) -> Result<()> {
        if self.profile.user_id.trim().is_empty() {
            bail!("profile.user_id must not be empty");
        }
        if currency(&self.profile.currency).is_none() {
            bail!("profile.currency: unsupported currency {}", self.profile.currency);
        }
        self.timezone()?;
        Ok(())
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_tally_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    load_config_from(&config_path()?)
}

pub fn load_config_from(p: &Path) -> Result<Config> {
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(p).with_context(|| format!("read {}", p.display()))?;
    let cfg: Config = toml::from_str(&s).with_context(|| format!("parse {}", p.display()))?;
    cfg.check()?;
    Ok(cfg)
}

pub fn save_config_to(p: &Path, cfg: &Config) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config_to(&p, &Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.import.mode, ImportMode::Validate);
        assert_eq!(cfg.import.dialect, CsvDialect::Lenient);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("config.toml");
        let mut cfg = Config::default();
        cfg.profile.user_id = "alice".into();
        cfg.profile.timezone = "America/Chicago".into();
        cfg.profile.currency = "EUR".into();
        cfg.import.mode = ImportMode::TrustFile;
        cfg.storage.data_file = Some(dir.path().join("data.json"));

        save_config_to(&p, &cfg).unwrap();
        assert_eq!(load_config_from(&p).unwrap(), cfg);
        assert_eq!(cfg.timezone().unwrap(), chrono_tz::America::Chicago);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("config.toml");
        fs::write(&p, "[import]\nmode = \"trust-file\"\ndialect = \"rfc4180\"\n").unwrap();

        let cfg = load_config_from(&p).unwrap();
        assert_eq!(cfg.profile.user_id, "local");
        assert_eq!(cfg.import.mode, ImportMode::TrustFile);
        assert_eq!(cfg.import.dialect, CsvDialect::Rfc4180);
    }

    #[test]
    fn test_bad_settings_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("config.toml");

        fs::write(&p, "[profile]\ntimezone = \"Mars/Olympus\"\n").unwrap();
        assert!(load_config_from(&p).is_err());

        fs::write(&p, "[profile]\ncurrency = \"XYZ\"\n").unwrap();
        assert!(load_config_from(&p).is_err());
    }
}
