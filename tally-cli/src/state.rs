use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// `$TALLY_HOME` if set, else `~/.tally`.
pub fn tally_home() -> Result<PathBuf> {
    resolve_home(std::env::var("TALLY_HOME").ok(), std::env::var("HOME").ok())
}

fn resolve_home(tally_home: Option<String>, home: Option<String>) -> Result<PathBuf> {
    if let Some(dir) = tally_home.filter(|d| !d.trim().is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    let home = home.context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".tally"))
}

pub fn ensure_tally_home() -> Result<PathBuf> {
    let dir = tally_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

pub fn default_data_path() -> Result<PathBuf> {
    Ok(ensure_tally_home()?.join("transactions.json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_wins() {
        let dir = resolve_home(Some("/tmp/t".into()), Some("/home/me".into())).unwrap();
        assert_eq!(dir, PathBuf::from("/tmp/t"));
    }

    #[test]
    fn test_falls_back_to_home() {
        let dir = resolve_home(Some("  ".into()), Some("/home/me".into())).unwrap();
        assert_eq!(dir, PathBuf::from("/home/me/.tally"));
        assert!(resolve_home(None, None).is_err());
    }
}
