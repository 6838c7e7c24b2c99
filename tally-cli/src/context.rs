use anyhow::{Context, Result};
use chrono::NaiveDate;
use chrono_tz::Tz;
use tally_core::today_in;
use tally_sync::{LocalProvider, Session};

use crate::config::Config;

/// Everything a command needs, built once in `main` and passed down.
pub struct AppContext {
    pub session: Session,
    pub config: Config,
    pub tz: Tz,
    pub provider: LocalProvider,
}

impl AppContext {
    /// Open the configured data file.
    pub fn open(config: Config) -> Result<Self> {
        let tz = config.timezone()?;
        let path = config.data_path()?;
        let provider = LocalProvider::open(&path, tz).with_context(|| format!("open {}", path.display()))?;
        Ok(Self::with_provider(config, tz, provider))
    }

    pub fn with_provider(config: Config, tz: Tz, provider: LocalProvider) -> Self {
        let mut session = Session::new(config.profile.user_id.clone());
        if let Some(name) = &config.profile.display_name {
            session = session.with_display_name(name.clone());
        }
        Self {
            session,
            config,
            tz,
            provider,
        }
    }

    pub fn today(&self) -> NaiveDate {
        today_in(self.tz)
    }

    pub fn currency(&self) -> &str {
        &self.config.profile.currency
    }
}
