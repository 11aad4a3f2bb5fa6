use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use pilot_core::{DEFAULT_WINDOW_MONTHS, EngineConfig, Locale};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub metrics: MetricsSection,
    #[serde(default)]
    pub display: DisplaySection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSection {
    /// Trailing months the ledger export covers
    #[serde(default = "default_window_months")]
    pub window_months: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplaySection {
    #[serde(default)]
    pub locale: Locale,
    /// IANA timezone used to decide "today"
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

fn default_window_months() -> u32 {
    DEFAULT_WINDOW_MONTHS
}

fn default_timezone() -> String {
    "America/Sao_Paulo".to_string()
}

impl Default for MetricsSection {
    fn default() -> Self {
        Self {
            window_months: default_window_months(),
        }
    }
}

impl Default for DisplaySection {
    fn default() -> Self {
        Self {
            locale: Locale::default(),
            timezone: default_timezone(),
        }
    }
}

impl Config {
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            window_months: self.metrics.window_months,
            locale: self.display.locale,
        }
    }

    pub fn timezone(&self) -> Result<Tz> {
        self.display
            .timezone
            .parse()
            .map_err(|_| anyhow::anyhow!("invalid timezone: {}", self.display.timezone))
    }

    /// Current calendar date in the configured timezone
    pub fn today(&self) -> Result<NaiveDate> {
        let tz = self.timezone()?;
        Ok(Utc::now().with_timezone(&tz).date_naive())
    }
}

pub fn config_path(home: &Path) -> PathBuf {
    home.join("config.toml")
}

pub fn load_config(home: &Path) -> Result<Config> {
    let p = config_path(home);
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    let cfg: Config = toml::from_str(&s).context("parse config.toml")?;
    // Fail early on a bad timezone rather than at first use
    cfg.timezone()?;
    Ok(cfg)
}

pub fn save_config(home: &Path, cfg: &Config) -> Result<()> {
    let p = config_path(home);
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config(home: &Path) -> Result<()> {
    let p = config_path(home);
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(home, &Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}
