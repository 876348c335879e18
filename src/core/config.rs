use super::capacity::ServiceabilityAssumptions;
use super::rate_limit::RateLimitConfig;
use super::stamp_duty::{Jurisdiction, StampDutyTables};
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct StampDutyConfig {
    pub default_jurisdiction: Jurisdiction,
    /// Extra or replacement tables; WA is always available
    pub tables: StampDutyTables,
}

impl Default for StampDutyConfig {
    fn default() -> Self {
        StampDutyConfig {
            default_jurisdiction: Jurisdiction::Wa,
            tables: StampDutyTables::default(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct EnquiryConfig {
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub serviceability: ServiceabilityAssumptions,
    #[serde(default)]
    pub stamp_duty: StampDutyConfig,
    #[serde(default)]
    pub enquiries: EnquiryConfig,
}

impl AppConfig {
    /// Loads the default config file, or built-in defaults when none exists.
    pub fn load_or_default() -> Result<Self> {
        let config_path = Self::default_config_path()?;
        if config_path.exists() {
            Self::load_from_path(&config_path)
        } else {
            debug!(
                "No config at {}, using built-in defaults",
                config_path.display()
            );
            Ok(Self::default())
        }
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("au", "brokercalc", "brokercalc")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.serviceability
            .validate()
            .context("Invalid serviceability assumptions")?;
        self.stamp_duty
            .tables
            .validate()
            .context("Invalid stamp duty tables")?;
        Ok(())
    }
}
