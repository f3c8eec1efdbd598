//! Analytics configuration
//!
//! Tunables for the analytics engine (trend window sizes, the default
//! budget alert threshold).
//!
//! ## Configuration Resolution
//!
//! Config is loaded with a two-layer resolution:
//! 1. Check for override in data dir (~/.local/share/tally/config/analytics.toml)
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! Keys missing from an override keep their built-in values.

use std::fs;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::models::DEFAULT_ALERT_THRESHOLD;

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/analytics.toml");

/// Resolved analytics settings
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsConfig {
    /// Trailing months in a trend report when the caller gives none
    pub default_trend_months: u32,
    /// Upper bound on requested trend months
    pub max_trend_months: u32,
    /// Threshold applied to budgets created without one
    pub default_alert_threshold: Decimal,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            default_trend_months: 6,
            max_trend_months: 60,
            default_alert_threshold: DEFAULT_ALERT_THRESHOLD,
        }
    }
}

impl AnalyticsConfig {
    /// Load config from the default override location, else embedded defaults
    pub fn load() -> Result<Self> {
        load_config(None)
    }

    /// Load config from a specific override file
    pub fn with_config_path(path: &Path) -> Result<Self> {
        load_config(Some(path))
    }

    /// Clamp a requested trend window to the configured bounds
    pub fn trend_months(&self, requested: Option<u32>) -> u32 {
        requested
            .unwrap_or(self.default_trend_months)
            .min(self.max_trend_months)
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("tally").join("config").join("analytics.toml"))
}

/// Load configuration (override first, then default)
fn load_config(override_path: Option<&Path>) -> Result<AnalyticsConfig> {
    let path = match override_path {
        Some(path) => Some(path.to_path_buf()),
        None => default_config_path(),
    };

    let content = match path {
        Some(path) if path.exists() => {
            tracing::debug!("Loading analytics config from {}", path.display());
            fs::read_to_string(&path)
                .map_err(|e| Error::Config(format!("Failed to read config: {}", e)))?
        }
        _ => DEFAULT_CONFIG.to_string(),
    };

    parse_config(&content)
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    trends: Option<RawTrends>,
    budgets: Option<RawBudgets>,
}

#[derive(Debug, Deserialize)]
struct RawTrends {
    default_months: Option<u32>,
    max_months: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct RawBudgets {
    default_alert_threshold: Option<Decimal>,
}

/// Parse config from TOML content
fn parse_config(content: &str) -> Result<AnalyticsConfig> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

    let mut config = AnalyticsConfig::default();

    if let Some(trends) = raw.trends {
        if let Some(months) = trends.default_months {
            config.default_trend_months = months;
        }
        if let Some(max) = trends.max_months {
            config.max_trend_months = max;
        }
    }

    if let Some(budgets) = raw.budgets {
        if let Some(threshold) = budgets.default_alert_threshold {
            if threshold < Decimal::ZERO || threshold > Decimal::ONE {
                return Err(Error::Config(format!(
                    "default_alert_threshold must be between 0 and 1 (got {})",
                    threshold
                )));
            }
            config.default_alert_threshold = threshold;
        }
    }

    if config.default_trend_months > config.max_trend_months {
        return Err(Error::Config(format!(
            "default_months ({}) exceeds max_months ({})",
            config.default_trend_months, config.max_trend_months
        )));
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::io::Write;

    #[test]
    fn test_parse_default_config() {
        let config = parse_config(DEFAULT_CONFIG).unwrap();
        assert_eq!(config, AnalyticsConfig::default());
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let config = parse_config("[trends]\ndefault_months = 12\n").unwrap();
        assert_eq!(config.default_trend_months, 12);
        assert_eq!(config.max_trend_months, 60);
        assert_eq!(config.default_alert_threshold, dec!(0.80));
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        let err = parse_config("[budgets]\ndefault_alert_threshold = 1.5\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_invalid_toml_rejected() {
        assert!(parse_config("[trends\n").is_err());
    }

    #[test]
    fn test_with_config_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[budgets]\ndefault_alert_threshold = 0.9").unwrap();

        let config = AnalyticsConfig::with_config_path(file.path()).unwrap();
        assert_eq!(config.default_alert_threshold, dec!(0.9));
    }

    #[test]
    fn test_missing_override_falls_back() {
        let config =
            AnalyticsConfig::with_config_path(Path::new("/nonexistent/analytics.toml")).unwrap();
        assert_eq!(config, AnalyticsConfig::default());
    }

    #[test]
    fn test_trend_months_clamped() {
        let config = AnalyticsConfig::default();
        assert_eq!(config.trend_months(None), 6);
        assert_eq!(config.trend_months(Some(3)), 3);
        assert_eq!(config.trend_months(Some(500)), 60);
    }
}
