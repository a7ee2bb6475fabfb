use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::YearMonth;

/// Application-level constants
pub const APP_NAME: &str = "clinic-core";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Contracted monthly amount for tenants that never negotiated one.
pub const DEFAULT_SUBSCRIPTION_AMOUNT: f64 = 150.0;

/// Subscription payments fall due on this day of each month.
pub const DEFAULT_DUE_DAY: u32 = 10;

/// Upper bound on generated billing periods, whatever the horizon says.
pub const MAX_BILLING_PERIODS: usize = 250;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed config file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub fn default_log_filter() -> &'static str {
    "clinic_core=info,warn"
}

/// Per-user data directory (platform data dir, falling back to the
/// working directory when none can be determined).
pub fn app_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Default location of the JSON config file.
pub fn config_path() -> PathBuf {
    app_data_dir().join("config.json")
}

/// Billing-ledger settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// First billed month.
    pub system_start_month: YearMonth,
    /// Exclusive end of the billed range. `None` rolls with the clock: the
    /// month after the current one.
    pub horizon_end_month: Option<YearMonth>,
    pub default_subscription_amount: f64,
    pub due_day: u32,
    /// Before this date the operator summary reports no financial figures.
    pub system_activation_date: NaiveDate,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            system_start_month: YearMonth::new(2025, 12).unwrap_or(YearMonth::MIN),
            horizon_end_month: YearMonth::new(2027, 1).ok(),
            default_subscription_amount: DEFAULT_SUBSCRIPTION_AMOUNT,
            due_day: DEFAULT_DUE_DAY,
            system_activation_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap_or_default(),
        }
    }
}

impl LedgerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(end) = self.horizon_end_month {
            if end <= self.system_start_month {
                return Err(ConfigError::Invalid(format!(
                    "billing horizon {end} must come after start month {}",
                    self.system_start_month
                )));
            }
        }
        if !(1..=28).contains(&self.due_day) {
            return Err(ConfigError::Invalid(format!(
                "due day must be between 1 and 28, got {}",
                self.due_day
            )));
        }
        if !self.default_subscription_amount.is_finite() || self.default_subscription_amount <= 0.0
        {
            return Err(ConfigError::Invalid(format!(
                "default subscription amount must be positive, got {}",
                self.default_subscription_amount
            )));
        }
        Ok(())
    }

    /// Exclusive end month of the billed range as of `today`.
    pub fn horizon_for(&self, today: NaiveDate) -> YearMonth {
        self.horizon_end_month
            .unwrap_or_else(|| YearMonth::from_date(today).succ())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub ledger: LedgerConfig,
    pub data_dir: Option<PathBuf>,
    pub log_filter: Option<String>,
}

impl AppConfig {
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(app_data_dir)
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir().join("clinic.db")
    }

    pub fn receipts_dir(&self) -> PathBuf {
        self.data_dir().join("receipts")
    }

    pub fn log_filter(&self) -> &str {
        self.log_filter.as_deref().unwrap_or(default_log_filter())
    }
}

/// Load the JSON config at `path`. A missing file yields the defaults.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(AppConfig::default());
        }
        Err(e) => return Err(ConfigError::Io(e)),
    };
    let config: AppConfig = serde_json::from_str(&raw)?;
    config.ledger.validate()?;
    tracing::info!(path = %path.display(), "Configuration loaded");
    Ok(config)
}
