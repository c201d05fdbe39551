use crate::error::ConfigError;
use calendar::{CycleCalendar, system_start_date};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub calendar: CalendarSettings,
    pub analytics: AnalyticsSettings,
    pub logging: LoggingSettings,
    pub storage: StorageSettings,
}

impl Config {
    /// Checks the invariants serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.cycle_calendar()?;
        if self.calendar.window_size == 0 {
            return Err(ConfigError::ValidationError(
                "calendar.window_size must be at least 1".to_string(),
            ));
        }
        if self.analytics.recent_cycles == 0 {
            return Err(ConfigError::ValidationError(
                "analytics.recent_cycles must be at least 1".to_string(),
            ));
        }
        if self.storage.max_connections == 0 {
            return Err(ConfigError::ValidationError(
                "storage.max_connections must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// The cycle calendar described by `[calendar]`.
    pub fn cycle_calendar(&self) -> Result<CycleCalendar, ConfigError> {
        CycleCalendar::with_epoch(self.calendar.system_start_date)
            .map_err(|e| ConfigError::ValidationError(format!("calendar.system_start_date: {e}")))
    }
}

/// Contains parameters for the work-cycle calendar.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CalendarSettings {
    /// The Thursday on which cycle 1 starts.
    pub system_start_date: NaiveDate,
    /// How many cycles the reporting window spans, centred on the current one.
    pub window_size: u32,
}

impl Default for CalendarSettings {
    fn default() -> Self {
        Self {
            system_start_date: system_start_date(),
            window_size: 12,
        }
    }
}

/// Contains parameters for reports and analytics.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalyticsSettings {
    /// How many trailing cycles of the window the "recent" selection keeps.
    pub recent_cycles: usize,
    pub insights: InsightThresholds,
}

impl Default for AnalyticsSettings {
    fn default() -> Self {
        Self {
            recent_cycles: 8,
            insights: InsightThresholds::default(),
        }
    }
}

/// Thresholds at which insights are raised. Percentages are on a 0-100 scale.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct InsightThresholds {
    /// Average ROI above which returns are called exceptional.
    pub exceptional_roi_pct: Decimal,
    pub high_efficiency_pct: Decimal,
    pub high_consistency_score: Decimal,
    /// Growth beyond +/- this value is reported.
    pub growth_alert_pct: Decimal,
    /// Average daily expense above which a warning is raised.
    pub burn_rate_alert: Decimal,
    /// Share of expenses one category may take before a warning is raised.
    pub expense_concentration_pct: Decimal,
}

impl Default for InsightThresholds {
    fn default() -> Self {
        Self {
            exceptional_roi_pct: dec!(20),
            high_efficiency_pct: dec!(30),
            high_consistency_score: dec!(80),
            growth_alert_pct: dec!(10),
            burn_rate_alert: dec!(1000),
            expense_concentration_pct: dec!(40),
        }
    }
}

/// Contains parameters for log output.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// An `EnvFilter` directive; `RUST_LOG` takes precedence when set.
    pub level: String,
    /// When set, logs are also written to a daily-rolling file in this directory.
    pub directory: Option<PathBuf>,
    pub file_prefix: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
            file_prefix: "cyclebook.log".to_string(),
        }
    }
}

/// Where financial entries are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum StorageBackend {
    /// A process-local store, optionally seeded from a JSON export.
    #[default]
    Memory,
    /// A PostgreSQL database reached through `DATABASE_URL`.
    Postgres,
}

/// Contains parameters for the entry store.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub backend: StorageBackend,
    /// Name of the environment variable holding the connection string.
    pub database_url_env: String,
    pub max_connections: u32,
    /// JSON export used to seed the in-memory store.
    pub seed_file: Option<PathBuf>,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Memory,
            database_url_env: "DATABASE_URL".to_string(),
            max_connections: 5,
            seed_file: None,
        }
    }
}
