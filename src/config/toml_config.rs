use crate::adapters::storage::LocalStorage;
use crate::core::codec::MalformedPolicy;
use crate::core::fines::DEFAULT_FINE_PER_DAY;
use crate::core::registry::{LendingPolicy, DEFAULT_LOAN_PERIOD_DAYS};
use crate::utils::error::{LibraryError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "library.toml";
pub const DEFAULT_DATA_DIR: &str = "data";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Settings read from `library.toml`. Every section and key is optional.
///
/// ```toml
/// [storage]
/// data_dir = "data"
/// atomic_writes = false
/// on_malformed_record = "abort"   # or "skip"
///
/// [lending]
/// loan_period_days = 14
/// fine_per_day = 1.0
///
/// [registry]
/// unique_ids = false
///
/// [logging]
/// level = "info"
/// format = "compact"              # or "json"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub lending: LendingConfig,
    pub registry: RegistryConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: String,
    pub atomic_writes: bool,
    pub on_malformed_record: MalformedPolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LendingConfig {
    pub loan_period_days: u32,
    pub fine_per_day: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub unique_ids: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: DEFAULT_DATA_DIR.to_string(),
            atomic_writes: false,
            on_malformed_record: MalformedPolicy::Abort,
        }
    }
}

impl Default for LendingConfig {
    fn default() -> Self {
        Self {
            loan_period_days: DEFAULT_LOAN_PERIOD_DAYS,
            fine_per_day: DEFAULT_FINE_PER_DAY,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Compact,
        }
    }
}

impl AppConfig {
    /// Reads `path` when given. Without a path, `library.toml` in the working
    /// directory is used if present, otherwise the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::from_file(DEFAULT_CONFIG_FILE),
            None => Ok(Self::default()),
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(LibraryError::IoError)?;
        tracing::debug!("Read configuration from {}", path.as_ref().display());
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| LibraryError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the value of the environment variable. Unset
    /// variables are left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| LibraryError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn lending_policy(&self) -> LendingPolicy {
        LendingPolicy {
            loan_period_days: self.lending.loan_period_days,
            fine_per_day: self.lending.fine_per_day,
            unique_ids: self.registry.unique_ids,
        }
    }

    pub fn local_storage(&self) -> LocalStorage {
        LocalStorage::new(&self.storage.data_dir)
            .with_malformed_policy(self.storage.on_malformed_record)
            .with_atomic_writes(self.storage.atomic_writes)
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("storage.data_dir", &self.storage.data_dir)?;
        validation::validate_positive_number(
            "lending.loan_period_days",
            u64::from(self.lending.loan_period_days),
            1,
        )?;
        validation::validate_non_negative_amount("lending.fine_per_day", self.lending.fine_per_day)?;
        validation::validate_one_of("logging.level", &self.logging.level, &LOG_LEVELS)?;
        Ok(())
    }
}
