use std::env;
use std::fmt;
use std::path::PathBuf;

/// Distinguishes runtime behavior for different stages of the tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

pub const DEFAULT_SEED: u64 = 42;

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub generation: GenerationConfig,
    pub export: ExportConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("IVI_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let seed = match env::var("IVI_SEED") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidSeed { value: raw })?,
            Err(_) => DEFAULT_SEED,
        };

        let data_dir = PathBuf::from(env::var("IVI_DATA_DIR").unwrap_or_else(|_| "data".into()));
        let export_dir = env::var("IVI_EXPORT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| data_dir.join("powerbi"));
        let provider_roster = env::var("IVI_PROVIDER_ROSTER")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        let log_level = env::var("IVI_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            generation: GenerationConfig {
                seed,
                data_dir: data_dir.clone(),
                provider_roster: provider_roster.clone(),
            },
            export: ExportConfig {
                data_dir,
                export_dir,
                provider_roster,
            },
            telemetry: TelemetryConfig { log_level },
        })
    }

    /// Points both stages at `data_dir`. An export directory still sitting at
    /// the default location under the old data directory moves along with it.
    pub fn set_data_dir(&mut self, data_dir: PathBuf) {
        if self.export.export_dir == self.export.data_dir.join("powerbi") {
            self.export.export_dir = data_dir.join("powerbi");
        }
        self.generation.data_dir = data_dir.clone();
        self.export.data_dir = data_dir;
    }

    pub fn set_provider_roster(&mut self, roster: PathBuf) {
        self.generation.provider_roster = Some(roster.clone());
        self.export.provider_roster = Some(roster);
    }
}

/// Controls for the synthetic dataset run.
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    pub seed: u64,
    pub data_dir: PathBuf,
    /// External provider roster; a synthetic roster is drawn when unset.
    pub provider_roster: Option<PathBuf>,
}

/// Controls for the BI export run.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub data_dir: PathBuf,
    pub export_dir: PathBuf,
    /// Falls back to `providers.csv` inside `data_dir` when unset.
    pub provider_roster: Option<PathBuf>,
}

impl ExportConfig {
    pub fn roster_path(&self) -> PathBuf {
        self.provider_roster
            .clone()
            .unwrap_or_else(|| self.data_dir.join("providers.csv"))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidSeed { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidSeed { value } => {
                write!(f, "IVI_SEED must be an unsigned integer (found '{}')", value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
