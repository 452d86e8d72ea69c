use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::dataset::GenerationError;
use crate::workflows::export::ExportError;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Generation(GenerationError),
    Export(ExportError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Generation(err) => write!(f, "generation error: {}", err),
            AppError::Export(err) => write!(f, "export error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Generation(err) => Some(err),
            AppError::Export(err) => Some(err),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<GenerationError> for AppError {
    fn from(value: GenerationError) -> Self {
        Self::Generation(value)
    }
}

impl From<ExportError> for AppError {
    fn from(value: ExportError) -> Self {
        Self::Export(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;
    use std::path::PathBuf;

    #[test]
    fn export_errors_keep_their_source() {
        let err = AppError::from(ExportError::MissingInput {
            path: PathBuf::from("data/ivi_scores.csv"),
        });
        assert_eq!(
            err.to_string(),
            "export error: required input data/ivi_scores.csv is missing"
        );
        assert!(err.source().is_some());
    }

    #[test]
    fn empty_roster_reads_as_generation_error() {
        let err: AppError = GenerationError::EmptyRoster.into();
        assert!(err.to_string().starts_with("generation error: provider roster is empty"));
    }
}
