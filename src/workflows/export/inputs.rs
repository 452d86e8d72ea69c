use super::ExportError;
use crate::tabular::Table;
use crate::workflows::dataset::Provider;
use crate::workflows::roster::ProviderRosterImporter;
use crate::workflows::scoring::IviScore;
use std::path::Path;
use tracing::{debug, warn};

pub const SCORES_FILE: &str = "ivi_scores.csv";

/// Model outputs the export can consume but never requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionalInput {
    FuturePredictions,
    Recommendations,
    FeatureImportance,
}

impl OptionalInput {
    pub const fn ordered() -> [Self; 3] {
        [
            Self::FuturePredictions,
            Self::Recommendations,
            Self::FeatureImportance,
        ]
    }

    pub const fn file_name(self) -> &'static str {
        match self {
            Self::FuturePredictions => "future_predictions.csv",
            Self::Recommendations => "recommendations.csv",
            Self::FeatureImportance => "feature_importance.csv",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::FuturePredictions => "Future predictions",
            Self::Recommendations => "Recommendations",
            Self::FeatureImportance => "Feature importance",
        }
    }
}

/// Everything the export reads from the data directory.
#[derive(Debug, Clone, Default)]
pub struct ExportInputs {
    /// `ivi_scores.csv` as read, kept for pass-through output.
    pub score_table: Table,
    pub scores: Vec<IviScore>,
    pub predictions: Table,
    pub recommendations: Table,
    pub feature_importance: Table,
    pub providers: Vec<Provider>,
    pub missing: Vec<OptionalInput>,
}

impl ExportInputs {
    pub fn load(data_dir: &Path, roster_path: &Path) -> Result<Self, ExportError> {
        let scores_path = data_dir.join(SCORES_FILE);
        if !scores_path.is_file() {
            return Err(ExportError::MissingInput { path: scores_path });
        }
        let score_table = Table::from_path(&scores_path)?;
        let scores = score_table.deserialize::<IviScore>()?;
        debug!(path = %scores_path.display(), rows = scores.len(), "read scores");

        if !roster_path.is_file() {
            return Err(ExportError::MissingInput {
                path: roster_path.to_path_buf(),
            });
        }
        let providers = ProviderRosterImporter::from_path(roster_path)?;

        let mut inputs = Self {
            score_table,
            scores,
            providers,
            ..Self::default()
        };

        for input in OptionalInput::ordered() {
            let path = data_dir.join(input.file_name());
            let table = if path.is_file() {
                let table = Table::from_path(&path)?;
                debug!(path = %path.display(), rows = table.len(), "read optional input");
                table
            } else {
                warn!(file = input.file_name(), "optional input missing; treating as empty");
                inputs.missing.push(input);
                Table::default()
            };

            match input {
                OptionalInput::FuturePredictions => inputs.predictions = table,
                OptionalInput::Recommendations => inputs.recommendations = table,
                OptionalInput::FeatureImportance => inputs.feature_importance = table,
            }
        }

        Ok(inputs)
    }
}
