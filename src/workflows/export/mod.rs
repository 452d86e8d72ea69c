//! BI export: reshapes a generated dataset into the workbook, CSV files,
//! data-model schema and implementation guide consumed by a Power BI report.
//!
//! Prediction, recommendation and feature-importance tables are optional
//! inputs. When they or their columns are missing, [`ExportDefaults`] fill the
//! gaps and [`ColumnPresence`] records what was actually found.

mod bundle;
mod guide;
mod inputs;
mod schema;
mod views;

pub use bundle::{ExportManifest, ExportWriter, EXPORT_WORKBOOK, GUIDE_FILE, MODEL_FILE};
pub use guide::implementation_guide;
pub use inputs::{ExportInputs, OptionalInput};
pub use schema::{Cardinality, DataModel, Relationship, TableSchema};
pub use views::{
    client_analysis, dax_measures, feature_importance, provider_analysis, provider_by_region,
    provider_info, risk_distribution, summary_metrics, DaxMeasure, ProviderNetworkRow,
    ProviderRegionRow, RiskDistributionRow, SummaryMetric, PROVIDER_INFO_HEADERS,
};

use crate::config::ExportConfig;
use crate::tabular::{Table, TableError};
use crate::workflows::roster::RosterImportError;
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("required input {} is missing", .path.display())]
    MissingInput { path: PathBuf },
    #[error("{table} has no {column} column")]
    MissingColumn {
        table: &'static str,
        column: &'static str,
    },
    #[error(transparent)]
    Roster(#[from] RosterImportError),
    #[error("export table error: {0}")]
    Table(#[from] TableError),
}

/// Values substituted when optional prediction or recommendation data is absent.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportDefaults {
    pub improvement: f64,
    pub recommendation: String,
}

impl Default for ExportDefaults {
    fn default() -> Self {
        Self {
            improvement: 5.0,
            recommendation: "Review and optimize".to_string(),
        }
    }
}

pub const FUTURE_IVI_COLUMNS: [&str; 2] = ["FUTURE_IVI_SCORE", "Future_IVI_Score"];
pub const IMPROVEMENT_COLUMNS: [&str; 2] = ["IMPROVEMENT", "Improvement"];
pub const RECOMMENDATION_COLUMNS: [&str; 2] = ["RECOMMENDATIONS", "Recommendations"];
pub const JOIN_KEY: &str = "CONT_NO";

/// Which optional columns were found, by the header they were found under.
/// A column only counts as present when its table also carries `CONT_NO`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnPresence {
    pub future_ivi: Option<String>,
    pub improvement: Option<String>,
    pub recommendations: Option<String>,
}

impl ColumnPresence {
    pub fn detect(predictions: &Table, recommendations: &Table) -> Self {
        let found = |table: &Table, candidates: &[&str]| {
            table.column(JOIN_KEY)?;
            table
                .find_column(candidates)
                .map(|index| table.headers()[index].clone())
        };

        Self {
            future_ivi: found(predictions, &FUTURE_IVI_COLUMNS),
            improvement: found(predictions, &IMPROVEMENT_COLUMNS),
            recommendations: found(recommendations, &RECOMMENDATION_COLUMNS),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.future_ivi.is_some() && self.improvement.is_some() && self.recommendations.is_some()
    }
}

/// Reads the generated dataset and writes the full export bundle.
pub fn run(
    config: &ExportConfig,
    defaults: &ExportDefaults,
    generated_at: DateTime<Utc>,
) -> Result<ExportManifest, ExportError> {
    let inputs = ExportInputs::load(&config.data_dir, &config.roster_path())?;
    info!(
        clients = inputs.scores.len(),
        providers = inputs.providers.len(),
        "loaded export inputs"
    );

    let manifest = ExportWriter::new(&config.export_dir).write(&inputs, defaults, generated_at)?;
    info!(
        directory = %manifest.directory.display(),
        files = manifest.files.len(),
        "export written"
    );
    Ok(manifest)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(csv: &str) -> Table {
        Table::from_reader(csv.as_bytes()).expect("csv parses")
    }

    #[test]
    fn presence_records_the_header_variant_found() {
        let predictions = table("CONT_NO,Future_IVI_Score\nCONT20240001,71.0\n");
        let recommendations = table("CONT_NO,RECOMMENDATIONS\nCONT20240001,Renegotiate\n");

        let presence = ColumnPresence::detect(&predictions, &recommendations);
        assert_eq!(presence.future_ivi.as_deref(), Some("Future_IVI_Score"));
        assert_eq!(presence.improvement, None);
        assert_eq!(presence.recommendations.as_deref(), Some("RECOMMENDATIONS"));
        assert!(!presence.is_complete());
    }

    #[test]
    fn columns_without_join_key_are_absent() {
        let predictions = table("CLIENT,FUTURE_IVI_SCORE,IMPROVEMENT\nX,70,3\n");
        let presence = ColumnPresence::detect(&predictions, &Table::default());
        assert_eq!(presence, ColumnPresence::default());
    }

    #[test]
    fn defaults_match_documented_values() {
        let defaults = ExportDefaults::default();
        assert_eq!(defaults.improvement, 5.0);
        assert_eq!(defaults.recommendation, "Review and optimize");
    }
}
