use super::guide::implementation_guide;
use super::inputs::{ExportInputs, OptionalInput};
use super::schema::DataModel;
use super::views;
use super::{ColumnPresence, ExportDefaults, ExportError};
use crate::tabular::{write_json_pretty, Table, TableError, WorkbookBuilder};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const EXPORT_WORKBOOK: &str = "IVI_PowerBI_Data.xlsx";
pub const MODEL_FILE: &str = "data_model.json";
pub const GUIDE_FILE: &str = "PowerBI_Implementation_Guide.md";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportManifest {
    pub directory: PathBuf,
    pub files: Vec<PathBuf>,
    pub sheets: Vec<String>,
    pub presence: ColumnPresence,
    pub missing_inputs: Vec<OptionalInput>,
}

/// Writes the workbook, the per-table CSV files, the data model and the guide.
#[derive(Debug, Clone)]
pub struct ExportWriter {
    directory: PathBuf,
}

impl ExportWriter {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn write(
        &self,
        inputs: &ExportInputs,
        defaults: &ExportDefaults,
        generated_at: DateTime<Utc>,
    ) -> Result<ExportManifest, ExportError> {
        fs::create_dir_all(&self.directory)
            .map_err(|err| TableError::io(&self.directory, err))?;

        let presence = ColumnPresence::detect(&inputs.predictions, &inputs.recommendations);
        if !presence.is_complete() {
            warn!(?presence, "substituting defaults for absent prediction columns");
        }

        let summary = Table::from_records(&views::summary_metrics(
            &inputs.scores,
            &inputs.predictions,
            &presence,
            defaults,
        ))?;
        let risk = Table::from_records(&views::risk_distribution(&inputs.scores))?;
        let clients = views::client_analysis(
            &inputs.score_table,
            &inputs.predictions,
            &inputs.recommendations,
            &presence,
            defaults,
        )?;
        let importance = views::feature_importance(&inputs.feature_importance);
        let providers = views::provider_info(&inputs.providers)?;
        let networks = Table::from_records(&views::provider_analysis(&inputs.providers))?;
        let regions = Table::from_records(&views::provider_by_region(&inputs.providers))?;
        let measures = Table::from_records(&views::dax_measures(&presence))?;

        let mut manifest = ExportManifest {
            directory: self.directory.clone(),
            presence,
            missing_inputs: inputs.missing.clone(),
            ..ExportManifest::default()
        };

        let mut workbook = WorkbookBuilder::new();
        for (sheet, table) in [
            ("Summary", &summary),
            ("IVI_Scores", &inputs.score_table),
            ("Future_Predictions", &inputs.predictions),
            ("Recommendations", &inputs.recommendations),
            ("Feature_Importance", &importance),
            ("Risk_Distribution", &risk),
            ("Client_Analysis", &clients),
            ("Provider_Info", &providers),
            ("Provider_Analysis", &networks),
            ("Provider_By_Region", &regions),
            ("DAX_Measures", &measures),
        ] {
            workbook.add_sheet(sheet, table)?;
        }
        let workbook_path = self.directory.join(EXPORT_WORKBOOK);
        manifest.sheets = workbook.save(&workbook_path)?;
        debug!(path = %workbook_path.display(), sheets = manifest.sheets.len(), "wrote workbook");
        manifest.files.push(workbook_path);

        for (stem, table) in [
            ("ivi_scores", &inputs.score_table),
            ("future_predictions", &inputs.predictions),
            ("recommendations", &inputs.recommendations),
            ("feature_importance", &importance),
            ("provider_info", &providers),
            ("client_analysis", &clients),
        ] {
            let path = self.directory.join(format!("{stem}.csv"));
            table.write_csv(&path)?;
            debug!(path = %path.display(), rows = table.len(), "wrote csv");
            manifest.files.push(path);
        }

        let model_path = self.directory.join(MODEL_FILE);
        let model = DataModel::describe(inputs, &providers);
        write_json_pretty(&model_path, &model)?;
        debug!(path = %model_path.display(), "wrote data model");
        manifest.files.push(model_path);

        let guide_path = self.directory.join(GUIDE_FILE);
        write_text(&guide_path, &implementation_guide(generated_at))?;
        debug!(path = %guide_path.display(), "wrote implementation guide");
        manifest.files.push(guide_path);

        Ok(manifest)
    }
}

fn write_text(path: &Path, contents: &str) -> Result<(), TableError> {
    fs::write(path, contents).map_err(|err| TableError::io(path, err))
}
