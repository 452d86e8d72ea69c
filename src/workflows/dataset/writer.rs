use super::{Dataset, PortfolioSummary};
use crate::tabular::{
    write_csv_records, write_json_pretty, write_json_records, Table, TableError, WorkbookBuilder,
};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DATASET_WORKBOOK: &str = "IVI_Data.xlsx";
pub const SUMMARY_FILE: &str = "summary.json";

/// Files written for one dataset, in write order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatasetManifest {
    pub directory: PathBuf,
    pub files: Vec<PathBuf>,
    pub sheets: Vec<String>,
}

/// Lays a [`Dataset`] out as CSV, JSON-records and a multi-sheet workbook.
#[derive(Debug, Clone)]
pub struct DatasetWriter {
    directory: PathBuf,
}

impl DatasetWriter {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn write(
        &self,
        dataset: &Dataset,
        summary: &PortfolioSummary,
    ) -> Result<DatasetManifest, TableError> {
        fs::create_dir_all(&self.directory)
            .map_err(|err| TableError::io(&self.directory, err))?;

        let mut manifest = DatasetManifest {
            directory: self.directory.clone(),
            ..DatasetManifest::default()
        };
        let mut workbook = WorkbookBuilder::new();

        let mut sink = TableSink {
            directory: &self.directory,
            manifest: &mut manifest,
            workbook: &mut workbook,
        };
        sink.table("corporate_clients", "Corporate_Clients", &dataset.clients)?;
        sink.table("members", "Members", &dataset.members)?;
        sink.table("claims", "Claims", &dataset.claims)?;
        sink.table("preauthorizations", "PreAuthorizations", &dataset.preauths)?;
        sink.table("calls", "Calls", &dataset.calls)?;
        sink.table("providers", "Providers", &dataset.providers)?;
        sink.table("ivi_scores", "IVI_Scores", &dataset.scores)?;

        let summary_path = self.directory.join(SUMMARY_FILE);
        write_json_pretty(&summary_path, summary)?;
        debug!(path = %summary_path.display(), "wrote portfolio summary");
        manifest.files.push(summary_path);

        let workbook_path = self.directory.join(DATASET_WORKBOOK);
        manifest.sheets = workbook.save(&workbook_path)?;
        debug!(
            path = %workbook_path.display(),
            sheets = manifest.sheets.len(),
            "wrote dataset workbook"
        );
        manifest.files.push(workbook_path);

        Ok(manifest)
    }
}

struct TableSink<'a> {
    directory: &'a Path,
    manifest: &'a mut DatasetManifest,
    workbook: &'a mut WorkbookBuilder,
}

impl TableSink<'_> {
    fn table<T: Serialize>(
        &mut self,
        stem: &str,
        sheet: &str,
        records: &[T],
    ) -> Result<(), TableError> {
        let csv_path = self.directory.join(format!("{stem}.csv"));
        write_csv_records(&csv_path, records)?;
        let json_path = self.directory.join(format!("{stem}.json"));
        write_json_records(&json_path, records)?;
        debug!(table = stem, rows = records.len(), "wrote table");

        self.workbook.add_sheet(sheet, &Table::from_records(records)?)?;
        self.manifest.files.push(csv_path);
        self.manifest.files.push(json_path);
        Ok(())
    }
}
