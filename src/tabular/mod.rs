//! Tabular plumbing shared by the dataset writer and the BI export.
//!
//! Every sheet and CSV file is handled as a [`Table`]: a header row plus
//! string cells. Typed records enter through their `serde` serialization so
//! the column names declared on the record types are the only source of truth.

mod table;
mod workbook;

pub use table::{write_csv_records, write_json_pretty, write_json_records, Table};
pub use workbook::{Cell, WorkbookBuilder};

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid delimited data: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("workbook error: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),
    #[error("sheet '{sheet}' exceeds the workbook grid ({rows} rows, {columns} columns)")]
    SheetTooLarge {
        sheet: String,
        rows: usize,
        columns: usize,
    },
    #[error("row {row} has {found} cells but the table has {expected} columns")]
    RowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },
}

impl TableError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
