use crate::workflows::dataset::Provider;
use calamine::{open_workbook_auto, Data, Reader};
use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum RosterImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Spreadsheet(calamine::Error),
    EmptyWorkbook(PathBuf),
    MissingColumn(&'static str),
}

impl std::fmt::Display for RosterImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RosterImportError::Io(err) => write!(f, "failed to read provider roster: {}", err),
            RosterImportError::Csv(err) => write!(f, "invalid provider roster CSV: {}", err),
            RosterImportError::Spreadsheet(err) => {
                write!(f, "invalid provider roster workbook: {}", err)
            }
            RosterImportError::EmptyWorkbook(path) => {
                write!(f, "provider roster workbook {} has no sheets", path.display())
            }
            RosterImportError::MissingColumn(column) => {
                write!(f, "provider roster is missing the {} column", column)
            }
        }
    }
}

impl std::error::Error for RosterImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RosterImportError::Io(err) => Some(err),
            RosterImportError::Csv(err) => Some(err),
            RosterImportError::Spreadsheet(err) => Some(err),
            RosterImportError::EmptyWorkbook(_) | RosterImportError::MissingColumn(_) => None,
        }
    }
}

impl From<std::io::Error> for RosterImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for RosterImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

impl From<calamine::Error> for RosterImportError {
    fn from(err: calamine::Error) -> Self {
        Self::Spreadsheet(err)
    }
}

const ROSTER_COLUMNS: [&str; 6] = [
    "PROV_CODE",
    "PROV_NAME",
    "PROVIDER_NETWORK",
    "PROVIDER_PRACTICE",
    "PROVIDER_REGION",
    "PROVIDER_TOWN",
];

/// Maps `Prov Code`, `prov-code` and `PROV_CODE` onto the same key.
fn normalize_header(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    cleaned
        .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
        .to_ascii_uppercase()
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(value) => value.trim().to_string(),
        Data::Int(value) => value.to_string(),
        Data::Float(value) if value.fract() == 0.0 && value.abs() < 1e15 => {
            format!("{}", *value as i64)
        }
        other => other.to_string(),
    }
}

fn providers_from_rows<I>(headers: &[String], rows: I) -> Result<Vec<Provider>, RosterImportError>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let normalized: Vec<String> = headers.iter().map(|h| normalize_header(h)).collect();
    let mut positions = [0usize; 6];
    for (slot, column) in positions.iter_mut().zip(ROSTER_COLUMNS) {
        *slot = normalized
            .iter()
            .position(|header| header == column)
            .ok_or(RosterImportError::MissingColumn(column))?;
    }

    let field = |row: &[String], index: usize| -> String {
        row.get(positions[index])
            .map(|value| value.trim().to_string())
            .unwrap_or_default()
    };

    let mut providers = Vec::new();
    for row in rows {
        let prov_code = field(&row, 0);
        if prov_code.is_empty() {
            continue;
        }
        providers.push(Provider {
            prov_code,
            prov_name: field(&row, 1),
            provider_network: field(&row, 2),
            provider_practice: field(&row, 3),
            provider_region: field(&row, 4),
            provider_town: field(&row, 5),
        });
    }

    Ok(providers)
}

/// Loads the provider reference roster from a CSV file or a spreadsheet workbook.
pub struct ProviderRosterImporter;

impl ProviderRosterImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Provider>, RosterImportError> {
        let path = path.as_ref();
        let is_workbook = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| matches!(ext.to_ascii_lowercase().as_str(), "xlsx" | "xlsm" | "xls" | "ods"))
            .unwrap_or(false);

        if is_workbook {
            Self::from_workbook(path)
        } else {
            let file = std::fs::File::open(path)?;
            Self::from_reader(file)
        }
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<Provider>, RosterImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader.headers()?.iter().map(str::to_string).collect();
        let mut rows = Vec::new();
        for record in csv_reader.records() {
            rows.push(record?.iter().map(str::to_string).collect());
        }

        providers_from_rows(&headers, rows)
    }

    /// Reads the first sheet; the first row holds the headers.
    pub fn from_workbook(path: &Path) -> Result<Vec<Provider>, RosterImportError> {
        let mut workbook = open_workbook_auto(path)?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| RosterImportError::EmptyWorkbook(path.to_path_buf()))??;

        let mut rows = range
            .rows()
            .map(|row| row.iter().map(cell_text).collect::<Vec<_>>());
        let headers = rows.next().unwrap_or_default();

        providers_from_rows(&headers, rows)
    }
}
