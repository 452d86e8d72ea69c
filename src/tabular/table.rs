use super::TableError;
use csv::StringRecord;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Builds a table from typed records using their serde field names as headers.
    /// An empty slice yields an empty table without headers.
    pub fn from_records<T: Serialize>(records: &[T]) -> Result<Self, TableError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        for record in records {
            writer.serialize(record)?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|err| TableError::io("<memory>", err.into_error()))?;
        Self::from_reader(bytes.as_slice())
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, TableError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|err| TableError::io(path, err))?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, TableError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader
            .headers()?
            .iter()
            .map(|header| header.trim_start_matches('\u{feff}').to_string())
            .collect();

        let mut rows = Vec::new();
        for record in csv_reader.records() {
            rows.push(record?.iter().map(str::to_string).collect());
        }

        Ok(Self { headers, rows })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    /// First header matching any of `candidates`, in candidate order.
    pub fn find_column(&self, candidates: &[&str]) -> Option<usize> {
        candidates.iter().find_map(|name| self.column(name))
    }

    pub fn push_row(&mut self, row: Vec<String>) -> Result<(), TableError> {
        if row.len() != self.headers.len() {
            return Err(TableError::RowWidth {
                row: self.rows.len(),
                expected: self.headers.len(),
                found: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// Appends a column; `values` is truncated or padded with empty cells to the row count.
    pub fn append_column<I>(&mut self, name: impl Into<String>, values: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.headers.push(name.into());
        let mut values = values.into_iter();
        for row in &mut self.rows {
            row.push(values.next().unwrap_or_default());
        }
    }

    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<Vec<T>, TableError> {
        let headers = StringRecord::from(self.headers.clone());
        self.rows
            .iter()
            .map(|row| {
                StringRecord::from(row.clone())
                    .deserialize(Some(&headers))
                    .map_err(TableError::from)
            })
            .collect()
    }

    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<(), TableError> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|err| TableError::io(path, err))?;
        let mut writer = csv::Writer::from_writer(BufWriter::new(file));
        if !self.headers.is_empty() {
            writer.write_record(&self.headers)?;
        }
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush().map_err(|err| TableError::io(path, err))?;
        Ok(())
    }
}

pub fn write_csv_records<T: Serialize, P: AsRef<Path>>(
    path: P,
    records: &[T],
) -> Result<(), TableError> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|err| TableError::io(path, err))?;
    let mut writer = csv::Writer::from_writer(BufWriter::new(file));
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush().map_err(|err| TableError::io(path, err))?;
    Ok(())
}

/// Writes `records` as a JSON array of objects, one object per row.
pub fn write_json_records<T: Serialize, P: AsRef<Path>>(
    path: P,
    records: &[T],
) -> Result<(), TableError> {
    write_json(path.as_ref(), records, false)
}

/// Writes a single value as indented JSON.
pub fn write_json_pretty<T: Serialize + ?Sized, P: AsRef<Path>>(
    path: P,
    value: &T,
) -> Result<(), TableError> {
    write_json(path.as_ref(), value, true)
}

fn write_json<T: Serialize + ?Sized>(
    path: &Path,
    value: &T,
    pretty: bool,
) -> Result<(), TableError> {
    let file = File::create(path).map_err(|err| TableError::io(path, err))?;
    let mut writer = BufWriter::new(file);
    if pretty {
        serde_json::to_writer_pretty(&mut writer, value)?;
    } else {
        serde_json::to_writer(&mut writer, value)?;
    }
    writer.flush().map_err(|err| TableError::io(path, err))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Row {
        #[serde(rename = "CONT_NO")]
        cont_no: String,
        #[serde(rename = "SCORE")]
        score: f64,
        #[serde(rename = "NOTE")]
        note: Option<String>,
    }

    #[test]
    fn records_keep_serde_headers_and_blank_options() {
        let rows = vec![
            Row {
                cont_no: "CONT20240001".into(),
                score: 71.5,
                note: None,
            },
            Row {
                cont_no: "CONT20240002".into(),
                score: 40.0,
                note: Some("watch".into()),
            },
        ];

        let table = Table::from_records(&rows).expect("table builds");
        assert_eq!(table.headers(), ["CONT_NO", "SCORE", "NOTE"]);
        assert_eq!(table.rows()[0], vec!["CONT20240001", "71.5", ""]);

        let decoded: Vec<Row> = table.deserialize().expect("rows decode");
        assert_eq!(decoded, rows);
    }

    #[test]
    fn find_column_prefers_candidate_order() {
        let table = Table::from_reader("Improvement,IMPROVEMENT\n1,2\n".as_bytes())
            .expect("csv parses");
        assert_eq!(table.find_column(&["IMPROVEMENT", "Improvement"]), Some(1));
        assert_eq!(table.find_column(&["Missing"]), None);
    }

    #[test]
    fn push_row_rejects_ragged_rows() {
        let mut table = Table::new(["A", "B"]);
        let err = table
            .push_row(vec!["only one".into()])
            .expect_err("width mismatch");
        assert!(matches!(err, TableError::RowWidth { expected: 2, found: 1, .. }));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn json_writers_report_a_full_device() {
        let rows = vec![Row {
            cont_no: "CONT20240001".into(),
            score: 71.5,
            note: None,
        }];

        let err = write_json_records("/dev/full", &rows).expect_err("device is full");
        assert!(matches!(err, TableError::Io { .. }));
        let err = write_json_pretty("/dev/full", &rows).expect_err("device is full");
        assert!(matches!(err, TableError::Io { .. }));
    }

    #[test]
    fn append_column_pads_missing_values() {
        let mut table = Table::from_reader("A\n1\n2\n".as_bytes()).expect("csv parses");
        table.append_column("B", vec!["x".to_string()]);
        assert_eq!(table.rows()[0], vec!["1", "x"]);
        assert_eq!(table.rows()[1], vec!["2", ""]);
    }
}
