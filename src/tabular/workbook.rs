use super::{Table, TableError};
use rust_xlsxwriter::{Format, Workbook};
use std::path::Path;

/// Typed view of a string cell as it should land in a worksheet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell<'a> {
    Empty,
    Number(f64),
    Bool(bool),
    Text(&'a str),
}

impl<'a> Cell<'a> {
    /// Identifier-like values with leading zeros (`0042`) stay text.
    pub fn infer(raw: &'a str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Cell::Empty;
        }

        match trimmed {
            "true" | "True" => return Cell::Bool(true),
            "false" | "False" => return Cell::Bool(false),
            _ => {}
        }

        let digits = trimmed.strip_prefix('-').unwrap_or(trimmed);
        let padded = digits.len() > 1
            && digits.starts_with('0')
            && digits[1..].starts_with(|c: char| c.is_ascii_digit());

        if is_plain_decimal(digits) && !padded {
            if let Ok(value) = trimmed.parse::<f64>() {
                if value.is_finite() {
                    return Cell::Number(value);
                }
            }
        }

        Cell::Text(raw)
    }
}

/// `digits[.digits]` only; exponent forms such as `1E5` are codes, not numbers.
fn is_plain_decimal(value: &str) -> bool {
    let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
    match value.split_once('.') {
        Some((whole, fraction)) => all_digits(whole) && all_digits(fraction),
        None => all_digits(value),
    }
}

/// Accumulates named sheets and saves them as a single `.xlsx` file.
pub struct WorkbookBuilder {
    workbook: Workbook,
    header_format: Format,
    sheets: Vec<String>,
}

impl Default for WorkbookBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkbookBuilder {
    pub fn new() -> Self {
        Self {
            workbook: Workbook::new(),
            header_format: Format::new().set_bold(),
            sheets: Vec::new(),
        }
    }

    pub fn add_sheet(&mut self, name: &str, table: &Table) -> Result<(), TableError> {
        let too_large = || TableError::SheetTooLarge {
            sheet: name.to_string(),
            rows: table.len(),
            columns: table.headers().len(),
        };

        let worksheet = self.workbook.add_worksheet();
        worksheet.set_name(name)?;

        for (col, header) in table.headers().iter().enumerate() {
            let col = u16::try_from(col).map_err(|_| too_large())?;
            worksheet.write_string_with_format(0, col, header, &self.header_format)?;
        }

        for (index, row) in table.rows().iter().enumerate() {
            let row_number = u32::try_from(index + 1).map_err(|_| too_large())?;
            for (col, raw) in row.iter().enumerate() {
                let col = u16::try_from(col).map_err(|_| too_large())?;
                match Cell::infer(raw) {
                    Cell::Empty => {}
                    Cell::Number(value) => {
                        worksheet.write_number(row_number, col, value)?;
                    }
                    Cell::Bool(value) => {
                        worksheet.write_boolean(row_number, col, value)?;
                    }
                    Cell::Text(value) => {
                        worksheet.write_string(row_number, col, value)?;
                    }
                }
            }
        }

        self.sheets.push(name.to_string());
        Ok(())
    }

    pub fn save<P: AsRef<Path>>(mut self, path: P) -> Result<Vec<String>, TableError> {
        self.workbook.save(path.as_ref())?;
        Ok(self.sheets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infers_numbers_and_keeps_codes_as_text() {
        assert_eq!(Cell::infer("71.25"), Cell::Number(71.25));
        assert_eq!(Cell::infer("-3"), Cell::Number(-3.0));
        assert_eq!(Cell::infer("0.5"), Cell::Number(0.5));
        assert_eq!(Cell::infer("0042"), Cell::Text("0042"));
        assert_eq!(Cell::infer("CONT20240001"), Cell::Text("CONT20240001"));
        assert_eq!(Cell::infer("NaN"), Cell::Text("NaN"));
        assert_eq!(Cell::infer("2024-03-01"), Cell::Text("2024-03-01"));
        assert_eq!(Cell::infer("1E5"), Cell::Text("1E5"));
        assert_eq!(Cell::infer("12e3"), Cell::Text("12e3"));
        assert_eq!(Cell::infer("7."), Cell::Text("7."));
    }

    #[test]
    fn infers_booleans_and_blanks() {
        assert_eq!(Cell::infer("true"), Cell::Bool(true));
        assert_eq!(Cell::infer("False"), Cell::Bool(false));
        assert_eq!(Cell::infer("  "), Cell::Empty);
    }

    #[test]
    fn saves_named_sheets() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("book.xlsx");
        let table = Table::from_reader("A,B\n1,x\n".as_bytes()).expect("csv parses");

        let mut builder = WorkbookBuilder::new();
        builder.add_sheet("First", &table).expect("sheet added");
        builder.add_sheet("Second", &table).expect("sheet added");
        let sheets = builder.save(&path).expect("workbook saved");

        assert_eq!(sheets, vec!["First", "Second"]);
        assert!(path.exists());
    }
}
