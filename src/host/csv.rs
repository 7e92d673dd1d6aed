//! CSV files as an export record source

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result};

use crate::model::{CellType, CellValue, FormatPolicy};

use super::{RecordSource, SourceColumn};

/// Records read from a CSV file with a header row. Column types are
/// inferred from the data.
#[derive(Debug, Clone)]
pub struct CsvSource {
    columns: Vec<SourceColumn>,
    records: Vec<Vec<CellValue>>,
}

impl CsvSource {
    /// Read a CSV file
    pub fn open(path: &Path) -> Result<Self> {
        let file =
            File::open(path).with_context(|| format!("Failed to open file: {}", path.display()))?;
        Self::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to read CSV file: {}", path.display()))
    }

    /// Read CSV from any reader
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = csv_reader
            .headers()
            .context("Failed to read CSV headers")?
            .clone();
        let names: Vec<String> = headers
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let name = name.trim();
                if name.is_empty() {
                    format!("Column{}", i + 1)
                } else {
                    name.to_string()
                }
            })
            .collect();

        let mut raw_rows: Vec<Vec<Option<String>>> = Vec::new();
        for (line_num, result) in csv_reader.records().enumerate() {
            // +2 for 1-indexing and header
            let record =
                result.with_context(|| format!("Failed to read CSV row {}", line_num + 2))?;
            let mut cells: Vec<Option<String>> = record.iter().map(normalize_cell).collect();
            cells.resize(names.len(), None);
            raw_rows.push(cells);
        }

        let columns: Vec<SourceColumn> = names
            .into_iter()
            .enumerate()
            .map(|(idx, name)| infer_column(name, raw_rows.iter().map(|r| r[idx].as_deref())))
            .collect();

        let policy = FormatPolicy::invariant();
        let records = raw_rows
            .iter()
            .map(|row| {
                row.iter()
                    .zip(&columns)
                    .map(|(cell, col)| match cell {
                        Some(text) => policy.parse(text, col.cell_type),
                        None => CellValue::Null,
                    })
                    .collect()
            })
            .collect();

        Ok(Self { columns, records })
    }
}

impl RecordSource for CsvSource {
    fn columns(&self) -> &[SourceColumn] {
        &self.columns
    }

    fn record_count(&self) -> usize {
        self.records.len()
    }

    fn value(&self, record: usize, column: usize) -> Option<&CellValue> {
        self.records.get(record)?.get(column)
    }
}

/// Trimmed cell text, `None` for empty and null markers
fn normalize_cell(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("null") || trimmed == "NA" {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Type of a single non-null cell
fn infer_cell_type(s: &str) -> CellType {
    if s.eq_ignore_ascii_case("true") || s.eq_ignore_ascii_case("false") {
        return CellType::Bool;
    }
    if s.parse::<i64>().is_ok() {
        return CellType::Int;
    }
    if s.parse::<f64>().is_ok() {
        return CellType::Float;
    }
    if chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
        || chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
        || chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f").is_ok()
    {
        return CellType::DateTime;
    }
    CellType::String
}

fn infer_column<'a>(name: String, cells: impl Iterator<Item = Option<&'a str>>) -> SourceColumn {
    let mut inferred: Option<CellType> = None;
    let mut nullable = false;

    for cell in cells {
        match cell {
            Some(text) => {
                let cell_type = infer_cell_type(text);
                inferred = Some(match inferred {
                    Some(t) => t.widen(cell_type),
                    None => cell_type,
                });
            }
            None => nullable = true,
        }
    }

    SourceColumn {
        name,
        cell_type: inferred.unwrap_or(CellType::String),
        nullable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORDERS: &str = "\
id,customer,total,shipped,paid,
1,Ada,12.5,2024-05-02 14:00:00,true,x
2,Grace,7,,false
3, Linus ,NA,2024-05-03,TRUE,y
";

    #[test]
    fn test_infers_column_types() {
        let source = CsvSource::from_reader(ORDERS.as_bytes()).unwrap();
        let columns = source.columns();

        assert_eq!(columns[0], SourceColumn::new("id", CellType::Int));
        assert_eq!(columns[1], SourceColumn::new("customer", CellType::String));
        assert_eq!(columns[2], SourceColumn::nullable("total", CellType::Float));
        assert_eq!(columns[3], SourceColumn::nullable("shipped", CellType::DateTime));
        assert_eq!(columns[4], SourceColumn::new("paid", CellType::Bool));
        assert_eq!(columns[5].name, "Column6");
    }

    #[test]
    fn test_values_follow_column_type() {
        let source = CsvSource::from_reader(ORDERS.as_bytes()).unwrap();
        assert_eq!(source.record_count(), 3);
        assert_eq!(source.value(1, 2), Some(&CellValue::Float(7.0)));
        assert_eq!(source.value(2, 1), Some(&CellValue::from("Linus")));
        assert_eq!(source.value(2, 2), Some(&CellValue::Null));
        assert_eq!(source.value(2, 4), Some(&CellValue::Bool(true)));
        // short rows are padded
        assert_eq!(source.value(1, 5), Some(&CellValue::Null));
    }

    #[test]
    fn test_mixed_column_falls_back_to_text() {
        let source = CsvSource::from_reader("code\n10\nA7\n".as_bytes()).unwrap();
        assert_eq!(source.columns()[0].cell_type, CellType::String);
        assert_eq!(source.value(0, 0), Some(&CellValue::from("10")));
    }
}
