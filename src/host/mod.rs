//! Host boundary: where rows come from on export and where they go on import

mod csv;

use serde::Serialize;

use crate::model::{CellType, CellValue, Column};

pub use self::csv::CsvSource;

/// A column as the host describes it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceColumn {
    pub name: String,
    pub cell_type: CellType,
    /// Host type admits nulls; dropped when building the table schema
    pub nullable: bool,
}

impl SourceColumn {
    pub fn new(name: impl Into<String>, cell_type: CellType) -> Self {
        Self {
            name: name.into(),
            cell_type,
            nullable: false,
        }
    }

    pub fn nullable(name: impl Into<String>, cell_type: CellType) -> Self {
        Self {
            nullable: true,
            ..Self::new(name, cell_type)
        }
    }
}

/// Read-only access to a host's columns and records
pub trait RecordSource {
    /// Columns in source order
    fn columns(&self) -> &[SourceColumn];

    /// Number of records
    fn record_count(&self) -> usize;

    /// Native value of a record's column; `None` when the record has no
    /// value at that position
    fn value(&self, record: usize, column: usize) -> Option<&CellValue>;
}

/// Records held in memory
#[derive(Debug, Clone, Default)]
pub struct VecSource {
    columns: Vec<SourceColumn>,
    records: Vec<Vec<CellValue>>,
}

impl VecSource {
    pub fn new(columns: Vec<SourceColumn>) -> Self {
        Self {
            columns,
            records: Vec::new(),
        }
    }

    pub fn with_record(mut self, values: Vec<CellValue>) -> Self {
        self.push(values);
        self
    }

    pub fn push(&mut self, values: Vec<CellValue>) {
        self.records.push(values);
    }
}

impl RecordSource for VecSource {
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

/// Import result as the host consumes it: every cell is text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostRecords {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<String>>,
}

impl HostRecords {
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }
}
