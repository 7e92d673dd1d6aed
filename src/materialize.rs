//! Conversion between host records and tables

use crate::error::PipelineError;
use crate::host::{HostRecords, RecordSource};
use crate::model::{CellValue, Column, FormatPolicy, Table};

/// Build a table from a host source, keeping column order and native values.
/// Nullable host types become their underlying type.
pub fn from_source<S: RecordSource + ?Sized>(
    name: &str,
    source: &S,
) -> Result<Table, PipelineError> {
    let columns: Vec<Column> = source
        .columns()
        .iter()
        .map(|c| Column::with_type(c.name.clone(), c.cell_type))
        .collect();
    if let Some(blank) = columns.iter().position(|c| c.name.trim().is_empty()) {
        return Err(PipelineError::Config(format!(
            "Column {} has no name",
            blank + 1
        )));
    }

    let mut table = Table::try_new(name, columns).map_err(PipelineError::Config)?;
    let width = table.column_count();
    for record in 0..source.record_count() {
        let cells = (0..width)
            .map(|col| source.value(record, col).cloned().unwrap_or(CellValue::Null))
            .collect();
        table.add_row(cells);
    }

    Ok(table)
}

/// Render a table as host records: all cells as text, null as empty
pub fn to_records(table: &Table, policy: &FormatPolicy) -> HostRecords {
    let rows = table
        .rows
        .iter()
        .map(|row| {
            (0..table.column_count())
                .map(|idx| {
                    row.get(idx)
                        .map(|v| policy.format(v).into_owned())
                        .unwrap_or_default()
                })
                .collect()
        })
        .collect();

    HostRecords {
        columns: table.columns.clone(),
        rows,
    }
}
