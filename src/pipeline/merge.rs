//! Accumulates tables produced by successive import cycles

use crate::model::{CellValue, Column, Table};

/// Merges decoded tables into one result.
///
/// The first table with rows fixes the columns and the name. Rows of later
/// tables are aligned to those columns by name; columns the first table did
/// not have are dropped.
#[derive(Debug, Default)]
pub struct TableMerger {
    merged: Option<Table>,
}

impl TableMerger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one cycle's table. Tables without rows are ignored.
    pub fn absorb(&mut self, table: Table) {
        if table.is_empty() {
            log::debug!("Skipping empty table {}", table.name);
            return;
        }

        let Some(merged) = self.merged.as_mut() else {
            self.merged = Some(table);
            return;
        };

        let positions: Vec<Option<usize>> = merged
            .columns
            .iter()
            .map(|c| table.column_index(&c.name))
            .collect();
        let unknown: Vec<&str> = table
            .columns
            .iter()
            .filter(|c| merged.column_index(&c.name).is_none())
            .map(|c| c.name.as_str())
            .collect();
        if !unknown.is_empty() {
            log::warn!(
                "Dropping column(s) not present in {}: {}",
                merged.name,
                unknown.join(", ")
            );
        }

        for row in &table.rows {
            let cells = positions
                .iter()
                .map(|pos| {
                    pos.and_then(|idx| row.get(idx))
                        .cloned()
                        .unwrap_or(CellValue::Null)
                })
                .collect();
            merged.add_row(cells);
        }
    }

    /// Rows merged so far
    pub fn row_count(&self) -> usize {
        self.merged.as_ref().map_or(0, Table::row_count)
    }

    /// The merged table, or a zero-row table over `declared` when no cycle
    /// produced rows
    pub fn finish(self, table_name: &str, declared: &[Column]) -> Table {
        self.merged.unwrap_or_else(|| {
            let columns = declared.iter().map(|c| Column::new(c.name.clone())).collect();
            Table::new(table_name, columns)
        })
    }
}
