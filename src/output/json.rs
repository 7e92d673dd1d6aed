//! JSON output format

use std::io::Write;

use anyhow::Result;
use serde_json::{Map, Value};

use crate::host::HostRecords;

use super::RecordsFormatter;

/// Array of objects keyed by column name
pub struct JsonOutput;

impl RecordsFormatter for JsonOutput {
    fn render(&self, records: &HostRecords, writer: &mut dyn Write) -> Result<()> {
        let names = records.column_names();
        let rows: Vec<Value> = records
            .rows
            .iter()
            .map(|row| {
                let obj: Map<String, Value> = names
                    .iter()
                    .zip(row)
                    .map(|(name, cell)| (name.to_string(), Value::String(cell.clone())))
                    .collect();
                Value::Object(obj)
            })
            .collect();

        serde_json::to_writer_pretty(&mut *writer, &rows)?;
        writeln!(writer)?;
        Ok(())
    }
}
