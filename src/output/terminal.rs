//! Boxed table output for terminals

use std::io::Write;

use anyhow::Result;
use tabled::builder::Builder;
use tabled::settings::Style;

use crate::host::HostRecords;

use super::RecordsFormatter;

/// Table with a header row and a trailing row count
pub struct TerminalOutput;

impl RecordsFormatter for TerminalOutput {
    fn render(&self, records: &HostRecords, writer: &mut dyn Write) -> Result<()> {
        if records.columns.is_empty() {
            writeln!(writer, "No columns.")?;
            return Ok(());
        }

        let mut builder = Builder::default();
        builder.push_record(records.column_names());
        for row in &records.rows {
            builder.push_record(row.iter().map(String::as_str));
        }
        let mut table = builder.build();
        table.with(Style::modern());
        writeln!(writer, "{}", table)?;

        let noun = if records.rows.len() == 1 { "row" } else { "rows" };
        writeln!(writer, "{} {}", records.rows.len(), noun)?;
        Ok(())
    }
}
