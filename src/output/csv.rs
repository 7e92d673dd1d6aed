//! CSV output

use std::io::Write;

use anyhow::Result;

use crate::host::HostRecords;

use super::RecordsFormatter;

/// Header row followed by one line per record
pub struct CsvOutput;

impl RecordsFormatter for CsvOutput {
    fn render(&self, records: &HostRecords, writer: &mut dyn Write) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(records.column_names())?;
        for row in &records.rows {
            csv_writer.write_record(row)?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}
