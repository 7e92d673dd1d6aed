//! Rendering of imported records

mod csv;
mod json;
mod terminal;

use std::io::Write;

use anyhow::Result;

use crate::host::HostRecords;

pub use self::csv::CsvOutput;
pub use json::JsonOutput;
pub use terminal::TerminalOutput;

/// Output format for imported records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Terminal,
    Csv,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "terminal" => Ok(OutputFormat::Terminal),
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

/// Trait for record formatters
pub trait RecordsFormatter {
    /// Render records to a writer
    fn render(&self, records: &HostRecords, writer: &mut dyn Write) -> Result<()>;
}

/// Factory for creating record formatters
pub struct OutputFactory;

impl OutputFactory {
    /// Create a formatter for the given format
    pub fn create(format: OutputFormat) -> Box<dyn RecordsFormatter> {
        match format {
            OutputFormat::Terminal => Box::new(TerminalOutput),
            OutputFormat::Csv => Box::new(CsvOutput),
            OutputFormat::Json => Box::new(JsonOutput),
        }
    }
}

/// Render records to stdout
pub fn render_to_stdout(records: &HostRecords, format: OutputFormat) -> Result<()> {
    let formatter = OutputFactory::create(format);
    let mut stdout = std::io::stdout().lock();
    formatter.render(records, &mut stdout)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("CSV".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);
        assert_eq!("terminal".parse::<OutputFormat>().unwrap(), OutputFormat::Terminal);
        assert!("html".parse::<OutputFormat>().is_err());
    }
}
