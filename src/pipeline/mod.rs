//! Export and import orchestration.
//!
//! Export: validate, materialize host records, encode to a document, apply
//! the template, encode to the wire format, store. Import runs the same
//! stages in reverse once per blob and merges the resulting tables.
//!
//! Both directions are synchronous and keep no state between calls, so one
//! `Exporter` or `Importer` can serve concurrent calls for different tables.

mod export;
mod import;
mod merge;

pub use export::{ExportReport, Exporter};
pub use import::Importer;
pub use merge::TableMerger;
