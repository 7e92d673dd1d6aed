//! Data model for tabular data representation

mod format;
mod schema;
mod table;

pub use format::FormatPolicy;
pub use schema::{CellType, Column};
pub use table::{CellValue, Row, Table};
