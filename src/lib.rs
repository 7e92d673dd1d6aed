//! blobtab - Move tabular data to and from blob storage
//!
//! Tables are encoded as a hierarchical document, reshaped by an optional
//! template, and stored as JSON, XML or opaque text. Import runs the same
//! steps in reverse and can merge several blobs into one table.

pub mod config;
pub mod document;
pub mod encoding;
pub mod error;
pub mod host;
pub mod materialize;
pub mod model;
pub mod output;
pub mod pipeline;
pub mod storage;
pub mod token;
pub mod transform;

pub use config::{Config, MessageType};
pub use error::{PipelineError, StorageError, TransformError};
pub use model::Table;
pub use pipeline::{ExportReport, Exporter, Importer};
