//! Host records to a stored blob

use std::fs;

use crate::config::Config;
use crate::document::codec;
use crate::encoding::EncodingFactory;
use crate::error::{PipelineError, Result};
use crate::host::RecordSource;
use crate::materialize;
use crate::storage::BlobStore;
use crate::transform::{apply_template, TemplateTransform, Transform};

/// Outcome of a successful export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportReport {
    /// Records written
    pub rows: usize,
    /// Payload size in bytes
    pub bytes: usize,
}

/// Writes host records to blob storage
pub struct Exporter<S> {
    store: S,
    transform: Box<dyn Transform>,
}

impl<S: BlobStore> Exporter<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            transform: Box::new(TemplateTransform::new()),
        }
    }

    /// Use a different transform engine
    pub fn with_transform(mut self, transform: Box<dyn Transform>) -> Self {
        self.transform = transform;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Materialize, encode, transform and store the source's records.
    ///
    /// Configuration is checked before anything is read or written.
    pub fn export<R: RecordSource + ?Sized>(
        &self,
        config: &Config,
        source: &R,
    ) -> Result<ExportReport> {
        let message_type = config.validate()?;

        let table = materialize::from_source(&config.table_name, source)?;
        let doc = codec::encode(&table, &config.format);
        log::debug!(
            "Encoded {} rows of {} as {}",
            table.row_count(),
            table.name,
            doc.root.name
        );

        let doc = apply_template(self.transform.as_ref(), &doc, config.effective_template())?;
        let payload = EncodingFactory::create(message_type).encode(&doc)?;

        self.store
            .put(&config.container, &config.blob, &payload)
            .map_err(|e| PipelineError::Storage {
                target: config.target(),
                message: e.to_string(),
            })?;
        log::info!(
            "Stored {} rows ({} bytes) to {}",
            table.row_count(),
            payload.len(),
            config.target()
        );

        Ok(ExportReport {
            rows: table.row_count(),
            bytes: payload.len(),
        })
    }

    /// XML the template is applied to: the configured edit input file when
    /// set, otherwise the encoded records
    pub fn preview_input<R: RecordSource + ?Sized>(
        &self,
        config: &Config,
        source: &R,
    ) -> Result<String> {
        if let Some(path) = &config.edit_input_file {
            return Ok(fs::read_to_string(path)?);
        }

        let table = materialize::from_source(&config.table_name, source)?;
        codec::encode(&table, &config.format)
            .to_xml()
            .map_err(PipelineError::from)
    }
}
