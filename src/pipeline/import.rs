//! Stored blobs to a table

use std::fs;
use std::path::Path;

use crate::config::{Config, MessageType};
use crate::document::codec;
use crate::encoding::EncodingFactory;
use crate::error::{PipelineError, Result};
use crate::model::Table;
use crate::storage::BlobStore;
use crate::transform::{apply_template, TemplateTransform, Transform};

use super::TableMerger;

/// Reads blobs and turns them into a table
pub struct Importer<S> {
    store: S,
    transform: Box<dyn Transform>,
}

impl<S: BlobStore> Importer<S> {
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

    /// Import the configured blob
    pub fn import(&self, config: &Config) -> Result<Table> {
        self.import_objects(config, std::slice::from_ref(&config.blob))
    }

    /// Import several blobs of one container into a single table, one
    /// decode cycle per blob. Rows accumulate in blob order.
    pub fn import_objects(&self, config: &Config, blobs: &[String]) -> Result<Table> {
        let message_type = config.validate()?;
        if let Some(blank) = blobs.iter().find(|b| b.trim().is_empty()) {
            log::debug!("Rejecting blank blob name {:?}", blank);
            return Err(PipelineError::Config(
                "The Blob Name parameter is not specified".into(),
            ));
        }

        let mut merger = TableMerger::new();
        for blob in blobs {
            let table = self.import_one(config, message_type, blob)?;
            merger.absorb(table);
        }

        let table = merger.finish(&config.table_name, &config.declared_columns);
        log::debug!(
            "Imported {} rows into {} from {} blob(s)",
            table.row_count(),
            table.name,
            blobs.len()
        );
        Ok(table)
    }

    fn import_one(&self, config: &Config, message_type: MessageType, blob: &str) -> Result<Table> {
        let target = format!("{}|{}", config.container, blob);
        let payload = self.fetch(&config.container, blob, &target)?;

        if let Some(dir) = &config.debug_dir {
            write_debug_copy(dir, blob, &payload);
        }

        let doc = EncodingFactory::create(message_type).decode(&payload)?;
        let doc = apply_template(self.transform.as_ref(), &doc, config.effective_template())?;

        let table = if config.declared_columns.is_empty() {
            codec::decode(&doc)
        } else {
            codec::decode_with_schema(&doc, &config.declared_columns, &config.format)
        };
        log::debug!("Decoded {} rows from {}", table.row_count(), target);
        Ok(table)
    }

    fn fetch(&self, container: &str, blob: &str, target: &str) -> Result<Vec<u8>> {
        let payload = self
            .store
            .get(container, blob)
            .map_err(|e| PipelineError::Storage {
                target: target.to_string(),
                message: e.to_string(),
            })?;
        log::info!("Fetched {} bytes from {}", payload.len(), target);
        Ok(payload)
    }

    /// XML the template is applied to: the configured edit input file when
    /// set, otherwise the fetched payload as a document
    pub fn preview_input(&self, config: &Config) -> Result<String> {
        if let Some(path) = &config.edit_input_file {
            return Ok(fs::read_to_string(path)?);
        }

        let message_type = config.validate()?;
        let payload = self.fetch(&config.container, &config.blob, &config.target())?;
        match message_type {
            MessageType::Xml => String::from_utf8(payload)
                .map_err(|e| PipelineError::decode(message_type, e)),
            _ => EncodingFactory::create(message_type)
                .preview(&payload)?
                .to_xml()
                .map_err(PipelineError::from),
        }
    }
}

/// Keep a copy of a fetched payload. Failures are logged and ignored.
fn write_debug_copy(dir: &Path, blob: &str, payload: &[u8]) {
    let file_name = Path::new(blob)
        .file_name()
        .map(|n| n.to_owned())
        .unwrap_or_else(|| blob.into());
    let path = dir.join(file_name);

    let written = fs::create_dir_all(dir).and_then(|_| fs::write(&path, payload));
    match written {
        Ok(()) => log::debug!("Wrote debug copy to {}", path.display()),
        Err(e) => log::warn!("Failed to write debug copy to {}: {}", path.display(), e),
    }
}
