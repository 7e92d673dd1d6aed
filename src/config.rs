//! Per-table configuration for export and import

use std::path::PathBuf;

use crate::error::PipelineError;
use crate::model::{Column, FormatPolicy};
use crate::token;

/// Wire encoding of a blob payload
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum MessageType {
    #[default]
    Json,
    Xml,
    /// Opaque text wrapped in a single `data` element
    Other,
}

impl std::str::FromStr for MessageType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "JSON" => Ok(MessageType::Json),
            "XML" => Ok(MessageType::Xml),
            "OTHER" => Ok(MessageType::Other),
            _ => Err(format!("Unknown message type: {}", s)),
        }
    }
}

impl std::fmt::Display for MessageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageType::Json => write!(f, "JSON"),
            MessageType::Xml => write!(f, "XML"),
            MessageType::Other => write!(f, "OTHER"),
        }
    }
}

/// Which way data moves, for summaries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Export,
    Import,
}

/// Settings for one logical table. Built once per call and never mutated by
/// the pipeline.
#[derive(Debug, Clone)]
pub struct Config {
    /// Logical table name; names the record elements on export
    pub table_name: String,
    /// Storage connection string, may reference `${password}`
    pub connection_string: String,
    /// Secret substituted into the connection string
    pub password: Option<String>,
    /// Blob container
    pub container: String,
    /// Blob name within the container
    pub blob: String,
    /// Raw message type setting, validated on use
    pub message_type: String,
    /// Transform template; `None` or blank means identity
    pub template: Option<String>,
    /// Import only: directory receiving a copy of each fetched payload
    pub debug_dir: Option<PathBuf>,
    /// File used as the transform-input preview instead of live data
    pub edit_input_file: Option<PathBuf>,
    /// Import only: columns the host expects, used for empty results and
    /// typed decoding
    pub declared_columns: Vec<Column>,
    /// Text formatting profile
    pub format: FormatPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            table_name: String::new(),
            connection_string: String::new(),
            password: None,
            container: String::new(),
            blob: String::new(),
            message_type: MessageType::default().to_string(),
            template: None,
            debug_dir: None,
            edit_input_file: None,
            declared_columns: Vec::new(),
            format: FormatPolicy::invariant(),
        }
    }
}

impl Config {
    /// Create a new Config for a table
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            ..Default::default()
        }
    }

    /// Set the connection string
    pub fn with_connection_string(mut self, connection_string: impl Into<String>) -> Self {
        self.connection_string = connection_string.into();
        self
    }

    /// Set the secret referenced by `${password}`
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Set container and blob
    pub fn with_blob(mut self, container: impl Into<String>, blob: impl Into<String>) -> Self {
        self.container = container.into();
        self.blob = blob.into();
        self
    }

    /// Set the message type
    pub fn with_message_type(mut self, message_type: impl Into<String>) -> Self {
        self.message_type = message_type.into();
        self
    }

    /// Set the transform template
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    /// Set the debug sink directory
    pub fn with_debug_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.debug_dir = Some(dir.into());
        self
    }

    /// Set the transform-input preview file
    pub fn with_edit_input_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.edit_input_file = Some(path.into());
        self
    }

    /// Set the host's declared columns
    pub fn with_declared_columns(mut self, columns: Vec<Column>) -> Self {
        self.declared_columns = columns;
        self
    }

    /// Set the formatting profile
    pub fn with_format(mut self, format: FormatPolicy) -> Self {
        self.format = format;
        self
    }

    /// Connection string with tokens resolved against the password
    pub fn resolved_connection_string(&self) -> String {
        token::resolve_str(&self.connection_string, self.password.as_deref())
    }

    /// Template to apply, if it is not the identity
    pub fn effective_template(&self) -> Option<&str> {
        self.template.as_deref().filter(|t| !t.trim().is_empty())
    }

    /// Check required settings and parse the message type
    pub fn validate(&self) -> Result<MessageType, PipelineError> {
        if self.resolved_connection_string().trim().is_empty() {
            return Err(PipelineError::Config(
                "The Connection String parameter is not specified".into(),
            ));
        }
        if self.container.trim().is_empty() {
            return Err(PipelineError::Config(
                "The Container Name parameter is not specified".into(),
            ));
        }
        if self.blob.trim().is_empty() {
            return Err(PipelineError::Config(
                "The Blob Name parameter is not specified".into(),
            ));
        }
        self.message_type
            .parse()
            .map_err(|_| PipelineError::Config("Invalid Message Type".into()))
    }

    /// `container|blob`, the identity used in logs and storage errors
    pub fn target(&self) -> String {
        format!("{}|{}", self.container, self.blob)
    }

    /// One-line description of the binding, `None` while incomplete.
    /// Shows the connection string with tokens unresolved.
    pub fn summary(&self, direction: Direction) -> Option<String> {
        if self.connection_string.trim().is_empty()
            || self.container.trim().is_empty()
            || self.blob.trim().is_empty()
        {
            return None;
        }

        let verb = match direction {
            Direction::Export => "Exporting to blob storage",
            Direction::Import => "Bound to blob storage",
        };
        Some(format!(
            "{} ({}): Connection String = {}, Container Name = {}, Blob Name = {}",
            verb,
            self.message_type.trim().to_uppercase(),
            self.connection_string,
            self.container,
            self.blob
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> Config {
        Config::new("Orders")
            .with_connection_string("Root=/tmp/blobs")
            .with_blob("exports", "orders.json")
    }

    #[test]
    fn test_validate_defaults_to_json() {
        assert_eq!(complete().validate().unwrap(), MessageType::Json);
    }

    #[test]
    fn test_validate_blank_fields() {
        let err = complete().with_blob("  ", "orders.json").validate().unwrap_err();
        assert_eq!(err.to_string(), "The Container Name parameter is not specified");

        let err = complete().with_blob("exports", "").validate().unwrap_err();
        assert_eq!(err.to_string(), "The Blob Name parameter is not specified");

        let err = complete().with_connection_string("").validate().unwrap_err();
        assert_eq!(err.to_string(), "The Connection String parameter is not specified");
    }

    #[test]
    fn test_connection_string_resolving_to_blank_is_rejected() {
        let err = Config::new("t")
            .with_connection_string("${unknown}")
            .with_blob("c", "b")
            .validate()
            .unwrap_err();
        assert!(matches!(err, PipelineError::Config(_)));
    }

    #[test]
    fn test_validate_message_type() {
        assert_eq!(
            complete().with_message_type("xml").validate().unwrap(),
            MessageType::Xml
        );
        let err = complete().with_message_type("CSV").validate().unwrap_err();
        assert_eq!(err.to_string(), "Invalid Message Type");
    }

    #[test]
    fn test_resolved_connection_string() {
        let config = complete()
            .with_connection_string("Root=/tmp;Key=${password}")
            .with_password("hunter2");
        assert_eq!(config.resolved_connection_string(), "Root=/tmp;Key=hunter2");
    }

    #[test]
    fn test_summary_hides_secret() {
        let config = complete()
            .with_connection_string("Root=/tmp;Key=${password}")
            .with_password("hunter2");
        let summary = config.summary(Direction::Import).unwrap();
        assert!(summary.starts_with("Bound to blob storage"));
        assert!(summary.contains("${password}"));
        assert!(!summary.contains("hunter2"));

        assert!(Config::new("t").summary(Direction::Export).is_none());
    }

    #[test]
    fn test_blank_template_is_identity() {
        assert!(complete().with_template("  \n").effective_template().is_none());
        assert!(complete().effective_template().is_none());
        assert!(complete().with_template("<a/>").effective_template().is_some());
    }
}
