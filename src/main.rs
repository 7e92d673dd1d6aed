//! blobtab - Move tabular data to and from blob storage

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::LevelFilter;

use blobtab::config::{Config, Direction};
use blobtab::host::CsvSource;
use blobtab::materialize;
use blobtab::model::Column;
use blobtab::output::{render_to_stdout, OutputFormat};
use blobtab::pipeline::{Exporter, Importer};
use blobtab::storage::{FsBlobStore, MemoryBlobStore};

/// Environment variable read when `--password` is not given
const PASSWORD_ENV: &str = "BLOBTAB_PASSWORD";

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliOutputFormat {
    Terminal,
    Csv,
    Json,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(f: CliOutputFormat) -> Self {
        match f {
            CliOutputFormat::Terminal => OutputFormat::Terminal,
            CliOutputFormat::Csv => OutputFormat::Csv,
            CliOutputFormat::Json => OutputFormat::Json,
        }
    }
}

/// Move tabular data to and from blob storage as JSON, XML or raw text
#[derive(Parser, Debug)]
#[command(name = "blobtab")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log pipeline stages (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Store the rows of a CSV file as a blob
    Export {
        /// CSV file with a header row
        input: PathBuf,

        /// Blob to write
        #[arg(long, default_value = "")]
        blob: String,

        #[command(flatten)]
        binding: Binding,
    },

    /// Read one or more blobs into a single table
    Import {
        /// Blob to read; repeat to merge several blobs in order
        #[arg(long)]
        blob: Vec<String>,

        /// Expected column as name[:type]; repeat for each column
        #[arg(long = "column")]
        columns: Vec<Column>,

        /// Directory receiving a copy of each fetched payload
        #[arg(long)]
        debug_dir: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: CliOutputFormat,

        #[command(flatten)]
        binding: Binding,
    },

    /// Print the XML a template receives
    Preview {
        /// Preview an export of this CSV file instead of an import
        #[arg(long)]
        input: Option<PathBuf>,

        /// Blob to read, or to be written on export
        #[arg(long, default_value = "")]
        blob: String,

        /// Print this file instead of live data
        #[arg(long)]
        edit_input_file: Option<PathBuf>,

        #[command(flatten)]
        binding: Binding,
    },
}

/// Storage location and payload settings shared by every command
#[derive(Args, Debug)]
struct Binding {
    /// Connection string: a directory, or key=value pairs with Root=<dir>.
    /// May reference ${password}
    #[arg(long, default_value = "")]
    connection: String,

    /// Secret substituted for ${password}
    #[arg(long)]
    password: Option<String>,

    /// Blob container
    #[arg(long, default_value = "")]
    container: String,

    /// JSON, XML or OTHER
    #[arg(long, default_value = "JSON")]
    message_type: String,

    /// Template file applied between the table and the payload
    #[arg(long)]
    template: Option<PathBuf>,

    /// Logical table name; names the record elements
    #[arg(long)]
    table: Option<String>,
}

impl Binding {
    fn config(&self, default_table: &str, blob: &str) -> Result<Config> {
        let table_name = self.table.as_deref().unwrap_or(default_table);
        let mut config = Config::new(table_name)
            .with_connection_string(self.connection.as_str())
            .with_blob(self.container.as_str(), blob)
            .with_message_type(self.message_type.as_str());

        let password = self
            .password
            .clone()
            .or_else(|| std::env::var(PASSWORD_ENV).ok());
        if let Some(password) = password {
            config = config.with_password(password);
        }

        if let Some(path) = &self.template {
            let template = fs::read_to_string(path)
                .with_context(|| format!("Failed to read template: {}", path.display()))?;
            config = config.with_template(template);
        }

        Ok(config)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn init_logging(verbose: bool) {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    });
    builder.format_timestamp(None);
    builder.parse_default_env();
    let _ = builder.try_init();
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Export {
            input,
            blob,
            binding,
        } => {
            let config = binding.config(&file_stem(&input), &blob)?;
            let store = open_store(&config, Direction::Export)?;
            let source = CsvSource::open(&input)?;

            let report = Exporter::new(store).export(&config, &source)?;
            println!(
                "Exported {} rows ({} bytes) to {}",
                report.rows,
                report.bytes,
                config.target()
            );
        }

        Command::Import {
            blob,
            columns,
            debug_dir,
            format,
            binding,
        } => {
            let first = blob.first().map(String::as_str).unwrap_or_default();
            let mut config = binding
                .config(blobtab::document::codec::DEFAULT_TABLE_NAME, first)?
                .with_declared_columns(columns);
            if let Some(dir) = debug_dir {
                config = config.with_debug_dir(dir);
            }
            let store = open_store(&config, Direction::Import)?;

            let importer = Importer::new(store);
            let table = if blob.len() > 1 {
                importer.import_objects(&config, &blob)?
            } else {
                importer.import(&config)?
            };

            let records = materialize::to_records(&table, &config.format);
            render_to_stdout(&records, format.into())?;
        }

        Command::Preview {
            input,
            blob,
            edit_input_file,
            binding,
        } => {
            let default_table = input
                .as_deref()
                .map(file_stem)
                .unwrap_or_else(|| blobtab::document::codec::DEFAULT_TABLE_NAME.to_string());
            let mut config = binding.config(&default_table, &blob)?;
            if let Some(path) = edit_input_file {
                config = config.with_edit_input_file(path);
            }

            let xml = match input {
                Some(input) => {
                    let source = CsvSource::open(&input)?;
                    Exporter::new(MemoryBlobStore::new()).preview_input(&config, &source)?
                }
                None if config.edit_input_file.is_some() => {
                    Importer::new(MemoryBlobStore::new()).preview_input(&config)?
                }
                None => {
                    let store = open_store(&config, Direction::Import)?;
                    Importer::new(store).preview_input(&config)?
                }
            };
            println!("{}", xml);
        }
    }

    Ok(())
}

/// Validate the binding, then open the store it names
fn open_store(config: &Config, direction: Direction) -> Result<FsBlobStore> {
    config.validate()?;
    if let Some(summary) = config.summary(direction) {
        log::debug!("{}", summary);
    }
    let store = FsBlobStore::from_connection_string(&config.resolved_connection_string())?;
    Ok(store)
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| blobtab::document::codec::DEFAULT_TABLE_NAME.to_string())
}
