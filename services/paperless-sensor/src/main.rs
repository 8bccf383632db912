//! Paperless-ngx sensor CLI
//!
//! Runs the setup wizard, manages stored entries and runs the polling service.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use paperless_sensor::config_flow::{run_setup, FieldSchema};
use paperless_sensor::store::EntryStore;
use paperless_sensor::{load_config, Config, PaperlessError};
use tracing::{debug, info, Level};

#[derive(Parser)]
#[command(name = "paperless-sensor")]
#[command(about = "Paperless-ngx document count sensor")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level
    #[arg(short, long, default_value = "info", value_parser = clap::value_parser!(Level))]
    log_level: Level,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a Paperless-ngx server; prompts for values not given as options
    Setup {
        /// Base URL of the Paperless-ngx server
        #[arg(long)]
        url: Option<String>,

        /// API token of the Paperless-ngx user
        #[arg(long)]
        api_token: Option<String>,
    },

    /// List stored entries
    Entries,

    /// Remove a stored entry
    Remove {
        /// Id of the entry to remove
        entry_id: String,
    },

    /// Poll all configured servers until interrupted
    Run,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .with_writer(std::io::stderr)
        .init();

    debug!(
        "Parsed command line arguments: config={:?}, log_level={:?}",
        args.config, args.log_level
    );

    let config = if let Some(config_path) = &args.config {
        debug!("Loading configuration from {:?}", config_path);
        load_config(config_path)?
    } else {
        debug!("Using default configuration");
        Config::default()
    };

    match args.command {
        Commands::Setup { url, api_token } => {
            let mut store = EntryStore::open(&config.entries_path)?;
            let entry = run_setup(&mut store, |field, error| {
                let given = match field.name {
                    "url" => url.as_deref(),
                    "api_token" => api_token.as_deref(),
                    _ => None,
                };
                match (given, error) {
                    (Some(_), Some(error)) => Err(PaperlessError::Config(format!(
                        "--{}: {}",
                        field.name.replace('_', "-"),
                        error
                    ))),
                    (Some(value), None) => Ok(value.to_string()),
                    (None, error) => prompt(field, error),
                }
            })?;
            println!("Created entry {} ({})", entry.entry_id, entry.data.url);
        }
        Commands::Entries => {
            let store = EntryStore::open(&config.entries_path)?;
            for entry in store.entries() {
                println!("{}\t{}\t{}", entry.entry_id, entry.title, entry.data.url);
            }
        }
        Commands::Remove { entry_id } => {
            let mut store = EntryStore::open(&config.entries_path)?;
            if !store.remove(&entry_id)? {
                return Err(format!("No entry with id {}", entry_id).into());
            }
            println!("Removed entry {}", entry_id);
        }
        Commands::Run => {
            info!("Starting Paperless-ngx sensor service");
            paperless_sensor::run(config).await?;
        }
    }

    Ok(())
}

/// Ask for one form field on the terminal. The token is read without echo.
fn prompt(field: &FieldSchema, error: Option<&str>) -> paperless_sensor::Result<String> {
    if let Some(error) = error {
        eprintln!("{}: {}", field.name, error);
    }

    if field.name == "api_token" {
        return Ok(rpassword::prompt_password("API token: ")?);
    }

    print!("{}: ", field.name);
    std::io::stdout().flush()?;
    let mut line = String::new();
    if std::io::stdin().lock().read_line(&mut line)? == 0 {
        return Err(PaperlessError::Config("Setup cancelled".to_string()));
    }
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
