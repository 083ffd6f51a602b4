//! inistore CLI
//!
//! Reads and edits an INI file in place.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use inistore::{Config, Engine, LoadStatus};
use tracing_subscriber::{fmt, EnvFilter};

/// inistore CLI
#[derive(Parser, Debug)]
#[command(name = "inistore")]
#[command(about = "Read and edit INI files without disturbing their layout")]
#[command(version)]
struct Args {
    /// Configuration file
    #[arg(short, long)]
    file: String,

    /// Suffix of the scratch file used while saving
    #[arg(long, default_value = ".tmp")]
    temp_suffix: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print a value
    Get {
        /// Section name (`none` for keys before the first header)
        section: String,

        /// The key to get
        key: String,
    },

    /// Replace an existing value and save the file
    Set {
        /// Section name
        section: String,

        /// The key to set
        key: String,

        /// The new value
        value: String,
    },

    /// Print every section and key
    Dump,
}

fn main() -> ExitCode {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,inistore=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = Config::builder()
        .path(&args.file)
        .temp_suffix(&args.temp_suffix)
        .build();
    let engine = Engine::open(config);

    match engine.load() {
        Ok(LoadStatus::Loaded { .. }) => {}
        Ok(LoadStatus::NotFound) => {
            tracing::error!("No configuration file at {}", args.file);
            return ExitCode::FAILURE;
        }
        Err(e) => {
            tracing::error!("Failed to load {}: {}", args.file, e);
            return ExitCode::FAILURE;
        }
    }

    match args.command {
        Commands::Get { section, key } => match engine.get_value(&section, &key) {
            Ok(value) => {
                println!("{}", value);
                ExitCode::SUCCESS
            }
            Err(e) => {
                tracing::error!("{}", e);
                ExitCode::FAILURE
            }
        },
        Commands::Set {
            section,
            key,
            value,
        } => {
            if let Err(e) = engine.get_value(&section, &key) {
                // Save can only overwrite keys that already exist
                tracing::error!("{}", e);
                return ExitCode::FAILURE;
            }
            engine.stage(&section, &key, value);
            match engine.save() {
                Ok(_) => ExitCode::SUCCESS,
                Err(_) => ExitCode::FAILURE,
            }
        }
        Commands::Dump => {
            let mut sections: Vec<_> = engine.store().all_loaded().into_iter().collect();
            sections.sort_by(|a, b| a.0.cmp(&b.0));

            for (name, entries) in sections {
                println!("[{}]", name);
                let mut entries: Vec<_> = entries.into_iter().collect();
                entries.sort();
                for (key, value) in entries {
                    println!("{} = {}", key, value);
                }
            }
            ExitCode::SUCCESS
        }
    }
}
