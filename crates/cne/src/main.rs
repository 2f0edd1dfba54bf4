//! cne - read, write and apply parallel-language citation metadata

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "cne")]
#[command(version = clap::crate_version!())]
#[command(about = "Parallel-language citation metadata tools", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode the metadata lines of a free-text field and print them as JSON
    Parse {
        /// File holding the field text (stdin if omitted)
        input: Option<PathBuf>,
    },

    /// Replace the metadata lines of a free-text field with a JSON record
    Serialize {
        /// JSON file holding the metadata record
        #[arg(short, long)]
        record: PathBuf,

        /// File holding the field text (stdin if omitted)
        input: Option<PathBuf>,
    },

    /// Remove the metadata lines from a free-text field
    Strip {
        /// File holding the field text (stdin if omitted)
        input: Option<PathBuf>,
    },

    /// Print the name configuration a CSL style declares
    StyleConfig {
        /// CSL style file
        style: PathBuf,
    },

    /// Convert a record to engine input with enrichment applied
    Enrich {
        /// JSON file holding the record
        record: PathBuf,

        /// CSL style used for the preview
        #[arg(short, long)]
        style: Option<PathBuf>,

        /// TOML settings file
        #[arg(long)]
        settings: Option<PathBuf>,

        /// Also print the names as the reference engine formats them
        #[arg(long, requires = "style")]
        preview: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cne=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Parse { input } => commands::parse::execute(input),
        Commands::Serialize { record, input } => {
            commands::serialize::execute(commands::serialize::SerializeArgs { record, input })
        }
        Commands::Strip { input } => commands::strip::execute(input),
        Commands::StyleConfig { style } => commands::style_config::execute(style),
        Commands::Enrich {
            record,
            style,
            settings,
            preview,
        } => commands::enrich::execute(commands::enrich::EnrichArgs {
            record,
            style,
            settings,
            preview,
        }),
    }
}
