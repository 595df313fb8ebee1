use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use portal::commands::{BrowseOptions, cmd_browse, cmd_config_show, cmd_show};
use portal::query::FilterCriteria;
use portal::types::{Gender, ItemId, LifeStatus, VALID_GENDERS, VALID_STATUSES};

/// Environment variable holding the log filter directive
const LOG_ENV: &str = "PORTAL_LOG";

#[derive(Parser)]
#[command(name = "portal")]
#[command(about = "Browse a paginated character catalog")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List characters, loading pages as the list is scrolled
    #[command(visible_alias = "ls")]
    Browse {
        /// Only characters whose name contains this text
        #[arg(short, long)]
        name: Option<String>,

        /// Filter by status: alive, dead, unknown
        #[arg(short, long, value_parser = parse_status)]
        status: Option<LifeStatus>,

        /// Filter by species (e.g. human, alien, unknown)
        #[arg(long)]
        species: Option<String>,

        /// Filter by gender: female, male, genderless, unknown
        #[arg(short, long, value_parser = parse_gender)]
        gender: Option<Gender>,

        /// Number of pages to load
        #[arg(short, long, default_value = "1")]
        pages: u32,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Display one character with its location and first episode
    #[command(visible_alias = "s")]
    Show {
        /// Character ID
        id: ItemId,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn parse_status(s: &str) -> Result<LifeStatus, String> {
    s.parse().map_err(|_| {
        format!(
            "Invalid status. Must be one of: {}",
            VALID_STATUSES.join(", ")
        )
    })
}

fn parse_gender(s: &str) -> Result<Gender, String> {
    s.parse().map_err(|_| {
        format!(
            "Invalid gender. Must be one of: {}",
            VALID_GENDERS.join(", ")
        )
    })
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging();

    let result = match cli.command {
        Commands::Browse {
            name,
            status,
            species,
            gender,
            pages,
            json,
        } => {
            let mut criteria = FilterCriteria::new();
            if let Some(name) = name {
                criteria = criteria.with_name(name);
            }
            if let Some(status) = status {
                criteria = criteria.with_status(status);
            }
            if let Some(species) = species {
                criteria = criteria.with_species(species);
            }
            if let Some(gender) = gender {
                criteria = criteria.with_gender(gender);
            }
            cmd_browse(BrowseOptions {
                criteria,
                pages: pages.max(1),
                output_json: json,
            })
            .await
        }
        Commands::Show { id, json } => cmd_show(id, json).await,
        Commands::Config { action } => match action {
            ConfigAction::Show { json } => cmd_config_show(json),
        },
    };

    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
