mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use commands::config::ConfigActionType;

#[derive(Parser)]
#[command(name = "askroute")]
#[command(about = "Route question-like searches to a conversational assistant", long_about = None)]
struct Cli {
    /// Database file (defaults to the local data directory)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create the database with default settings
    Init,
    /// Run the native messaging host on stdin/stdout
    Serve,
    /// Check whether a query would be treated as a question
    Classify {
        /// Query text (multiple words are joined with spaces)
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
        /// Built-in rule profile to use instead of the configured one
        #[arg(short, long, conflicts_with = "profile_file")]
        profile: Option<String>,
        /// TOML rule profile to use instead of the configured one
        #[arg(long)]
        profile_file: Option<PathBuf>,
        /// Show which rule decided
        #[arg(short, long)]
        explain: bool,
    },
    /// Show what would happen to a navigation
    Route {
        /// Destination URL of the navigation
        url: String,
        /// Frame the navigation originates from (0 = top level)
        #[arg(long, default_value_t = 0)]
        frame_id: i64,
        /// Also increment the usage counter
        #[arg(long)]
        record: bool,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Turn routing on or off (shows the state without an argument)
    Routing {
        #[arg(value_parser = ["on", "off"])]
        state: Option<String>,
    },
    /// Show usage counters
    Stats {
        /// Print the counters as JSON
        #[arg(long)]
        json: bool,
        /// Delete all counters
        #[arg(long)]
        reset: bool,
    },
    /// List built-in rule profiles
    Profiles {
        /// Print a profile as TOML (a starting point for custom profiles)
        #[arg(long)]
        show: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Get a configuration value
    Get {
        /// selectedDestination, routingEnabled, ruleProfile or profilePath
        key: String,
    },
    /// Set a configuration value
    Set { key: String, value: String },
    /// List all configuration values
    List,
}

impl From<ConfigAction> for ConfigActionType {
    fn from(action: ConfigAction) -> Self {
        match action {
            ConfigAction::Get { key } => Self::Get { key },
            ConfigAction::Set { key, value } => Self::Set { key, value },
            ConfigAction::List => Self::List,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if matches!(cli.command, Commands::Serve) {
        commands::serve::setup_host_logging()?;
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
            .format_timestamp_secs()
            .init();
    }

    let db_path = cli.db;

    match cli.command {
        Commands::Init => commands::init::init_command(db_path),
        Commands::Serve => commands::serve::serve_command(db_path).await,
        Commands::Classify {
            query,
            profile,
            profile_file,
            explain,
        } => commands::classify::classify_command(
            db_path,
            &query.join(" "),
            profile.as_deref(),
            profile_file.as_deref(),
            explain,
        ),
        Commands::Route {
            url,
            frame_id,
            record,
        } => commands::route::route_command(db_path, &url, frame_id, record),
        Commands::Config { action } => commands::config::handle_config(db_path, action.into()),
        Commands::Routing { state } => {
            commands::config::handle_routing(db_path, state.as_deref().map(|s| s == "on"))
        }
        Commands::Stats { json, reset } => commands::stats::stats_command(db_path, json, reset),
        Commands::Profiles { show } => commands::classify::profiles_command(show.as_deref()),
    }
}
