use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use growthboard::{cli, config, web};

#[derive(Debug, Parser)]
#[command(name = "growthboard")]
#[command(about = "Audiobook growth analytics dashboard with AI insights")]
struct App {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Start the dashboard server (default command)
    Serve {
        /// Port to listen on (overrides config and the PORT variable)
        #[arg(long)]
        port: Option<u16>,
        /// Directory to serve static assets from
        #[arg(long)]
        assets: Option<PathBuf>,
    },
    /// Print the canned analytics payload as JSON
    Data,
    /// Print the chart configuration plan for all slots, or a single slot
    Charts {
        /// Slot identifier (e.g. listeningChart); omit for all five
        slot: Option<String>,
    },
    /// Generate a one-shot AI insight from the terminal
    Insight {
        /// The question to ask the growth analyst
        #[arg(trailing_var_arg = true, required = true)]
        message: Vec<String>,
    },
    /// Check configuration, API key, and upstream reachability
    Health,
}

fn main() -> Result<()> {
    let app = App::parse();

    match app.command.unwrap_or(Commands::Serve {
        port: None,
        assets: None,
    }) {
        Commands::Serve { port, assets } => {
            let mut cfg = config::load();
            if let Some(port) = port {
                cfg.server.port = port;
            }
            if let Some(assets) = assets {
                cfg.server.asset_dir = assets.to_string_lossy().into_owned();
            }
            web::serve(&cfg)
        }
        Commands::Data => cli::run_data(),
        Commands::Charts { slot } => cli::run_charts(slot.as_deref()),
        Commands::Insight { message } => {
            let cfg = config::load();
            cli::run_insight(&cfg, &message.join(" "))
        }
        Commands::Health => {
            let cfg = config::load();
            cli::run_health(&cfg)
        }
    }
}
