pub mod commands;
pub mod config;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::api::HttpClient;
use crate::error::ApiError;
use crate::resources::AdminApi;

#[derive(Parser)]
#[command(name = "yaxshi")]
#[command(about = "Yaxshi admin CLI - operate the recycling platform from the terminal")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[arg(long, global = true, help = "Admin API URL (defaults to the configured environment)")]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Show platform totals and the most issued rewards")]
    Dashboard,

    #[command(about = "App users: list, block, unblock")]
    Users {
        #[command(subcommand)]
        cmd: commands::users::UsersCommands,
    },

    #[command(about = "Reward vendors and their platform credentials")]
    Vendors {
        #[command(subcommand)]
        cmd: commands::vendors::VendorsCommands,
    },

    #[command(about = "Accepted bottle catalog")]
    Bottles {
        #[command(subcommand)]
        cmd: commands::bottles::BottlesCommands,
    },

    #[command(about = "Collection machines")]
    Fondomats {
        #[command(subcommand)]
        cmd: commands::fondomats::FondomatsCommands,
    },

    #[command(about = "Reward catalog")]
    Rewards {
        #[command(subcommand)]
        cmd: commands::rewards::RewardsCommands,
    },

    #[command(about = "Local control panel settings")]
    Control {
        #[command(subcommand)]
        cmd: commands::control::ControlCommands,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

fn api_from_cli(cli: &Cli) -> AdminApi {
    let client = match &cli.api_url {
        Some(url) => HttpClient::new(url.trim_end_matches('/')),
        None => HttpClient::from_config(),
    };
    AdminApi::new(client)
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let api = api_from_cli(&cli);
    let format = output_format.clone();

    let result = match cli.command {
        Commands::Dashboard => commands::dashboard::handle(api, format).await,
        Commands::Users { cmd } => commands::users::handle(cmd, api, format).await,
        Commands::Vendors { cmd } => commands::vendors::handle(cmd, api, format).await,
        Commands::Bottles { cmd } => commands::bottles::handle(cmd, api, format).await,
        Commands::Fondomats { cmd } => commands::fondomats::handle(cmd, api, format).await,
        Commands::Rewards { cmd } => commands::rewards::handle(cmd, api, format).await,
        Commands::Control { cmd } => commands::control::handle(cmd, format).await,
    };

    // JSON callers get the failure on stdout as well
    if let (Err(err), OutputFormat::Json) = (&result, &output_format) {
        let code = err.downcast_ref::<ApiError>().map(ApiError::error_code);
        utils::output_error(&output_format, &err.to_string(), code)?;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_tree_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from([
            "yaxshi", "bottles", "list", "--material", "aluminum", "--json", "--api-url", "http://localhost:9000/api",
        ])
        .unwrap();
        assert!(matches!(OutputFormat::from_cli(&cli), OutputFormat::Json));
        assert_eq!(cli.api_url.as_deref(), Some("http://localhost:9000/api"));
    }

    #[test]
    fn unknown_material_is_rejected() {
        assert!(Cli::try_parse_from(["yaxshi", "bottles", "list", "--material", "glass"]).is_err());
    }
}
