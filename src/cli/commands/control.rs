use clap::Subcommand;
use serde_json::json;

use crate::cli::config::{load_settings, save_settings, settings_file};
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::settings::ControlSettings;

#[derive(Subcommand)]
pub enum ControlCommands {
    #[command(about = "Show all control settings")]
    Show,

    #[command(about = "Change one setting, e.g. `set pricing containerPrice 250`")]
    Set {
        #[arg(help = "notifications, rewards, pricing or system")]
        category: String,

        #[arg(help = "Setting name (camelCase or snake_case)")]
        key: String,

        #[arg(help = "New value")]
        value: String,
    },

    #[command(about = "Restore the default settings")]
    Reset,
}

pub async fn handle(cmd: ControlCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        ControlCommands::Show => {
            let settings = load_settings()?;
            match output_format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&settings)?);
                }
                OutputFormat::Text => {
                    println!("Settings file: {}", settings_file()?.display());
                    for (key, value) in settings.entries() {
                        println!("  {:<40} {}", key, value);
                    }
                }
            }
            Ok(())
        }
        ControlCommands::Set { category, key, value } => {
            let mut settings = load_settings()?;
            settings.set(&category, &key, &value)?;
            save_settings(&settings)?;
            tracing::info!(%category, %key, "control setting changed");

            output_success(
                &output_format,
                &format!("{}.{} set to {}", category, key, value),
                Some(json!({ "settings": settings })),
            )
        }
        ControlCommands::Reset => {
            let settings = ControlSettings::default();
            save_settings(&settings)?;
            output_success(&output_format, "Control settings restored to defaults", Some(json!({ "settings": settings })))
        }
    }
}
