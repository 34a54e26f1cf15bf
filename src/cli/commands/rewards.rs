use std::path::PathBuf;

use clap::Subcommand;
use rust_decimal::Decimal;
use serde_json::json;

use crate::cli::utils::{confirm, ensure_loaded, load_image, output_list, output_success};
use crate::cli::OutputFormat;
use crate::controller::{DeleteOutcome, ResourceList};
use crate::models::{NewReward, RewardPatch};
use crate::resources::AdminApi;

#[derive(Subcommand)]
pub enum RewardsCommands {
    #[command(about = "List rewards")]
    List {
        #[arg(long, help = "Match name or description")]
        search: Option<String>,

        #[arg(long, help = "Only rewards of this vendor id")]
        vendor: Option<i64>,
    },

    #[command(about = "Add a reward (an image is required)")]
    Create {
        #[arg(long)]
        name: String,

        #[arg(long, help = "Points a user spends on it")]
        points: i64,

        #[arg(long, help = "Price in UZS")]
        price: Decimal,

        #[arg(long, default_value = "0", help = "Units in stock")]
        quantity: i64,

        #[arg(long, help = "Path to the reward image")]
        image: Option<PathBuf>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long, help = "Vendor id supplying the reward")]
        vendor: Option<i64>,
    },

    #[command(about = "Update a reward")]
    Update {
        #[arg(help = "Reward id")]
        id: i64,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        points: Option<i64>,

        #[arg(long, help = "Price in UZS")]
        price: Option<Decimal>,

        #[arg(long)]
        quantity: Option<i64>,

        #[arg(long, help = "Path to a replacement image")]
        image: Option<PathBuf>,
    },

    #[command(about = "Delete a reward")]
    Delete {
        #[arg(help = "Reward id")]
        id: i64,

        #[arg(long, short = 'y', help = "Skip the confirmation prompt")]
        yes: bool,
    },
}

pub async fn handle(cmd: RewardsCommands, api: AdminApi, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        RewardsCommands::List { search, vendor } => {
            let mut list = ResourceList::new(api.rewards);
            list.refresh().await;
            ensure_loaded(&list)?;

            list.set_search(search.unwrap_or_default());
            list.set_category(vendor);

            let summary = format!("Rewards issued: {}", list.stats().total_issued);
            output_list(&output_format, &list, &summary, |reward| {
                format!(
                    "{:<6} {:<28} {:>6} pts  {:>10} UZS  {:>4} left  {} issued",
                    reward.id, reward.name, reward.points_required, reward.price_uzs, reward.quantity, reward.issued_total
                )
            })
        }
        RewardsCommands::Create {
            name,
            points,
            price,
            quantity,
            image,
            description,
            vendor,
        } => {
            let input = NewReward {
                vendor_id: vendor,
                name,
                description,
                points_required: points,
                price_uzs: price,
                quantity,
                image: load_image(image.as_deref()).await?,
            };

            let mut list = ResourceList::new(api.rewards);
            let reward = list.create(&input).await?;
            output_success(
                &output_format,
                &format!("Reward {} created (id {})", reward.name, reward.id),
                Some(json!({ "reward": reward })),
            )
        }
        RewardsCommands::Update {
            id,
            name,
            description,
            points,
            price,
            quantity,
            image,
        } => {
            let patch = RewardPatch {
                name,
                description,
                points_required: points,
                price_uzs: price,
                quantity,
                image: load_image(image.as_deref()).await?,
            };

            let mut list = ResourceList::new(api.rewards);
            let reward = list.update(&id, &patch).await?;
            output_success(
                &output_format,
                &format!("Reward {} updated", reward.id),
                Some(json!({ "reward": reward })),
            )
        }
        RewardsCommands::Delete { id, yes } => {
            let mut list = ResourceList::new(api.rewards);
            if !yes {
                list.refresh().await;
            }

            let outcome = list
                .delete_confirmed(&id, |cached| {
                    yes || confirm(&match cached {
                        Some(reward) => format!("Delete reward {} ({} issued)?", reward.name, reward.issued_total),
                        None => format!("Delete reward {}?", id),
                    })
                })
                .await?;

            match outcome {
                DeleteOutcome::Deleted(_) => output_success(&output_format, &format!("Reward {} deleted", id), None),
                DeleteOutcome::Declined => output_success(&output_format, "Nothing deleted", None),
            }
        }
    }
}
