use std::path::PathBuf;

use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::{confirm, ensure_loaded, load_image, output_list, output_success};
use crate::cli::OutputFormat;
use crate::controller::{DeleteOutcome, ResourceList};
use crate::models::{BottleMaterial, BottlePatch, BottleQuery, NewBottle};
use crate::resources::AdminApi;

#[derive(Subcommand)]
pub enum BottlesCommands {
    #[command(about = "List the bottle catalog (filtered by the API)")]
    List {
        #[arg(long, help = "Search by name or SKU")]
        search: Option<String>,

        #[arg(long, help = "plastic or aluminum")]
        material: Option<BottleMaterial>,

        #[arg(long, help = "Records to skip")]
        skip: Option<u32>,

        #[arg(long, help = "Maximum records to return")]
        limit: Option<u32>,
    },

    #[command(about = "Add a bottle type")]
    Create {
        #[arg(long)]
        name: String,

        #[arg(long, help = "Volume in litres, e.g. 0.5")]
        size: String,

        #[arg(long, help = "plastic or aluminum")]
        material: BottleMaterial,

        #[arg(long)]
        sku: String,

        #[arg(long, help = "Path to a product image")]
        image: Option<PathBuf>,
    },

    #[command(about = "Update a bottle type")]
    Update {
        #[arg(help = "Bottle id")]
        id: i64,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        size: Option<String>,

        #[arg(long)]
        material: Option<BottleMaterial>,

        #[arg(long)]
        sku: Option<String>,

        #[arg(long, help = "Path to a replacement image")]
        image: Option<PathBuf>,
    },

    #[command(about = "Delete a bottle type")]
    Delete {
        #[arg(help = "Bottle id")]
        id: i64,

        #[arg(long, short = 'y', help = "Skip the confirmation prompt")]
        yes: bool,
    },
}

pub async fn handle(cmd: BottlesCommands, api: AdminApi, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        BottlesCommands::List {
            search,
            material,
            skip,
            limit,
        } => {
            let query = BottleQuery {
                search,
                material,
                skip,
                limit,
            };
            let mut list = ResourceList::with_query(api.bottles, query);
            list.refresh().await;
            ensure_loaded(&list)?;

            let summary = format!("Total: {}", list.stats().total);
            output_list(&output_format, &list, &summary, |bottle| {
                format!(
                    "{:<6} {:<28} {:>6} L  {:<9} {}",
                    bottle.id, bottle.name, bottle.size, bottle.material, bottle.sku
                )
            })
        }
        BottlesCommands::Create {
            name,
            size,
            material,
            sku,
            image,
        } => {
            let input = NewBottle {
                name,
                size,
                material,
                sku,
                image: load_image(image.as_deref()).await?,
            };

            let mut list = ResourceList::new(api.bottles);
            let bottle = list.create(&input).await?;
            output_success(
                &output_format,
                &format!("Bottle {} created (id {})", bottle.name, bottle.id),
                Some(json!({ "bottle": bottle })),
            )
        }
        BottlesCommands::Update {
            id,
            name,
            size,
            material,
            sku,
            image,
        } => {
            let patch = BottlePatch {
                name,
                size,
                material,
                sku,
                image: load_image(image.as_deref()).await?,
            };

            let mut list = ResourceList::new(api.bottles);
            let bottle = list.update(&id, &patch).await?;
            output_success(
                &output_format,
                &format!("Bottle {} updated", bottle.id),
                Some(json!({ "bottle": bottle })),
            )
        }
        BottlesCommands::Delete { id, yes } => {
            let mut list = ResourceList::new(api.bottles);
            if !yes {
                list.refresh().await;
            }

            let outcome = list
                .delete_confirmed(&id, |cached| {
                    yes || confirm(&match cached {
                        Some(bottle) => format!("Delete bottle {} ({})?", bottle.name, bottle.sku),
                        None => format!("Delete bottle {}?", id),
                    })
                })
                .await?;

            match outcome {
                DeleteOutcome::Deleted(_) => output_success(&output_format, &format!("Bottle {} deleted", id), None),
                DeleteOutcome::Declined => output_success(&output_format, "Nothing deleted", None),
            }
        }
    }
}
