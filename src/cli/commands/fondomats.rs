use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::{confirm, ensure_loaded, output_list, output_record, output_success, yes_no};
use crate::cli::OutputFormat;
use crate::controller::{DeleteOutcome, ResourceList};
use crate::models::{FondomatPatch, FondomatStatus, NewFondomat};
use crate::resources::AdminApi;

#[derive(Subcommand)]
pub enum FondomatsCommands {
    #[command(about = "List collection machines with status counters")]
    List {
        #[arg(long, help = "Match name, location or id")]
        search: Option<String>,

        #[arg(long, help = "active, maintenance or inactive")]
        status: Option<FondomatStatus>,
    },

    #[command(about = "Show one machine with its activity details")]
    Show {
        #[arg(help = "Fondomat id")]
        id: i64,
    },

    #[command(about = "Register a machine")]
    Create {
        #[arg(long)]
        name: String,

        #[arg(long)]
        location: String,

        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        #[arg(long, allow_negative_numbers = true)]
        lon: f64,

        #[arg(long, default_value = "active", help = "active, maintenance or inactive")]
        status: FondomatStatus,

        #[arg(long, default_value = "")]
        model: String,

        #[arg(long, default_value = "")]
        software_version: String,

        #[arg(long, default_value = "")]
        serial_number: String,

        #[arg(long, help = "Register the machine disabled")]
        inactive: bool,
    },

    #[command(about = "Update a machine")]
    Update {
        #[arg(help = "Fondomat id")]
        id: i64,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        location: Option<String>,

        #[arg(long, allow_negative_numbers = true)]
        lat: Option<f64>,

        #[arg(long, allow_negative_numbers = true)]
        lon: Option<f64>,

        #[arg(long, help = "active, maintenance or inactive")]
        status: Option<FondomatStatus>,

        #[arg(long)]
        active: Option<bool>,

        #[arg(long)]
        model: Option<String>,

        #[arg(long)]
        software_version: Option<String>,

        #[arg(long)]
        serial_number: Option<String>,
    },

    #[command(about = "Remove a machine")]
    Delete {
        #[arg(help = "Fondomat id")]
        id: i64,

        #[arg(long, short = 'y', help = "Skip the confirmation prompt")]
        yes: bool,
    },

    #[command(about = "Issue a new QR code for a machine")]
    RegenerateQr {
        #[arg(help = "Fondomat id")]
        id: i64,
    },
}

pub async fn handle(cmd: FondomatsCommands, api: AdminApi, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        FondomatsCommands::List { search, status } => {
            let mut list = ResourceList::new(api.fondomats);
            list.refresh().await;
            ensure_loaded(&list)?;

            list.set_search(search.unwrap_or_default());
            list.set_category(status);

            let stats = list.stats();
            let summary = format!(
                "Total: {}  Active: {}  Maintenance: {}  Inactive: {}  Income: {} UZS",
                stats.total, stats.active, stats.maintenance, stats.inactive, stats.total_income
            );
            output_list(&output_format, &list, &summary, |fondomat| {
                format!(
                    "{:<6} {:<24} {:<32} {:<12} {:>8} bottles",
                    fondomat.id,
                    fondomat.name,
                    fondomat.location,
                    fondomat.status_kind(),
                    fondomat.collected_total
                )
            })
        }
        FondomatsCommands::Show { id } => {
            let detail = api.fondomats.get(id).await?;
            let base = &detail.fondomat;
            let optional = |value: &Option<String>| value.clone().unwrap_or_default();

            output_record(
                &output_format,
                "fondomat",
                &detail,
                vec![
                    ("Id", base.id.to_string()),
                    ("Name", base.name.clone()),
                    ("Location", base.location.clone()),
                    ("Coordinates", format!("{}, {}", base.latitude, base.longitude)),
                    ("Status", base.status_kind().to_string()),
                    ("Enabled", yes_no(base.is_active)),
                    ("Model", optional(&detail.model)),
                    ("Software", optional(&detail.software_version)),
                    ("Serial number", optional(&detail.serial_number)),
                    ("Collected total", base.collected_total.to_string()),
                    ("Collected today", detail.collected_today.to_string()),
                    ("Collected week", detail.collected_week.to_string()),
                    ("Collected month", detail.collected_month.to_string()),
                    ("Avg per day", format!("{:.1}", detail.avg_collected_per_day)),
                    ("Points issued", detail.points_issued.to_string()),
                    ("Income", format!("{} UZS", base.total_income)),
                    ("QR code", optional(&base.qr_code)),
                ],
            )
        }
        FondomatsCommands::Create {
            name,
            location,
            lat,
            lon,
            status,
            model,
            software_version,
            serial_number,
            inactive,
        } => {
            let input = NewFondomat {
                name,
                location,
                latitude: lat,
                longitude: lon,
                is_active: !inactive,
                status,
                model,
                software_version,
                serial_number,
            };

            let mut list = ResourceList::new(api.fondomats);
            let fondomat = list.create(&input).await?;
            output_success(
                &output_format,
                &format!("Fondomat {} created (id {})", fondomat.name, fondomat.id),
                Some(json!({ "fondomat": fondomat })),
            )
        }
        FondomatsCommands::Update {
            id,
            name,
            location,
            lat,
            lon,
            status,
            active,
            model,
            software_version,
            serial_number,
        } => {
            let patch = FondomatPatch {
                name,
                location,
                latitude: lat,
                longitude: lon,
                is_active: active,
                status,
                model,
                software_version,
                serial_number,
            };

            let mut list = ResourceList::new(api.fondomats);
            let fondomat = list.update(&id, &patch).await?;
            output_success(
                &output_format,
                &format!("Fondomat {} updated", fondomat.id),
                Some(json!({ "fondomat": fondomat })),
            )
        }
        FondomatsCommands::Delete { id, yes } => {
            let mut list = ResourceList::new(api.fondomats);
            if !yes {
                list.refresh().await;
            }

            let outcome = list
                .delete_confirmed(&id, |cached| {
                    yes || confirm(&match cached {
                        Some(fondomat) => format!("Delete fondomat {} at {}?", fondomat.name, fondomat.location),
                        None => format!("Delete fondomat {}?", id),
                    })
                })
                .await?;

            match outcome {
                DeleteOutcome::Deleted(_) => output_success(&output_format, &format!("Fondomat {} deleted", id), None),
                DeleteOutcome::Declined => output_success(&output_format, "Nothing deleted", None),
            }
        }
        FondomatsCommands::RegenerateQr { id } => {
            let mut list = ResourceList::new(api.fondomats);
            let qr = list.regenerate_qr(id).await?;
            output_success(
                &output_format,
                &format!("New QR code for fondomat {}: {}", id, qr.qr_code),
                Some(json!({ "qr_code": qr.qr_code })),
            )
        }
    }
}
