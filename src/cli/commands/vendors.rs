use clap::Subcommand;
use rust_decimal::Decimal;
use serde_json::json;

use crate::cli::utils::{ensure_loaded, output_list, output_record, output_success, yes_no};
use crate::cli::OutputFormat;
use crate::controller::ResourceList;
use crate::models::{NewVendor, VendorCredentials, VendorPatch, VendorState};
use crate::resources::AdminApi;

#[derive(Subcommand)]
pub enum VendorsCommands {
    #[command(about = "List vendors")]
    List {
        #[arg(long, help = "Match name, login, email or phone")]
        search: Option<String>,

        #[arg(long, value_parser = ["active", "inactive"], help = "Only active or inactive vendors")]
        status: Option<String>,
    },

    #[command(about = "Show one vendor")]
    Show {
        #[arg(help = "Vendor id")]
        id: i64,
    },

    #[command(about = "Create a vendor; prints the generated login and password once")]
    Create {
        #[arg(long)]
        name: String,

        #[arg(long, help = "Contact email")]
        email: String,

        #[arg(long, help = "Contact phone")]
        phone: String,

        #[arg(long, default_value = "", help = "Contract terms")]
        terms: String,

        #[arg(long, default_value = "0", help = "Commission percent (0-100)")]
        commission: Decimal,

        #[arg(long, help = "Create the vendor disabled")]
        inactive: bool,
    },

    #[command(about = "Update vendor fields")]
    Update {
        #[arg(help = "Vendor id")]
        id: i64,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        login: Option<String>,

        #[arg(long, help = "Contact email")]
        email: Option<String>,

        #[arg(long, help = "Contact phone")]
        phone: Option<String>,

        #[arg(long, help = "Contract terms")]
        terms: Option<String>,

        #[arg(long, help = "Commission percent (0-100)")]
        commission: Option<Decimal>,

        #[arg(long, help = "Enable or disable the vendor")]
        active: Option<bool>,
    },

    #[command(about = "Generate a new password for a vendor")]
    ResetPassword {
        #[arg(help = "Vendor id")]
        id: i64,
    },
}

pub async fn handle(cmd: VendorsCommands, api: AdminApi, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        VendorsCommands::List { search, status } => {
            let mut list = ResourceList::new(api.vendors);
            list.refresh().await;
            ensure_loaded(&list)?;

            list.set_search(search.unwrap_or_default());
            list.set_category(status.as_deref().map(|s| match s {
                "active" => VendorState::Active,
                _ => VendorState::Inactive,
            }));

            let stats = list.stats();
            let summary = format!("Total: {}  Active: {}  Inactive: {}", stats.total, stats.active, stats.inactive);
            output_list(&output_format, &list, &summary, |vendor| {
                format!(
                    "{:<6} {:<28} {:<24} {:>6}%  {}",
                    vendor.id,
                    vendor.name,
                    vendor.contact_email,
                    vendor.commission_percent,
                    if vendor.is_active { "active" } else { "inactive" }
                )
            })
        }
        VendorsCommands::Show { id } => {
            let vendor = api.vendors.get(id).await?;
            output_record(
                &output_format,
                "vendor",
                &vendor,
                vec![
                    ("Id", vendor.id.to_string()),
                    ("Name", vendor.name.clone()),
                    ("Login", vendor.login.clone()),
                    ("Email", vendor.contact_email.clone()),
                    ("Phone", vendor.contact_phone.clone()),
                    ("Terms", vendor.terms.clone()),
                    ("Commission", format!("{}%", vendor.commission_percent)),
                    ("Active", yes_no(vendor.is_active)),
                    ("Created", vendor.created_at.to_rfc3339()),
                ],
            )
        }
        VendorsCommands::Create {
            name,
            email,
            phone,
            terms,
            commission,
            inactive,
        } => {
            let input = NewVendor {
                name,
                contact_email: email,
                contact_phone: phone,
                terms,
                commission_percent: commission,
                is_active: !inactive,
            };

            let mut list = ResourceList::new(api.vendors);
            let created = list.create(&input).await?;
            print_credentials(
                &output_format,
                &format!("Vendor {} created (id {})", created.vendor.name, created.vendor.id),
                &created.credentials,
            )
        }
        VendorsCommands::Update {
            id,
            name,
            login,
            email,
            phone,
            terms,
            commission,
            active,
        } => {
            let patch = VendorPatch {
                name,
                login,
                contact_email: email,
                contact_phone: phone,
                terms,
                commission_percent: commission,
                is_active: active,
            };

            let mut list = ResourceList::new(api.vendors);
            let vendor = list.update(&id, &patch).await?;
            output_success(
                &output_format,
                &format!("Vendor {} updated", vendor.id),
                Some(json!({ "vendor": vendor })),
            )
        }
        VendorsCommands::ResetPassword { id } => {
            let credentials = api.vendors.reset_password(id).await?;
            print_credentials(&output_format, &format!("Password reset for vendor {}", id), &credentials)
        }
    }
}

fn print_credentials(
    output_format: &OutputFormat,
    message: &str,
    credentials: &VendorCredentials,
) -> anyhow::Result<()> {
    output_success(output_format, message, Some(json!({ "credentials": credentials })))?;
    if let OutputFormat::Text = output_format {
        println!("  login:    {}", credentials.login);
        println!("  password: {}", credentials.password);
        println!("  Store these now; the password is not shown again.");
    }
    Ok(())
}
