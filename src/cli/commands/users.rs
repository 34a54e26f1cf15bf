use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::{ensure_loaded, output_list, output_success};
use crate::cli::OutputFormat;
use crate::controller::ResourceList;
use crate::resources::{AdminApi, UsersApi};

#[derive(Subcommand)]
pub enum UsersCommands {
    #[command(about = "List users with their counters")]
    List {
        #[arg(long, help = "Match name, username, email, phone or id")]
        search: Option<String>,

        #[arg(long, help = "Only users with this status (active, blocked, pending)")]
        status: Option<String>,
    },

    #[command(about = "Block a user")]
    Block {
        #[arg(help = "User id")]
        id: i64,
    },

    #[command(about = "Unblock a user")]
    Unblock {
        #[arg(help = "User id")]
        id: i64,
    },
}

pub async fn handle(cmd: UsersCommands, api: AdminApi, output_format: OutputFormat) -> anyhow::Result<()> {
    let mut list = ResourceList::new(api.users);
    list.refresh().await;
    ensure_loaded(&list)?;

    match cmd {
        UsersCommands::List { search, status } => {
            list.set_search(search.unwrap_or_default());
            list.set_category(status.map(|s| s.trim().to_ascii_lowercase()).filter(|s| !s.is_empty()));
            print_list(&list, &output_format)
        }
        UsersCommands::Block { id } => {
            list.block(id).await?;
            report(&list, id, "blocked", &output_format)
        }
        UsersCommands::Unblock { id } => {
            list.unblock(id).await?;
            report(&list, id, "unblocked", &output_format)
        }
    }
}

fn print_list(list: &ResourceList<UsersApi>, output_format: &OutputFormat) -> anyhow::Result<()> {
    let stats = list.stats();
    let summary = format!(
        "Total: {}  Active: {}  Blocked: {}  New this month: {}",
        stats.total, stats.active, stats.blocked, stats.new_this_month
    );

    output_list(output_format, list, &summary, |user| {
        format!(
            "{:<6} {:<28} {:<16} {:<8} {} pts",
            user.id,
            user.display_name(),
            user.phone,
            user.status,
            user.points
        )
    })
}

fn report(list: &ResourceList<UsersApi>, id: i64, verb: &str, output_format: &OutputFormat) -> anyhow::Result<()> {
    let stats = list.stats();
    output_success(
        output_format,
        &format!("User {} {} (active {}, blocked {})", id, verb, stats.active, stats.blocked),
        Some(json!({ "user": list.find(&id), "stats": stats })),
    )
}
