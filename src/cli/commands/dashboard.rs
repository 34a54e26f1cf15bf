use crate::cli::utils::{ensure_loaded, output_list};
use crate::cli::OutputFormat;
use crate::controller::ResourceList;
use crate::resources::AdminApi;

pub async fn handle(api: AdminApi, output_format: OutputFormat) -> anyhow::Result<()> {
    let mut list = ResourceList::new(api.dashboard);
    list.refresh().await;
    ensure_loaded(&list)?;

    let stats = list.stats();
    let summary = format!(
        "Users: {}  Active fondomats: {}  Rewards issued: {}  Income: {} UZS\nMost issued rewards:",
        stats.total_users, stats.active_fandomats, stats.total_issued_rewards, stats.total_income
    );

    output_list(&output_format, &list, &summary, |reward| {
        format!("{:<6} {:<32} {}", reward.id, reward.name, reward.issued_total)
    })
}
