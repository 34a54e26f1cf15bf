use std::borrow::Cow;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::controller::{Entity, Listing, Searchable, Tally};

/// Raw `/dashboard/` payload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DashboardStats {
    #[serde(default)]
    pub total_users: u64,
    #[serde(default)]
    pub active_fandomats: u64,
    #[serde(default)]
    pub total_issued_rewards: u64,
    #[serde(default)]
    pub rewards: Vec<RewardIssued>,
    #[serde(default)]
    pub total_income: Decimal,
}

/// One row of the "most issued rewards" panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardIssued {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub issued_total: u64,
}

/// Headline counters shown above the rewards panel.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub total_users: u64,
    pub active_fandomats: u64,
    pub total_issued_rewards: u64,
    pub total_income: Decimal,
}

impl DashboardStats {
    /// Split into panel rows (most issued first) and headline counters.
    pub fn into_listing(self) -> Listing<RewardIssued, DashboardSummary> {
        let mut items = self.rewards;
        items.sort_by(|a, b| b.issued_total.cmp(&a.issued_total));
        Listing {
            items,
            stats: DashboardSummary {
                total_users: self.total_users,
                active_fandomats: self.active_fandomats,
                total_issued_rewards: self.total_issued_rewards,
                total_income: self.total_income,
            },
        }
    }
}

impl Entity for RewardIssued {
    type Id = i64;

    fn id(&self) -> i64 {
        self.id
    }
}

impl Searchable for RewardIssued {
    type Category = ();

    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        vec![Cow::Borrowed(&self.name)]
    }

    fn in_category(&self, _: &()) -> bool {
        true
    }
}

// Read-only screen
impl Tally<RewardIssued> for DashboardSummary {}
