use async_trait::async_trait;

use crate::api::{endpoints, HttpClient};
use crate::controller::{ListResource, Listing};
use crate::error::ApiError;
use crate::models::{DashboardStats, DashboardSummary, RewardIssued};

/// Read-only landing screen: headline counters plus the most issued rewards.
#[derive(Clone)]
pub struct DashboardApi {
    client: HttpClient,
}

impl DashboardApi {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    pub async fn stats(&self) -> Result<DashboardStats, ApiError> {
        self.client.get(endpoints::DASHBOARD).await
    }
}

#[async_trait]
impl ListResource for DashboardApi {
    type Entity = RewardIssued;
    type Stats = DashboardSummary;
    type Query = ();

    const NAME: &'static str = "dashboard";

    async fn list(&self, _query: &()) -> Result<Listing<RewardIssued, DashboardSummary>, ApiError> {
        Ok(self.stats().await?.into_listing())
    }
}
