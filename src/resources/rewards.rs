use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use super::discard;
use crate::api::{endpoints, HttpClient};
use crate::controller::{CreateResource, DeleteResource, ListResource, Listing, UpdateResource};
use crate::error::ApiError;
use crate::models::{NewReward, Reward, RewardPatch, RewardsStats};

#[derive(Clone)]
pub struct RewardsApi {
    client: HttpClient,
}

#[derive(Deserialize)]
struct RewardsPage {
    #[serde(alias = "items")]
    rewards: Vec<Reward>,
    #[serde(default)]
    stats: RewardsStats,
}

impl RewardsApi {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ListResource for RewardsApi {
    type Entity = Reward;
    type Stats = RewardsStats;
    type Query = ();

    const NAME: &'static str = "rewards";

    async fn list(&self, _query: &()) -> Result<Listing<Reward, RewardsStats>, ApiError> {
        let page: RewardsPage = self.client.get(endpoints::rewards::LIST).await?;
        Ok(Listing {
            items: page.rewards,
            stats: page.stats,
        })
    }
}

#[async_trait]
impl CreateResource for RewardsApi {
    type Input = NewReward;
    type Created = Reward;

    async fn create(&self, input: &NewReward) -> Result<Reward, ApiError> {
        let form = input.to_form()?;
        self.client.post_form(endpoints::rewards::LIST, form).await
    }

    fn created_entity(created: &Reward) -> Reward {
        created.clone()
    }
}

#[async_trait]
impl UpdateResource for RewardsApi {
    type Patch = RewardPatch;

    async fn update(&self, id: &i64, patch: &RewardPatch) -> Result<Reward, ApiError> {
        self.client
            .patch_form(&endpoints::rewards::detail(*id), patch.to_form())
            .await
    }
}

#[async_trait]
impl DeleteResource for RewardsApi {
    async fn delete(&self, id: &i64) -> Result<(), ApiError> {
        self.client
            .delete::<Value>(&endpoints::rewards::detail(*id))
            .await
            .and_then(discard)
    }
}
