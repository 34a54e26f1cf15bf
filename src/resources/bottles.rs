use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use super::discard;
use crate::api::{endpoints, HttpClient};
use crate::controller::{CreateResource, DeleteResource, InsertPosition, ListResource, Listing, UpdateResource};
use crate::error::ApiError;
use crate::models::{Bottle, BottlePatch, BottleQuery, BottleStats, NewBottle};

#[derive(Clone)]
pub struct BottlesApi {
    client: HttpClient,
}

#[derive(Deserialize)]
struct BottlesPage {
    #[serde(alias = "items")]
    bottles: Vec<Bottle>,
    #[serde(default)]
    total: Option<u64>,
}

impl BottlesApi {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    pub async fn get(&self, id: i64) -> Result<Bottle, ApiError> {
        self.client.get(&endpoints::bottles::detail(id)).await
    }
}

#[async_trait]
impl ListResource for BottlesApi {
    type Entity = Bottle;
    type Stats = BottleStats;
    type Query = BottleQuery;

    const NAME: &'static str = "bottles";

    async fn list(&self, query: &BottleQuery) -> Result<Listing<Bottle, BottleStats>, ApiError> {
        let page: BottlesPage = self
            .client
            .get_with_query(endpoints::bottles::LIST, query.to_pairs())
            .await?;
        let total = page.total.unwrap_or(page.bottles.len() as u64);
        Ok(Listing {
            items: page.bottles,
            stats: BottleStats { total },
        })
    }
}

#[async_trait]
impl CreateResource for BottlesApi {
    type Input = NewBottle;
    type Created = Bottle;

    const INSERT_AT: InsertPosition = InsertPosition::Head;

    async fn create(&self, input: &NewBottle) -> Result<Bottle, ApiError> {
        let form = input.to_form()?;
        self.client.post_form(endpoints::bottles::LIST, form).await
    }

    fn created_entity(created: &Bottle) -> Bottle {
        created.clone()
    }
}

#[async_trait]
impl UpdateResource for BottlesApi {
    type Patch = BottlePatch;

    async fn update(&self, id: &i64, patch: &BottlePatch) -> Result<Bottle, ApiError> {
        let form = patch.to_form()?;
        self.client.patch_form(&endpoints::bottles::detail(*id), form).await
    }
}

#[async_trait]
impl DeleteResource for BottlesApi {
    async fn delete(&self, id: &i64) -> Result<(), ApiError> {
        self.client
            .delete::<Value>(&endpoints::bottles::detail(*id))
            .await
            .and_then(discard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::RequestBody;
    use crate::controller::ResourceList;
    use crate::models::BottleMaterial;
    use crate::testing::MockTransport;
    use serde_json::json;

    fn bottle(id: i64, name: &str, material: &str) -> Value {
        json!({
            "id": id, "name": name, "size": 0.5, "material": material, "sku": format!("SKU-{}", id),
            "image": null, "created_at": "2024-02-01T10:00:00", "updated_at": "2024-02-01T10:00:00"
        })
    }

    async fn loaded() -> (MockTransport, ResourceList<BottlesApi>) {
        let mock = MockTransport::new();
        mock.respond_json(
            200,
            json!({
                "bottles": [bottle(1, "A", "plastic"), bottle(2, "B", "aluminum"), bottle(3, "C", "plastic")],
                "total": 3
            }),
        );
        let mut list = ResourceList::new(BottlesApi::new(mock.client()));
        list.refresh().await;
        (mock, list)
    }

    #[tokio::test]
    async fn material_filter_keeps_relative_order() {
        let (_mock, mut list) = loaded().await;

        list.set_category(Some(BottleMaterial::Plastic));

        let names: Vec<&str> = list.view().iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["A", "C"]);
    }

    #[tokio::test]
    async fn changed_query_refetches_with_parameters() {
        let (mock, mut list) = loaded().await;
        mock.respond_json(200, json!({"bottles": [bottle(2, "B", "aluminum")], "total": 1}));

        let query = BottleQuery {
            material: Some(BottleMaterial::Aluminum),
            ..Default::default()
        };
        assert!(list.set_query(query.clone()).await);
        assert!(!list.set_query(query).await);

        assert_eq!(mock.request_count(), 2);
        assert_eq!(
            mock.requests()[1].query,
            vec![("material".to_string(), "aluminum".to_string())]
        );
        assert_eq!(list.stats().total, 1);
    }

    #[tokio::test]
    async fn created_bottle_goes_first_as_multipart() {
        let (mock, mut list) = loaded().await;
        mock.respond_json(201, bottle(4, "D", "aluminum"));

        let input = NewBottle {
            name: "D".into(),
            size: "0.33".into(),
            material: BottleMaterial::Aluminum,
            sku: "SKU-4".into(),
            image: None,
        };
        list.create(&input).await.unwrap();

        assert_eq!(list.items()[0].id, 4);
        assert_eq!(list.stats().total, 4);
        match &mock.requests()[1].body {
            RequestBody::Form(form) => assert_eq!(form.field("sku"), Some("SKU-4")),
            other => panic!("expected multipart body, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn missing_sku_sends_nothing() {
        let (mock, mut list) = loaded().await;
        let input = NewBottle {
            name: "E".into(),
            size: "1".into(),
            material: BottleMaterial::Plastic,
            sku: "".into(),
            image: None,
        };

        assert!(list.create(&input).await.is_err());
        assert_eq!(mock.request_count(), 1);
    }

    #[tokio::test]
    async fn delete_drops_one_bottle() {
        let (mock, mut list) = loaded().await;
        mock.respond_empty(204);

        list.delete(&2).await.unwrap();

        let ids: Vec<i64> = list.items().iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(list.stats().total, 2);
    }
}
