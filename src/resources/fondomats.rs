use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use super::discard;
use crate::api::{endpoints, HttpClient};
use crate::controller::{CreateResource, DeleteResource, ListResource, Listing, ResourceList, UpdateResource};
use crate::error::ApiError;
use crate::models::{DetailedFondomat, Fondomat, FondomatPatch, FondomatStats, NewFondomat, QrCode};

#[derive(Clone)]
pub struct FondomatsApi {
    client: HttpClient,
}

#[derive(Deserialize)]
struct FondomatsPage {
    #[serde(alias = "items")]
    fandomats: Vec<Fondomat>,
    #[serde(default)]
    stats: FondomatStats,
}

impl FondomatsApi {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    pub async fn get(&self, id: i64) -> Result<DetailedFondomat, ApiError> {
        self.client.get(&endpoints::fandomats::detail(id)).await
    }

    pub async fn regenerate_qr(&self, id: i64) -> Result<QrCode, ApiError> {
        self.client
            .post::<QrCode, ()>(&endpoints::fandomats::regenerate_qr(id), None)
            .await
    }
}

#[async_trait]
impl ListResource for FondomatsApi {
    type Entity = Fondomat;
    type Stats = FondomatStats;
    type Query = ();

    const NAME: &'static str = "fondomats";

    async fn list(&self, _query: &()) -> Result<Listing<Fondomat, FondomatStats>, ApiError> {
        let page: FondomatsPage = self.client.get(endpoints::fandomats::LIST).await?;
        Ok(Listing {
            items: page.fandomats,
            stats: page.stats,
        })
    }
}

#[async_trait]
impl CreateResource for FondomatsApi {
    type Input = NewFondomat;
    type Created = Fondomat;

    async fn create(&self, input: &NewFondomat) -> Result<Fondomat, ApiError> {
        self.client.post(endpoints::fandomats::LIST, Some(input)).await
    }

    fn created_entity(created: &Fondomat) -> Fondomat {
        created.clone()
    }
}

#[async_trait]
impl UpdateResource for FondomatsApi {
    type Patch = FondomatPatch;

    async fn update(&self, id: &i64, patch: &FondomatPatch) -> Result<Fondomat, ApiError> {
        self.client.patch(&endpoints::fandomats::detail(*id), Some(patch)).await
    }
}

#[async_trait]
impl DeleteResource for FondomatsApi {
    async fn delete(&self, id: &i64) -> Result<(), ApiError> {
        self.client
            .delete::<Value>(&endpoints::fandomats::detail(*id))
            .await
            .and_then(discard)
    }
}

impl ResourceList<FondomatsApi> {
    pub async fn regenerate_qr(&mut self, id: i64) -> Result<QrCode, ApiError> {
        self.apply_remote(
            &id,
            "Regenerate QR code",
            |api| async move { api.regenerate_qr(id).await },
            |fondomat, qr: &QrCode| fondomat.qr_code = Some(qr.qr_code.clone()),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FondomatStatus;
    use crate::testing::MockTransport;
    use rust_decimal::Decimal;
    use serde_json::json;

    fn machine(id: i64, name: &str, status: &str, income: &str) -> Value {
        json!({
            "id": id, "name": name, "location": format!("{} district", name),
            "latitude": "41.3", "longitude": "69.2", "is_active": status == "active",
            "status": status, "collected_total": 10, "total_income": income,
            "created_at": "2024-01-01T00:00:00", "qr_code": null
        })
    }

    async fn loaded() -> (MockTransport, ResourceList<FondomatsApi>) {
        let mock = MockTransport::new();
        mock.respond_json(
            200,
            json!({
                "fandomats": [
                    machine(1, "Chilonzor", "active", "100"),
                    machine(2, "Yunusobod", "maintenance", "50"),
                    machine(3, "Sergeli", "inactive", "0"),
                    machine(4, "Olmazor", "active", "25")
                ],
                "stats": {"total": 4, "active": 2, "maintenance": 1, "inactive": 1, "total_income": "175.00"}
            }),
        );
        let mut list = ResourceList::new(FondomatsApi::new(mock.client()));
        list.refresh().await;
        (mock, list)
    }

    #[tokio::test]
    async fn deleting_maintenance_machine_only_touches_its_counter() {
        let (mock, mut list) = loaded().await;
        mock.respond_empty(204);

        list.delete(&2).await.unwrap();

        let stats = list.stats();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.maintenance, 0);
        assert_eq!(stats.active, 2);
        assert_eq!(stats.inactive, 1);
        assert_eq!(stats.total_income, Decimal::new(125, 0));
        assert_eq!(mock.requests()[1].path, "/fandomats/2");
    }

    #[tokio::test]
    async fn update_moves_machine_between_status_counters() {
        let (mock, mut list) = loaded().await;
        mock.respond_json(200, machine(1, "Chilonzor", "maintenance", "100"));

        let patch = FondomatPatch {
            status: Some(FondomatStatus::Maintenance),
            ..Default::default()
        };
        list.update(&1, &patch).await.unwrap();

        assert_eq!(list.stats().active, 1);
        assert_eq!(list.stats().maintenance, 2);
        assert_eq!(list.stats().total, 4);
    }

    #[tokio::test]
    async fn regenerated_qr_is_stored_on_the_record() {
        let (mock, mut list) = loaded().await;
        mock.respond_json(200, json!({"qr_code": "data:image/png;base64,AAAA"}));

        let qr = list.regenerate_qr(3).await.unwrap();

        assert_eq!(list.find(&3).unwrap().qr_code.as_deref(), Some(qr.qr_code.as_str()));
        assert_eq!(list.find(&1).unwrap().qr_code, None);
    }

    #[tokio::test]
    async fn status_and_search_filters_combine() {
        let (_mock, mut list) = loaded().await;
        list.set_category(Some(FondomatStatus::Active));
        list.set_search("olmazor");

        let ids: Vec<i64> = list.view().iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![4]);
    }
}
