use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use super::discard;
use crate::api::{endpoints, HttpClient};
use crate::controller::{ListResource, Listing, ResourceList};
use crate::error::ApiError;
use crate::models::{User, UsersStats};

#[derive(Clone)]
pub struct UsersApi {
    client: HttpClient,
}

#[derive(Deserialize)]
struct UsersPage {
    #[serde(alias = "items")]
    users: Vec<User>,
    #[serde(default)]
    stats: UsersStats,
}

impl UsersApi {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    pub async fn block(&self, id: i64) -> Result<(), ApiError> {
        self.client
            .post::<Value, ()>(&endpoints::users::block(id), None)
            .await
            .and_then(discard)
    }

    pub async fn unblock(&self, id: i64) -> Result<(), ApiError> {
        self.client
            .post::<Value, ()>(&endpoints::users::unblock(id), None)
            .await
            .and_then(discard)
    }
}

#[async_trait]
impl ListResource for UsersApi {
    type Entity = User;
    type Stats = UsersStats;
    type Query = ();

    const NAME: &'static str = "users";

    async fn list(&self, _query: &()) -> Result<Listing<User, UsersStats>, ApiError> {
        let page: UsersPage = self.client.get(endpoints::users::LIST).await?;
        Ok(Listing {
            items: page.users,
            stats: page.stats,
        })
    }
}

impl ResourceList<UsersApi> {
    pub async fn block(&mut self, id: i64) -> Result<(), ApiError> {
        self.apply_remote(
            &id,
            "Block user",
            |api| async move { api.block(id).await },
            |user, _| user.mark_blocked(),
        )
        .await
    }

    pub async fn unblock(&mut self, id: i64) -> Result<(), ApiError> {
        self.apply_remote(
            &id,
            "Unblock user",
            |api| async move { api.unblock(id).await },
            |user, _| user.mark_active(),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockTransport;
    use serde_json::json;

    fn user(id: i64, name: &str, status: &str) -> Value {
        json!({
            "id": id, "username": name, "phone": format!("+99890000000{}", id),
            "first_name": name, "last_name": "", "email": format!("{}@mail.uz", name),
            "is_active": status == "active", "status": status, "role": "user",
            "balance": "0", "points": 0, "level": 1, "bottle_count": 0,
            "aluminum_bottle_count": 0, "total_payout": "0", "total_bottles_submitted": 0,
            "created_at": "2023-05-01T12:00:00"
        })
    }

    async fn loaded() -> (MockTransport, ResourceList<UsersApi>) {
        let mock = MockTransport::new();
        mock.respond_json(
            200,
            json!({
                "users": [user(1, "aziz", "active"), user(2, "dilnoza", "active"), user(3, "bekzod", "blocked")],
                "stats": {"total": 3, "active": 2, "blocked": 1, "new_this_month": 0}
            }),
        );
        let mut list = ResourceList::new(UsersApi::new(mock.client()));
        list.refresh().await;
        (mock, list)
    }

    #[tokio::test]
    async fn block_updates_record_and_counters() {
        let (mock, mut list) = loaded().await;
        let others: Vec<User> = list.items().iter().filter(|u| u.id != 2).cloned().collect();
        mock.respond_empty(200);

        list.block(2).await.unwrap();

        let blocked = list.find(&2).unwrap();
        assert!(!blocked.is_active);
        assert_eq!(blocked.status, "blocked");
        assert_eq!(list.stats().active, 1);
        assert_eq!(list.stats().blocked, 2);
        assert_eq!(list.stats().total, 3);
        let still: Vec<User> = list.items().iter().filter(|u| u.id != 2).cloned().collect();
        assert_eq!(still, others);
        assert_eq!(mock.requests()[1].path, "/users/2/block");
    }

    #[tokio::test]
    async fn failed_unblock_keeps_user_blocked() {
        let (mock, mut list) = loaded().await;
        mock.respond_json(403, json!({"detail": "not allowed"}));

        let err = list.unblock(3).await.unwrap_err();

        assert_eq!(err.message(), "not allowed");
        assert!(list.find(&3).unwrap().is_blocked());
        assert_eq!(list.stats().blocked, 1);
    }

    #[tokio::test]
    async fn list_error_surfaces_server_detail() {
        let mock = MockTransport::new();
        mock.respond_json(500, json!({"detail": "db down"}));
        let mut list = ResourceList::new(UsersApi::new(mock.client()));

        list.refresh().await;

        assert_eq!(list.error(), Some("db down"));
        assert_eq!(list.notices()[0].message, "db down");
    }
}
