//! Typed bindings of each admin API collection to the list controller.

pub mod auth;
pub mod bottles;
pub mod dashboard;
pub mod fondomats;
pub mod rewards;
pub mod users;
pub mod vendors;

pub use auth::{AuthApi, Credentials};
pub use bottles::BottlesApi;
pub use dashboard::DashboardApi;
pub use fondomats::FondomatsApi;
pub use rewards::RewardsApi;
pub use users::UsersApi;
pub use vendors::VendorsApi;

use serde_json::Value;

use crate::api::HttpClient;
use crate::error::ApiError;

/// Every resource binding over one shared client.
#[derive(Clone)]
pub struct AdminApi {
    pub users: UsersApi,
    pub vendors: VendorsApi,
    pub bottles: BottlesApi,
    pub fondomats: FondomatsApi,
    pub rewards: RewardsApi,
    pub dashboard: DashboardApi,
    pub auth: AuthApi,
}

impl AdminApi {
    pub fn new(client: HttpClient) -> Self {
        Self {
            users: UsersApi::new(client.clone()),
            vendors: VendorsApi::new(client.clone()),
            bottles: BottlesApi::new(client.clone()),
            fondomats: FondomatsApi::new(client.clone()),
            rewards: RewardsApi::new(client.clone()),
            dashboard: DashboardApi::new(client.clone()),
            auth: AuthApi::new(client),
        }
    }
}

/// Action endpoints answer with nothing, a message object or the record;
/// callers only care that the status was 2xx.
pub(crate) fn discard(_: Value) -> Result<(), ApiError> {
    Ok(())
}
