use async_trait::async_trait;
use serde::Deserialize;

use crate::api::{endpoints, HttpClient};
use crate::controller::{CreateResource, InsertPosition, ListResource, Listing, UpdateResource};
use crate::error::ApiError;
use crate::models::{NewVendor, Vendor, VendorCreated, VendorCredentials, VendorPatch, VendorStats};

#[derive(Clone)]
pub struct VendorsApi {
    client: HttpClient,
}

/// The collection is served as a bare array; wrapped forms are accepted too.
#[derive(Deserialize)]
#[serde(untagged)]
enum VendorsPayload {
    Bare(Vec<Vendor>),
    Wrapped {
        #[serde(alias = "items")]
        vendors: Vec<Vendor>,
    },
}

impl VendorsApi {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    pub async fn get(&self, id: i64) -> Result<Vendor, ApiError> {
        self.client.get(&endpoints::vendors::detail(id)).await
    }

    /// Issue a new password. The credentials are returned once and not stored.
    pub async fn reset_password(&self, id: i64) -> Result<VendorCredentials, ApiError> {
        self.client
            .post::<VendorCredentials, ()>(&endpoints::vendors::reset_password(id), None)
            .await
    }
}

#[async_trait]
impl ListResource for VendorsApi {
    type Entity = Vendor;
    type Stats = VendorStats;
    type Query = ();

    const NAME: &'static str = "vendors";

    async fn list(&self, _query: &()) -> Result<Listing<Vendor, VendorStats>, ApiError> {
        let payload: VendorsPayload = self.client.get(endpoints::vendors::LIST).await?;
        let items = match payload {
            VendorsPayload::Bare(items) => items,
            VendorsPayload::Wrapped { vendors } => vendors,
        };
        let stats = VendorStats::from_vendors(&items);
        Ok(Listing { items, stats })
    }
}

#[async_trait]
impl CreateResource for VendorsApi {
    type Input = NewVendor;
    type Created = VendorCreated;

    const INSERT_AT: InsertPosition = InsertPosition::Head;

    async fn create(&self, input: &NewVendor) -> Result<VendorCreated, ApiError> {
        self.client.post(endpoints::vendors::LIST, Some(input)).await
    }

    fn created_entity(created: &VendorCreated) -> Vendor {
        created.vendor.clone()
    }
}

#[async_trait]
impl UpdateResource for VendorsApi {
    type Patch = VendorPatch;

    async fn update(&self, id: &i64, patch: &VendorPatch) -> Result<Vendor, ApiError> {
        self.client.patch(&endpoints::vendors::detail(*id), Some(patch)).await
    }
}
