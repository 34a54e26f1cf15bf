use async_trait::async_trait;

use super::filter::Searchable;
use crate::error::ApiError;

/// A record owned by the remote API, identified by `id`.
pub trait Entity: Clone + Send + Sync {
    type Id: Clone + PartialEq + std::fmt::Display + Send + Sync;

    fn id(&self) -> Self::Id;
}

/// Aggregate counters shown next to a list, patched as single records change.
///
/// Implementations receive the record as it was *before* the change for
/// `on_remove` and as it is *after* for `on_insert`.
pub trait Tally<E>: Clone + Default + Send + Sync {
    fn on_insert(&mut self, _entity: &E) {}

    fn on_remove(&mut self, _entity: &E) {}

    fn on_replace(&mut self, old: &E, new: &E) {
        self.on_remove(old);
        self.on_insert(new);
    }
}

impl<E> Tally<E> for () {}

/// Local check of operator input; failures never reach the network.
pub trait Validate {
    fn validate(&self) -> Result<(), ApiError>;
}

/// Fail with a validation error when a required text field is blank.
pub fn require(field: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::missing_field(field));
    }
    Ok(())
}

/// Like [`require`], for fields that are only checked when present in a patch.
pub fn require_opt(field: &str, value: Option<&str>) -> Result<(), ApiError> {
    match value {
        Some(v) => require(field, v),
        None => Ok(()),
    }
}

/// One successful fetch: the collection plus the stats that came with it.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing<E, S> {
    pub items: Vec<E>,
    pub stats: S,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertPosition {
    Head,
    Tail,
}

/// Binding of a collection endpoint.
#[async_trait]
pub trait ListResource: Send + Sync {
    type Entity: Entity + Searchable;
    type Stats: Tally<Self::Entity>;
    /// Server-side filter parameters; `()` for resources filtered only locally
    type Query: Clone + Default + PartialEq + Send + Sync;

    /// Plural display name used in notices and logs
    const NAME: &'static str;

    async fn list(&self, query: &Self::Query) -> Result<Listing<Self::Entity, Self::Stats>, ApiError>;
}

#[async_trait]
pub trait CreateResource: ListResource {
    type Input: Validate + Send + Sync;
    /// Full create response; may carry more than the record (vendor credentials)
    type Created: Send;

    const INSERT_AT: InsertPosition = InsertPosition::Tail;

    async fn create(&self, input: &Self::Input) -> Result<Self::Created, ApiError>;

    fn created_entity(created: &Self::Created) -> Self::Entity;
}

#[async_trait]
pub trait UpdateResource: ListResource {
    type Patch: Validate + Send + Sync;

    async fn update(
        &self,
        id: &<Self::Entity as Entity>::Id,
        patch: &Self::Patch,
    ) -> Result<Self::Entity, ApiError>;
}

#[async_trait]
pub trait DeleteResource: ListResource {
    async fn delete(&self, id: &<Self::Entity as Entity>::Id) -> Result<(), ApiError>;
}
