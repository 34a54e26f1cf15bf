//! Generic fetch / filter / mutate / reconcile controller behind every list screen.
//!
//! One [`ResourceList`] owns the cached collection of one screen. The cache
//! mirrors the last successful fetch and is patched record-by-record after
//! each mutation the server confirmed; it is never revalidated in between.

pub mod filter;
pub mod notice;
pub mod resource;

use std::future::Future;

use serde::Serialize;

use crate::error::ApiError;
pub use filter::{Searchable, ViewFilter};
pub use notice::{Notice, NoticeLevel};
pub use resource::{
    require, require_opt, CreateResource, DeleteResource, Entity, InsertPosition, ListResource,
    Listing, Tally, UpdateResource, Validate,
};

/// Oldest notices are dropped beyond this many.
pub const MAX_NOTICES: usize = 20;

type IdOf<R> = <<R as ListResource>::Entity as Entity>::Id;
type CategoryOf<R> = <<R as ListResource>::Entity as Searchable>::Category;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Loading,
    Ready,
    Failed,
}

/// What the screen should render right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen<'a> {
    /// Nothing loaded yet and a fetch is pending or about to start
    Loading,
    /// The first load failed; show the message with a retry action
    Unavailable { message: &'a str },
    /// Data is available; a failed refresh leaves it visible with an error
    Content {
        refreshing: bool,
        stale_error: Option<&'a str>,
    },
}

/// Result of a delete that first asks the operator.
#[derive(Debug, Clone, PartialEq)]
pub enum DeleteOutcome<E> {
    /// Server confirmed; carries the cached record that was removed, if any
    Deleted(Option<E>),
    /// Operator declined; no request was sent
    Declined,
}

pub struct ResourceList<R: ListResource> {
    resource: R,
    items: Vec<R::Entity>,
    stats: R::Stats,
    query: R::Query,
    phase: Phase,
    error: Option<String>,
    loaded: bool,
    notices: Vec<Notice>,
    pub filter: ViewFilter<CategoryOf<R>>,
}

impl<R: ListResource> ResourceList<R> {
    pub fn new(resource: R) -> Self {
        Self::with_query(resource, R::Query::default())
    }

    pub fn with_query(resource: R, query: R::Query) -> Self {
        Self {
            resource,
            items: Vec::new(),
            stats: R::Stats::default(),
            query,
            phase: Phase::Idle,
            error: None,
            loaded: false,
            notices: Vec::new(),
            filter: ViewFilter::default(),
        }
    }

    pub fn resource(&self) -> &R {
        &self.resource
    }

    pub fn items(&self) -> &[R::Entity] {
        &self.items
    }

    pub fn stats(&self) -> &R::Stats {
        &self.stats
    }

    pub fn query(&self) -> &R::Query {
        &self.query
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn find(&self, id: &IdOf<R>) -> Option<&R::Entity> {
        self.items.iter().find(|e| e.id() == *id)
    }

    /// Fetch the collection. Failures are recorded, never returned: the previous
    /// collection and stats stay in place and the message becomes the screen error.
    pub async fn refresh(&mut self) {
        self.phase = Phase::Loading;

        match self.resource.list(&self.query).await {
            Ok(listing) => {
                tracing::debug!(resource = R::NAME, count = listing.items.len(), "list refreshed");
                self.items = listing.items;
                self.stats = listing.stats;
                self.phase = Phase::Ready;
                self.error = None;
                self.loaded = true;
            }
            Err(err) => {
                tracing::warn!(resource = R::NAME, error = %err, "list refresh failed");
                self.phase = Phase::Failed;
                self.error = Some(err.message().to_string());
                self.notify(Notice::error(format!("Failed to load {}", R::NAME), &err));
            }
        }
    }

    /// Change the server-side filter; refetches only when it actually changed.
    pub async fn set_query(&mut self, query: R::Query) -> bool {
        if query == self.query && self.loaded {
            return false;
        }
        self.query = query;
        self.refresh().await;
        true
    }

    pub fn screen(&self) -> Screen<'_> {
        match (self.loaded, self.phase) {
            (false, Phase::Failed) => Screen::Unavailable {
                message: self.error.as_deref().unwrap_or_default(),
            },
            (false, _) => Screen::Loading,
            (true, phase) => Screen::Content {
                refreshing: phase == Phase::Loading,
                stale_error: self.error.as_deref(),
            },
        }
    }

    /// Drop the error shown over stale data.
    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    /// Records matching the current filter, in cache order. Recomputed on every call.
    pub fn view(&self) -> Vec<&R::Entity> {
        filter::apply(&self.items, &self.filter)
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.filter.search = search.into();
    }

    pub fn set_category(&mut self, category: Option<CategoryOf<R>>) {
        self.filter.category = category;
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn dismiss(&mut self, index: usize) -> Option<Notice> {
        if index < self.notices.len() {
            Some(self.notices.remove(index))
        } else {
            None
        }
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
        if self.notices.len() > MAX_NOTICES {
            let excess = self.notices.len() - MAX_NOTICES;
            self.notices.drain(..excess);
        }
    }

    fn fail<T>(&mut self, title: String, err: ApiError) -> Result<T, ApiError> {
        tracing::warn!(resource = R::NAME, error = %err, kind = ?err.kind(), "{}", title);
        self.notify(Notice::error(title, &err));
        Err(err)
    }

    fn position(&self, id: &IdOf<R>) -> Option<usize> {
        self.items.iter().position(|e| e.id() == *id)
    }

    fn replace_at(&mut self, index: usize, updated: R::Entity) {
        let previous = std::mem::replace(&mut self.items[index], updated);
        self.stats.on_replace(&previous, &self.items[index]);
    }

    /// Remove one cached record by id after the server confirmed a delete.
    fn remove_cached(&mut self, id: &IdOf<R>) -> Option<R::Entity> {
        let index = self.position(id)?;
        let removed = self.items.remove(index);
        self.stats.on_remove(&removed);
        Some(removed)
    }
}

impl<R: ListResource + Clone> ResourceList<R> {
    /// Run a resource-specific action and patch the cached record only once the
    /// server confirmed it. Used for block/unblock, QR regeneration and similar.
    pub async fn apply_remote<T, F, Fut, P>(
        &mut self,
        id: &IdOf<R>,
        action: &str,
        call: F,
        patch: P,
    ) -> Result<T, ApiError>
    where
        F: FnOnce(R) -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
        P: FnOnce(&mut R::Entity, &T),
    {
        match call(self.resource.clone()).await {
            Ok(outcome) => {
                if let Some(index) = self.position(id) {
                    let mut updated = self.items[index].clone();
                    patch(&mut updated, &outcome);
                    self.replace_at(index, updated);
                }
                self.notify(Notice::success(action, format!("{} #{}", R::NAME, id)));
                Ok(outcome)
            }
            Err(err) => self.fail(format!("Failed to {}", action.to_lowercase()), err),
        }
    }
}

impl<R: CreateResource> ResourceList<R> {
    /// Validate, create on the server, then insert the returned record locally.
    pub async fn create(&mut self, input: &R::Input) -> Result<R::Created, ApiError> {
        if let Err(err) = input.validate() {
            return self.fail(format!("Cannot create {}", R::NAME), err);
        }

        match self.resource.create(input).await {
            Ok(created) => {
                let entity = R::created_entity(&created);
                let id = entity.id();
                self.stats.on_insert(&entity);
                match R::INSERT_AT {
                    InsertPosition::Head => self.items.insert(0, entity),
                    InsertPosition::Tail => self.items.push(entity),
                }
                tracing::info!(resource = R::NAME, %id, "record created");
                self.notify(Notice::success("Created", format!("{} #{} created", R::NAME, id)));
                Ok(created)
            }
            Err(err) => self.fail(format!("Failed to create {}", R::NAME), err),
        }
    }
}

impl<R: UpdateResource> ResourceList<R> {
    /// Validate, update on the server, then replace the single matching record.
    pub async fn update(&mut self, id: &IdOf<R>, patch: &R::Patch) -> Result<R::Entity, ApiError> {
        if let Err(err) = patch.validate() {
            return self.fail(format!("Cannot update {}", R::NAME), err);
        }

        match self.resource.update(id, patch).await {
            Ok(updated) => {
                if let Some(index) = self.position(id) {
                    self.replace_at(index, updated.clone());
                }
                tracing::info!(resource = R::NAME, %id, "record updated");
                self.notify(Notice::success("Saved", format!("{} #{} updated", R::NAME, id)));
                Ok(updated)
            }
            Err(err) => self.fail(format!("Failed to update {}", R::NAME), err),
        }
    }
}

impl<R: DeleteResource> ResourceList<R> {
    /// Delete on the server, then remove exactly the record with this id.
    pub async fn delete(&mut self, id: &IdOf<R>) -> Result<Option<R::Entity>, ApiError> {
        match self.resource.delete(id).await {
            Ok(()) => {
                let removed = self.remove_cached(id);
                tracing::info!(resource = R::NAME, %id, "record deleted");
                self.notify(Notice::success("Deleted", format!("{} #{} deleted", R::NAME, id)));
                Ok(removed)
            }
            Err(err) => self.fail(format!("Failed to delete {}", R::NAME), err),
        }
    }

    /// Ask `confirm` (with the cached record, if any) before deleting.
    pub async fn delete_confirmed<C>(
        &mut self,
        id: &IdOf<R>,
        confirm: C,
    ) -> Result<DeleteOutcome<R::Entity>, ApiError>
    where
        C: FnOnce(Option<&R::Entity>) -> bool,
    {
        if !confirm(self.find(id)) {
            return Ok(DeleteOutcome::Declined);
        }
        self.delete(id).await.map(DeleteOutcome::Deleted)
    }
}
