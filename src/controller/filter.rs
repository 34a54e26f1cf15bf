use std::borrow::Cow;

/// Client-side search support for a cached record.
pub trait Searchable {
    /// Value of the category drop-down (status, material, vendor, ...)
    type Category: Clone + PartialEq + std::fmt::Debug + Send + Sync;

    /// Fields matched by the free-text search box
    fn search_fields(&self) -> Vec<Cow<'_, str>>;

    fn in_category(&self, category: &Self::Category) -> bool;
}

/// Current search text and category selection of one screen.
///
/// Both predicates are applied independently, so the order in which they are
/// set never changes the result.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewFilter<C> {
    pub search: String,
    pub category: Option<C>,
}

impl<C> Default for ViewFilter<C> {
    fn default() -> Self {
        Self {
            search: String::new(),
            category: None,
        }
    }
}

impl<C: Clone + PartialEq> ViewFilter<C> {
    pub fn new(search: impl Into<String>, category: Option<C>) -> Self {
        Self {
            search: search.into(),
            category,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.search.trim().is_empty() && self.category.is_none()
    }

    pub fn matches<E>(&self, entity: &E) -> bool
    where
        E: Searchable<Category = C>,
    {
        self.matches_search(entity) && self.matches_category(entity)
    }

    fn matches_search<E: Searchable<Category = C>>(&self, entity: &E) -> bool {
        let needle = self.search.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        entity
            .search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }

    fn matches_category<E: Searchable<Category = C>>(&self, entity: &E) -> bool {
        match &self.category {
            Some(category) => entity.in_category(category),
            None => true,
        }
    }
}

/// Matching records in their original relative order.
pub fn apply<'a, E>(items: &'a [E], filter: &ViewFilter<E::Category>) -> Vec<&'a E>
where
    E: Searchable,
{
    items.iter().filter(|e| filter.matches(*e)).collect()
}
