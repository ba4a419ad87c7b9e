//! Paged result collections and the pager that continues them.

use std::fmt;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::meta::{PageMeta, PageMetaError};

/// Query types that carry a page number.
///
/// Everything else inside the query is opaque to the pager.
pub trait Paged {
    /// Page requested by this query, if one was set.
    fn page(&self) -> Option<u32>;

    /// Return the same query pointed at `page`.
    #[must_use]
    fn with_page(self, page: u32) -> Self;
}

/// A gateway able to produce pages for a [`ResourceCollection`].
#[async_trait]
pub trait PageSource: Sync + Sized {
    /// Query replayed by the pager.
    type Query: Paged + Clone + Send + Sync;
    /// Item materialised from each raw entry of the page.
    type Item: Send;
    /// Error returned when a page cannot be fetched.
    type Error: Send;

    /// Fetch one page for `method` with `query`.
    ///
    /// `method` names the listing operation that produced the original page
    /// so sources exposing several listings can dispatch on it.
    async fn fetch_page(
        &self,
        method: &'static str,
        query: Self::Query,
    ) -> Result<ResourceCollection<'_, Self>, Self::Error>;
}

/// Continuation descriptor for a page.
///
/// Borrows the source gateway; the collection never owns it.
pub struct Pager<'g, S: PageSource> {
    source: &'g S,
    method: &'static str,
    query: S::Query,
}

impl<'g, S: PageSource> Pager<'g, S> {
    /// Describe how a page was produced.
    pub fn new(source: &'g S, method: &'static str, query: S::Query) -> Self {
        Self {
            source,
            method,
            query,
        }
    }

    /// Name of the listing operation to replay.
    #[must_use]
    pub const fn method(&self) -> &'static str {
        self.method
    }

    /// Query exactly as the caller supplied it.
    #[must_use]
    pub const fn query(&self) -> &S::Query {
        &self.query
    }

    /// Source gateway the pager calls back into.
    #[must_use]
    pub const fn source(&self) -> &'g S {
        self.source
    }
}

impl<S: PageSource> Clone for Pager<'_, S> {
    fn clone(&self) -> Self {
        Self {
            source: self.source,
            method: self.method,
            query: self.query.clone(),
        }
    }
}

impl<S> fmt::Debug for Pager<'_, S>
where
    S: PageSource,
    S::Query: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pager")
            .field("method", &self.method)
            .field("query", &self.query)
            .finish_non_exhaustive()
    }
}

/// One page of results together with the envelope it arrived in.
pub struct ResourceCollection<'g, S: PageSource> {
    envelope: Map<String, Value>,
    items: Vec<S::Item>,
    meta: Option<PageMeta>,
    pager: Pager<'g, S>,
}

impl<'g, S: PageSource> ResourceCollection<'g, S> {
    /// Assemble a page from its raw envelope, decoded items and pager.
    ///
    /// # Errors
    ///
    /// Returns [`PageMetaError`] when the envelope carries malformed page
    /// metadata.
    pub fn try_new(
        envelope: Map<String, Value>,
        items: Vec<S::Item>,
        pager: Pager<'g, S>,
    ) -> Result<Self, PageMetaError> {
        let meta = PageMeta::from_envelope(&envelope)?;
        Ok(Self {
            envelope,
            items,
            meta,
            pager,
        })
    }

    /// Raw response envelope.
    #[must_use]
    pub const fn envelope(&self) -> &Map<String, Value> {
        &self.envelope
    }

    /// Items in the order the API returned them.
    #[must_use]
    pub fn items(&self) -> &[S::Item] {
        &self.items
    }

    /// Consume the page, keeping only its items.
    #[must_use]
    pub fn into_items(self) -> Vec<S::Item> {
        self.items
    }

    /// Iterate over the items of this page.
    pub fn iter(&self) -> std::slice::Iter<'_, S::Item> {
        self.items.iter()
    }

    /// Number of items on this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether this page holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Page metadata, when the envelope carried any.
    #[must_use]
    pub const fn meta(&self) -> Option<PageMeta> {
        self.meta
    }

    /// Continuation descriptor for this page.
    #[must_use]
    pub const fn pager(&self) -> &Pager<'g, S> {
        &self.pager
    }

    /// Whether the metadata reports a following page.
    #[must_use]
    pub fn has_next_page(&self) -> bool {
        self.meta.is_some_and(|meta| meta.has_next())
    }

    /// Re-run the original listing with the query unchanged.
    ///
    /// # Errors
    ///
    /// Propagates the source error for the replayed call.
    pub async fn replay(&self) -> Result<ResourceCollection<'g, S>, S::Error> {
        let source = self.pager.source;
        source
            .fetch_page(self.pager.method, self.pager.query.clone())
            .await
    }

    /// Fetch the page following this one.
    ///
    /// Returns `Ok(None)` when the metadata reports no further pages or no
    /// metadata was sent.
    ///
    /// # Errors
    ///
    /// Propagates the source error for the continuation call.
    pub async fn next_page(&self) -> Result<Option<ResourceCollection<'g, S>>, S::Error> {
        let Some(next) = self.meta.and_then(|meta| meta.next_page()) else {
            return Ok(None);
        };
        let source = self.pager.source;
        let query = self.pager.query.clone().with_page(next);
        source.fetch_page(self.pager.method, query).await.map(Some)
    }
}

impl<S> fmt::Debug for ResourceCollection<'_, S>
where
    S: PageSource,
    S::Query: fmt::Debug,
    S::Item: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceCollection")
            .field("items", &self.items)
            .field("meta", &self.meta)
            .field("pager", &self.pager)
            .finish_non_exhaustive()
    }
}

impl<S: PageSource> IntoIterator for ResourceCollection<'_, S> {
    type Item = S::Item;
    type IntoIter = std::vec::IntoIter<S::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'c, S: PageSource> IntoIterator for &'c ResourceCollection<'_, S> {
    type Item = &'c S::Item;
    type IntoIter = std::slice::Iter<'c, S::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
