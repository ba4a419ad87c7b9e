//! Search queries for list endpoints.
//!
//! The API accepts either a free-text term or a map of filter fields. Both
//! are passed through untouched; only `page` and `pageSize` are owned here.

use std::collections::BTreeMap;

use pagination::Paged;

/// Filter part of a search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SearchFilter {
    /// No filter: list everything.
    #[default]
    None,
    /// Free-text term sent as `search`.
    Basic(String),
    /// Field filters sent as individual query parameters.
    Advanced(BTreeMap<String, String>),
}

/// Query for a search call.
///
/// # Examples
/// ```
/// use paymentrails::SearchQuery;
///
/// let query = SearchQuery::basic("tom").with_page(2).with_page_size(10);
/// assert_eq!(
///     query.to_query_pairs(),
///     [
///         ("search".to_owned(), "tom".to_owned()),
///         ("page".to_owned(), "2".to_owned()),
///         ("pageSize".to_owned(), "10".to_owned()),
///     ]
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    filter: SearchFilter,
    page: Option<u32>,
    page_size: Option<u32>,
}

impl SearchQuery {
    /// List without filtering.
    pub fn all() -> Self {
        Self::default()
    }

    /// Search by free-text term.
    pub fn basic(term: impl Into<String>) -> Self {
        Self {
            filter: SearchFilter::Basic(term.into()),
            ..Self::default()
        }
    }

    /// Search by field filters.
    pub fn advanced<K, V>(filters: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let filters = filters
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        Self {
            filter: SearchFilter::Advanced(filters),
            ..Self::default()
        }
    }

    /// Request a specific page.
    #[must_use]
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Request a page size.
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// Filter part of the query.
    pub fn filter(&self) -> &SearchFilter {
        &self.filter
    }

    /// Requested page size, if set.
    pub fn page_size(&self) -> Option<u32> {
        self.page_size
    }

    /// Render as query-string pairs: filters first, then paging.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = match &self.filter {
            SearchFilter::None => Vec::new(),
            SearchFilter::Basic(term) => vec![("search".to_owned(), term.clone())],
            SearchFilter::Advanced(filters) => filters
                .iter()
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
        };
        if let Some(page) = self.page {
            pairs.push(("page".to_owned(), page.to_string()));
        }
        if let Some(page_size) = self.page_size {
            pairs.push(("pageSize".to_owned(), page_size.to_string()));
        }
        pairs
    }
}

impl Paged for SearchQuery {
    fn page(&self) -> Option<u32> {
        self.page
    }

    fn with_page(self, page: u32) -> Self {
        Self::with_page(self, page)
    }
}

impl From<&str> for SearchQuery {
    fn from(term: &str) -> Self {
        Self::basic(term)
    }
}

impl From<String> for SearchQuery {
    fn from(term: String) -> Self {
        Self::basic(term)
    }
}

impl From<BTreeMap<String, String>> for SearchQuery {
    fn from(filters: BTreeMap<String, String>) -> Self {
        Self {
            filter: SearchFilter::Advanced(filters),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect()
    }

    #[rstest]
    #[case::all(SearchQuery::all(), pairs(&[]))]
    #[case::basic(SearchQuery::basic("Tom Jones"), pairs(&[("search", "Tom Jones")]))]
    #[case::advanced(
        SearchQuery::advanced([("status", "active"), ("country", "CA")]),
        pairs(&[("country", "CA"), ("status", "active")])
    )]
    #[case::paged(
        SearchQuery::all().with_page(3).with_page_size(50),
        pairs(&[("page", "3"), ("pageSize", "50")])
    )]
    fn renders_query_pairs(#[case] query: SearchQuery, #[case] expected: Vec<(String, String)>) {
        assert_eq!(query.to_query_pairs(), expected);
    }

    #[rstest]
    fn paging_only_touches_the_page() {
        let query = SearchQuery::advanced([("email", "a@example.com")]).with_page_size(5);
        let next = Paged::with_page(query.clone(), 2);

        assert_eq!(Paged::page(&query), None);
        assert_eq!(Paged::page(&next), Some(2));
        assert_eq!(next.filter(), query.filter());
        assert_eq!(next.page_size(), Some(5));
    }

    #[rstest]
    fn terms_convert_into_basic_searches() {
        assert_eq!(SearchQuery::from("tom"), SearchQuery::basic("tom"));
        assert_eq!(
            SearchQuery::from(String::from("tom")).filter(),
            &SearchFilter::Basic("tom".to_owned())
        );
    }
}
