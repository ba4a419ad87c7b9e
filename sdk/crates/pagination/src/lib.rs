//! Page envelope and pager primitives for Payment Rails list endpoints.
//!
//! List endpoints answer with one page of items plus optional page metadata.
//! This crate keeps that page together with a pager that remembers where the
//! page came from, so callers can replay the request or walk forward without
//! re-stating the query.
//!
//! # Overview
//!
//! - [`ResourceCollection`] owns one page: the raw envelope, the decoded items
//!   and the parsed [`PageMeta`].
//! - [`Pager`] borrows the [`PageSource`] that produced the page and holds the
//!   method name and the original query.
//! - [`Paged`] is the only thing the pager needs to know about a query: how to
//!   read and replace its page number.
//!
//! # Example
//!
//! ```
//! use pagination::PageMeta;
//! use serde_json::json;
//!
//! let envelope = json!({"ok": true, "meta": {"page": 1, "pages": 3, "records": 25}});
//! let meta = PageMeta::from_envelope(envelope.as_object().expect("object"))
//!     .expect("valid meta")
//!     .expect("meta present");
//!
//! assert_eq!(meta.next_page(), Some(2));
//! ```

mod collection;
mod meta;

pub use collection::{PageSource, Paged, Pager, ResourceCollection};
pub use meta::{META_KEY, PageMeta, PageMetaError};
