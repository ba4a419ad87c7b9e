//! Page metadata carried in list envelopes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Envelope key under which list endpoints report page metadata.
pub const META_KEY: &str = "meta";

/// Position of one page within a paged listing.
///
/// ## Invariants
/// - `page` is one-based and never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    /// One-based index of the page held by the envelope.
    pub page: u32,
    /// Total number of pages available for the query.
    #[serde(default)]
    pub pages: u32,
    /// Total number of records matching the query.
    #[serde(default)]
    pub records: u64,
}

impl PageMeta {
    /// Read page metadata from a decoded response envelope.
    ///
    /// Returns `Ok(None)` when the envelope carries no metadata at all.
    ///
    /// # Errors
    ///
    /// Returns [`PageMetaError`] when metadata is present but malformed or
    /// reports a zero page index.
    pub fn from_envelope(envelope: &Map<String, Value>) -> Result<Option<Self>, PageMetaError> {
        let Some(raw) = envelope.get(META_KEY).filter(|value| !value.is_null()) else {
            return Ok(None);
        };
        let meta: Self =
            serde_json::from_value(raw.clone()).map_err(|error| PageMetaError::Malformed {
                message: error.to_string(),
            })?;
        if meta.page == 0 {
            return Err(PageMetaError::ZeroPage);
        }
        Ok(Some(meta))
    }

    /// Whether a page follows this one.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page < self.pages
    }

    /// Index of the following page, if any.
    #[must_use]
    pub const fn next_page(&self) -> Option<u32> {
        if self.has_next() {
            self.page.checked_add(1)
        } else {
            None
        }
    }
}

/// Errors raised while reading page metadata.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageMetaError {
    /// The metadata object did not match the expected shape.
    #[error("malformed page metadata: {message}")]
    Malformed {
        /// Decoder message describing the mismatch.
        message: String,
    },
    /// The metadata reported page zero.
    #[error("page metadata must use one-based page numbers")]
    ZeroPage,
}
