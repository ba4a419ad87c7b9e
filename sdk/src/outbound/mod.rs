//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **http**: reqwest-backed transport with request signing
//!
//! Adapters are thin translators between domain types and wire
//! representations. They contain no business logic.

pub mod http;
