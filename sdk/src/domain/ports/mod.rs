//! Domain ports defining the edges of the SDK.
//!
//! Ports describe how gateways expect to reach driven adapters. Each trait
//! exposes strongly typed errors so adapters map their failures into
//! predictable variants.

mod macros;
pub(crate) use macros::define_port_error;

mod http_transport;

#[cfg(test)]
pub use http_transport::MockHttpTransport;
pub use http_transport::{ApiResponse, HttpTransport, OK_KEY, TransportError};
