//! HTTP adapter for the Payment Rails REST API.

mod reqwest_transport;
mod signing;

pub use reqwest_transport::ReqwestTransport;
