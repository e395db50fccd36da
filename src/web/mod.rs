//! HTTP surface of the signup service
//!
//! Serves the JSON signup, stats and health endpoints.

mod api;
mod server;

pub use server::{start_web_server, WebServerConfig};
