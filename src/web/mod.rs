//! HTTP server hosting the relay.
//!
//! Serves the WebSocket endpoint and a health check behind CORS and request
//! tracing layers, plus the static browser client when enabled.

pub mod middleware;
pub mod router;
pub mod server;
pub mod ws;

pub use router::{create_router, create_static_router};
pub use server::WebServer;
