//! Middleware for the relay HTTP server.

pub mod cors;

pub use cors::create_cors_layer;
