//! Game catalog API server library.
//!
//! Exposes the building blocks (config, state, error handling, routes,
//! conditional-request helpers) so integration tests and the binary
//! entrypoint share them.

pub mod auth;
pub mod caching;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
