//! STEMSight API server library.
//!
//! Exposes the building blocks (config, state, error handling, routes,
//! WebSocket and live-stream infrastructure) so integration tests and the
//! binary entrypoint can both access them.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod notifications;
pub mod query;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
pub mod streaming;
pub mod ws;
