//! HTTP API: server wiring, authentication layers, routes.

pub mod app;
pub mod authz;
pub mod config;
pub mod context;
pub mod middleware;
