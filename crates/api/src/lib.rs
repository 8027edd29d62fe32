//! HTTP API: server wiring, authentication middleware, routes and error mapping.

pub mod app;
pub mod context;
pub mod middleware;
