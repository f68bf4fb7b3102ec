//! HTTP API layer for brandhub.
//!
//! This crate provides the REST binding over the core services:
//!
//! - **Endpoints**: posts, engagement, polls, moderation
//! - **Extractors**: forwarded-identity authentication
//! - **Middleware**: identity propagation from the session gateway
//!
//! Built on Axum 0.8 with Tower middleware stack.

// Allow dead_code for API compatibility fields in request structs
#![allow(dead_code)]

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
