//! End-to-end integration tests.
//!
//! These tests drive the service provider the way a deployment does: from
//! configuration through the request and response pipelines, and over HTTP
//! through the axum router.

mod common;
mod endpoints;
mod request_flow;
mod response_flow;
