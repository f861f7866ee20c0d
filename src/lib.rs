//! This crate provides a heat map of US energy incentive programs. It reads program records and
//! device categories from a hosted Supabase database, counts programs by state, region and device
//! category, and serves a choropleth with filter controls.
//!
//! Aggregation is a pure function over a snapshot loaded once at startup, so every filter change
//! is answered from memory without touching the remote tables again.
//!
//! The service is built on top of a number of open source components.
//!
//! * [Tokio](tokio), the most popular asynchronous Rust runtime.
//! * [Axum](axum) web framework, built by the Tokio team, on top of the [hyper] HTTP library.
//! * [reqwest] queries the Supabase REST (PostgREST) API.
//! * [Serde](serde) performs (de)serialisation of JSON request and response data.
//! * [minijinja] renders the HTML page and SVG map.

pub mod aggregation;
pub mod app;
pub mod app_state;
pub mod cli;
pub mod dataset;
pub mod error;
pub mod geography;
pub mod metrics;
pub mod models;
pub mod render;
pub mod server;
pub mod supabase;
#[cfg(test)]
pub mod test_utils;
pub mod tracing;
pub mod types;
pub mod validated_json;
