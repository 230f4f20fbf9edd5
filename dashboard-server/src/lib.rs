//! Serving layer for the Bitcoin sentiment strategy: data acquisition,
//! parameter-keyed result caching, and the dashboard HTTP API.

pub mod api;
pub mod cache;
pub mod config;
pub mod data;
pub mod error;
pub mod serialize;
