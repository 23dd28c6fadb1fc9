//! Machine failure prediction server
//!
//! The library surface exposes the router and configuration so the
//! integration tests drive the same code the binary serves.

pub mod api;
pub mod config;
