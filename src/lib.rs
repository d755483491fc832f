//! Portcullis - Session-Gated API Gateway
//!
//! This crate fronts a document store with a small versioned REST API,
//! cookie-based sessions backed by a cache and a self-healing database
//! connection.

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
