//! Subway line server.
//!
//! Manages transit lines as chains of stations joined by distance-weighted
//! sections, and serves them over a JSON HTTP API.

pub mod config;
pub mod domain;
pub mod service;
pub mod store;
pub mod web;
