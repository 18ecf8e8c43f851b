//! # Sustainability Dashboard Backend
//!
//! Building sustainability dashboard: browse a roster of buildings, inspect
//! one building's averages, trends and sustainability score, and run what-if
//! simulations by editing metric values.
//!
//! The crate computes no domain values itself. Averages, trends, scores and
//! costs all come from two external services (buildings and sustainability);
//! this crate fetches, normalises, holds the editable page state and composes
//! what the browser renders. An axum server exposes it as a REST API.
//!
//! ## Architecture
//!
//! - [`api`]: identifiers and re-exported DTOs
//! - [`models`]: wire and domain types (metrics, buildings, scores, trends)
//! - [`gateway`]: typed access to the backend services, HTTP and in-memory
//! - [`services`]: detail loads, trend normalisation, simulation state machine,
//!   sessions and view composition
//! - [`http`]: Axum-based HTTP server and request handlers

// GatewayError carries a structured context for every failure
#![allow(clippy::result_large_err)]

pub mod api;
pub mod gateway;
pub mod models;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;

#[cfg(test)]
#[path = "api_tests.rs"]
mod api_tests;
