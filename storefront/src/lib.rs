// storefront/src/lib.rs

//! Storefront backend: catalog search, guest and user carts, checkout and
//! order history over a JSON HTTP API.

pub mod config;
pub mod errors;
pub mod identity;
pub mod models;
pub mod pipelines;
pub mod seed;
pub mod services;
pub mod state;
pub mod store;
pub mod web;
pub mod workflow;

pub use errors::{AppError, Result};
pub use state::AppState;
