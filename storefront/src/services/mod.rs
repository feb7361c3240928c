// storefront/src/services/mod.rs

//! Application services called by the HTTP handlers.

pub mod auth_service;
pub mod cart_service;
pub mod catalog_service;
pub mod order_service;
