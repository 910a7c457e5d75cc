//! Route configuration for the web application.
//!
//! This module contains the routing configuration that maps HTTP paths
//! to handlers.

pub mod page_routes;

pub use page_routes::create_routes;
