//! HTTP request handlers.
//!
//! - [`pages`] - Home page and the 404 fallback
//! - [`search`] - Search page
//! - [`auth`] - Login, logout and registration
//! - [`ingredient`] - Active ingredient detail page
//! - [`health`] - Health check endpoints

pub mod auth;
pub mod health;
pub mod ingredient;
pub mod pages;
pub mod search;

// Re-export handlers for convenience
pub use auth::{
    login_handler, login_page_handler, logout_handler, register_handler, register_page_handler,
};
pub use health::{health_handler, liveness_handler, readiness_handler};
pub use ingredient::ingredient_handler;
pub use pages::{home_handler, not_found_handler};
pub use search::search_handler;
