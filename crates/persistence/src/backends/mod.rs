//! Storage backend implementations.
//!
//! # Available Backends
//!
//! | Backend | Feature | Stores |
//! |---------|---------|--------|
//! | In-memory | always | Catalog, accounts, ingredient documents |
//! | PostgreSQL | `postgres` | Catalog, accounts, loader scripts |
//! | MongoDB | `mongodb` | Ingredient documents |
//!
//! # Example
//!
//! ```
//! use medisae_persistence::backends::memory::{MemoryBackend, ProductRecord};
//!
//! let backend = MemoryBackend::new();
//! backend.insert_ingredient(1, "aspirin");
//! backend.insert_product(ProductRecord::new("Aspirin Upsa").ingredient(1));
//! ```

pub mod memory;

#[cfg(feature = "postgres")]
pub mod postgres;

#[cfg(feature = "mongodb")]
pub mod mongodb;
