//! Knowledge categories and the in-memory catalog.
//!
//! ## Key Types
//!
//! - `Category`: Named knowledge domain, immutable once built
//! - `CategoryId`: Catalog-assigned identifier
//! - `CategoryCatalog`: Lookup of categories available to a session
//!
//! Categories are shared as `Arc<Category>` between the catalog, players
//! declaring them as expertise, and duels fought over them.

pub mod category;
pub mod catalog;

pub use category::{Category, CategoryId};
pub use catalog::CategoryCatalog;
