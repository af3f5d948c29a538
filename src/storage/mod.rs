//! Storage Layer - SQLite-backed persistence
//!
//! System of record is SQLite with one table:
//! - teas(id, name, type, price, quantity, image)
//!
//! All access goes through [`TeaStore`], addressed by content URIs.

pub mod cursor;
pub mod schema;
pub mod selection;
pub mod sqlite;

pub use cursor::{TeaCursor, TeaRow};
pub use selection::{Direction, Selection, SortOrder};
pub use sqlite::{InventoryStats, TeaStore};
