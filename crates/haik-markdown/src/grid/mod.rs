//! Twelve-unit grid layout model.
//!
//! Shared by layout plugins that split a block body into columns. The model
//! knows nothing about invocation syntax.

mod attrs;
mod column;
mod row;

pub use attrs::{ClassList, StyleList};
pub use column::Column;
pub use row::Row;

/// Number of width units a row holds.
pub const COLUMN_CAPACITY: u32 = 12;
