//! spendy-domain
//!
//! Pure domain models (Transaction, Category, Cents, identifiers).
//! No I/O, no CLI, no storage. Only data types and core enums.

pub mod category;
pub mod common;
pub mod money;
pub mod transaction;

pub use category::*;
pub use common::*;
pub use money::*;
pub use transaction::*;
