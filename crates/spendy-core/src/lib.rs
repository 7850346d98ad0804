//! spendy-core
//!
//! Reporting logic and services for spendy.
//! Depends on spendy-domain. No CLI, no terminal I/O, no direct filesystem access.

pub mod aggregation;
pub mod error;
pub mod filter;
pub mod memory_store;
pub mod monthly;
pub mod pagination;
pub mod session;
pub mod storage;
pub mod summary_service;
pub mod time;
pub mod transaction_service;

pub use aggregation::*;
pub use error::{CoreError, StoreError};
pub use filter::*;
pub use memory_store::MemoryStore;
pub use monthly::*;
pub use pagination::*;
pub use session::*;
pub use storage::TransactionStore;
pub use summary_service::*;
pub use time::{Clock, FixedClock};
pub use transaction_service::*;

#[cfg(test)]
mod tests;
