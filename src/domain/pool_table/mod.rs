//! Pool table aggregate

pub mod model;
pub mod repository;

pub use model::{PoolTable, TableStatus, MAX_TABLE_PRICE};
pub use repository::PoolTableRepository;
