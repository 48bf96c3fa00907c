//! Data module - CSV loading, joining, filtering and aggregation

pub mod export;
mod filter;
mod loader;
mod processor;
mod records;

pub use filter::FilterState;
pub use loader::{DataLoader, LoadError};
pub use processor::DataProcessor;
pub use records::{columns, AggregateRow, JoinedRecord, JoinedTable};
