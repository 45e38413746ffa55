//! Sensorlog Reading Store
//!
//! This module provides the storage layer for sensor readings:
//!
//! - **types**: Core data structures (Reading, SensorType, ReadingFilter)
//! - **sql**: Parameterized SQL text + bound values
//! - **store**: SQLite-backed append-only reading table
//! - **error**: Error types
//!
//! # Example
//!
//! ```rust,no_run
//! use sensorlog::storage::{Reading, ReadingStore, SensorType};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = ReadingStore::open("./sensorlog_data/readings.db")?;
//!
//!     store.insert(&Reading::new("device-1", SensorType::Temperature, 22))?;
//!     println!("{} readings stored", store.count()?);
//!
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod sql;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use error::{StorageError, StorageResult};
pub use sql::{SqlParam, SqlQuery};
pub use store::{reading_from_row, ReadingStore, READING_COLUMNS};
pub use types::{Reading, ReadingFilter, SensorType};
