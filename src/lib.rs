//! # Sensorlog
//!
//! Sensor reading service - records per-device sensor readings and answers
//! aggregate queries (max, median, mean, quartiles, per-device summary) over
//! optional type and time filters.
//!
//! ## Modules
//!
//! - [`storage`]: SQLite-backed reading store
//! - [`query`]: Filter composition, per-device reads, statistics, summary
//! - [`api`]: REST API server with Axum
//! - [`config`]: TOML + environment configuration
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sensorlog::query::{summarize, ReadingQueryService};
//! use sensorlog::storage::{Reading, ReadingFilter, ReadingStore, SensorType};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = ReadingStore::open("./sensorlog_data/readings.db")?;
//!     let service = ReadingQueryService::new(&store);
//!
//!     service.record(&Reading::new("device-1", SensorType::Temperature, 22))?;
//!     service.record(&Reading::new("device-1", SensorType::Temperature, 50))?;
//!
//!     let filter = ReadingFilter::new().sensor_type(SensorType::Temperature);
//!     println!("median: {}", service.median("device-1", &filter)?);
//!
//!     for device in summarize(&store, &ReadingFilter::new())? {
//!         println!("{}: {} readings", device.device_uuid, device.number_of_readings);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod query;
pub mod storage;

// Re-export top-level types for convenience
pub use storage::{
    Reading, ReadingFilter, ReadingStore, SensorType, SqlQuery, StorageError, StorageResult,
};

pub use query::{
    summarize, DeviceSummary, FilterBuilder, Quartiles, QueryError, QueryResult, QueryShape,
    ReadingQueryService, StatsError,
};

pub use api::{build_router, serve, ApiError, AppState};

pub use config::{ApiConfig, Config, ConfigError, LoggingConfig, StorageConfig};
