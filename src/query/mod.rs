//! Sensorlog Query Layer
//!
//! Reads and reductions over the reading store:
//!
//! - **filter**: Compose type/time constraints onto a base query
//! - **service**: Per-device reads (all, max, values) and statistics
//! - **stats**: Median, mean and linear-interpolation quantiles
//! - **summary**: Per-device rollup across all devices
//!
//! # Pipeline
//!
//! ```text
//! ReadingFilter → FilterBuilder → SqlQuery → ReadingStore → values → stats
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use sensorlog::query::{summarize, ReadingQueryService};
//! use sensorlog::storage::{ReadingFilter, ReadingStore, SensorType};
//!
//! let store = ReadingStore::open_in_memory()?;
//! let filter = ReadingFilter::new().sensor_type(SensorType::Temperature);
//!
//! let service = ReadingQueryService::new(&store);
//! let median = service.median("device-1", &filter)?;
//! let report = summarize(&store, &ReadingFilter::new())?;
//! ```

mod error;
mod filter;
mod service;
pub mod stats;
mod summary;

pub use error::{QueryError, QueryResult, StatsError};
pub use filter::{compose, FilterBuilder, QueryShape};
pub use service::{Fetched, ReadingQueryService};
pub use stats::Quartiles;
pub use summary::{group_by_device, summarize, DeviceGroup, DeviceSummary};
