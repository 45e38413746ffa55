//! Core data types for the reading store
//!
//! This module defines the fundamental types used throughout the service:
//! - `Reading`: A single sensor observation for a device
//! - `SensorType`: The fixed set of sensor kinds
//! - `ReadingFilter`: Optional type/time constraints for a query

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A single sensor reading
///
/// Immutable once stored. The timestamp is serialized as `date_created`
/// to match the table column.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Reading {
    /// Device that produced the reading
    pub device_uuid: String,
    /// Sensor kind
    #[serde(rename = "type")]
    pub sensor_type: SensorType,
    /// Measured value
    pub value: i64,
    /// Unix timestamp in seconds
    #[serde(rename = "date_created")]
    pub timestamp: i64,
}

impl Reading {
    /// Create a reading stamped with the current time
    pub fn new(device_uuid: impl Into<String>, sensor_type: SensorType, value: i64) -> Self {
        Self {
            device_uuid: device_uuid.into(),
            sensor_type,
            value,
            timestamp: Utc::now().timestamp(),
        }
    }

    /// Create a reading with a specific timestamp
    pub fn with_timestamp(
        device_uuid: impl Into<String>,
        sensor_type: SensorType,
        value: i64,
        timestamp: i64,
    ) -> Self {
        Self {
            device_uuid: device_uuid.into(),
            sensor_type,
            value,
            timestamp,
        }
    }
}

/// Kind of sensor that produced a reading
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SensorType {
    Temperature,
    Humidity,
}

impl SensorType {
    /// Name as stored in the `type` column
    pub fn as_str(&self) -> &'static str {
        match self {
            SensorType::Temperature => "temperature",
            SensorType::Humidity => "humidity",
        }
    }
}

impl std::fmt::Display for SensorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SensorType {
    type Err = String;

    /// Exact, case-sensitive match against the stored names
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "temperature" => Ok(SensorType::Temperature),
            "humidity" => Ok(SensorType::Humidity),
            other => Err(format!(
                "Invalid sensor type: {}. Use temperature or humidity",
                other
            )),
        }
    }
}

/// Optional constraints applied to a reading query
///
/// All fields are independent; an absent field imposes no constraint.
/// `start > end` is allowed and simply matches nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadingFilter {
    /// Only readings of this sensor type
    pub sensor_type: Option<SensorType>,
    /// Inclusive lower bound on the timestamp (epoch seconds)
    pub start: Option<i64>,
    /// Inclusive upper bound on the timestamp (epoch seconds)
    pub end: Option<i64>,
}

impl ReadingFilter {
    /// Create an empty filter (matches everything)
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: restrict to a sensor type
    pub fn sensor_type(mut self, sensor_type: SensorType) -> Self {
        self.sensor_type = Some(sensor_type);
        self
    }

    /// Builder method: set the inclusive lower bound
    pub fn start(mut self, start: i64) -> Self {
        self.start = Some(start);
        self
    }

    /// Builder method: set the inclusive upper bound
    pub fn end(mut self, end: i64) -> Self {
        self.end = Some(end);
        self
    }
}
