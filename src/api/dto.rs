//! Data Transfer Objects
//!
//! Request and response types for the API endpoints, plus the boundary
//! validation that turns raw parameters into typed core values.

use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, ApiResult};
use crate::storage::{ReadingFilter, SensorType};

/// Inclusive range accepted for reading values
pub const VALUE_RANGE: std::ops::RangeInclusive<i64> = 0..=100;

// ============================================
// READING DTOs
// ============================================

/// Create reading request
#[derive(Debug, Clone, Deserialize)]
pub struct CreateReadingRequest {
    /// Sensor type: temperature or humidity
    #[serde(rename = "type")]
    pub sensor_type: String,
    /// Integer value in [0, 100]
    pub value: i64,
    /// Optional epoch seconds, defaults to now
    #[serde(default)]
    pub date_created: Option<i64>,
}

impl CreateReadingRequest {
    /// Validate the request, returning the parsed sensor type
    pub fn validate(&self) -> ApiResult<SensorType> {
        let sensor_type = parse_sensor_type(&self.sensor_type)?;

        if !VALUE_RANGE.contains(&self.value) {
            return Err(ApiError::Validation(format!(
                "Value must be in between {} to {}",
                VALUE_RANGE.start(),
                VALUE_RANGE.end()
            )));
        }

        Ok(sensor_type)
    }
}

/// Optional query parameters shared by the read endpoints
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReadingsParams {
    /// Sensor type: temperature or humidity
    #[serde(default, rename = "type")]
    pub sensor_type: Option<String>,
    /// Inclusive lower bound (epoch seconds)
    #[serde(default)]
    pub start: Option<i64>,
    /// Inclusive upper bound (epoch seconds)
    #[serde(default)]
    pub end: Option<i64>,
}

impl ReadingsParams {
    /// Build a filter; `type` may be omitted
    pub fn filter(&self) -> ApiResult<ReadingFilter> {
        let sensor_type = self
            .sensor_type
            .as_deref()
            .map(parse_sensor_type)
            .transpose()?;

        Ok(ReadingFilter {
            sensor_type,
            start: self.start,
            end: self.end,
        })
    }

    /// Build a filter; `type` is mandatory
    pub fn typed_filter(&self) -> ApiResult<ReadingFilter> {
        if self.sensor_type.is_none() {
            return Err(ApiError::Validation(
                "Missing required parameter: type".to_string(),
            ));
        }
        self.filter()
    }
}

fn parse_sensor_type(s: &str) -> ApiResult<SensorType> {
    s.parse().map_err(ApiError::Validation)
}

/// Single scalar response
#[derive(Debug, Serialize)]
pub struct ValueResponse<T> {
    pub value: T,
}

// ============================================
// HEALTH DTOs
// ============================================

/// Full health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall status: healthy or unhealthy
    pub status: String,
    /// Store status
    pub store: String,
    /// Number of stored readings, when the store answered
    #[serde(skip_serializing_if = "Option::is_none")]
    pub readings: Option<u64>,
    /// Server uptime in seconds
    pub uptime_seconds: u64,
    /// Application version
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(sensor_type: &str, value: i64) -> CreateReadingRequest {
        CreateReadingRequest {
            sensor_type: sensor_type.to_string(),
            value,
            date_created: None,
        }
    }

    #[test]
    fn test_validate_create_request() {
        assert_eq!(create("temperature", 0).validate().unwrap(), SensorType::Temperature);
        assert_eq!(create("humidity", 100).validate().unwrap(), SensorType::Humidity);
        assert!(create("humidity", 101).validate().is_err());
        assert!(create("humidity", -1).validate().is_err());
        assert!(create("pressure", 50).validate().is_err());
    }

    #[test]
    fn test_params_to_filter() {
        let params = ReadingsParams {
            sensor_type: Some("humidity".to_string()),
            start: Some(5),
            end: None,
        };
        assert_eq!(
            params.filter().unwrap(),
            ReadingFilter::new().sensor_type(SensorType::Humidity).start(5)
        );

        assert_eq!(ReadingsParams::default().filter().unwrap(), ReadingFilter::new());
        assert!(ReadingsParams::default().typed_filter().is_err());

        let bad = ReadingsParams {
            sensor_type: Some("HUMIDITY".to_string()),
            ..Default::default()
        };
        assert!(bad.filter().is_err());
    }
}
