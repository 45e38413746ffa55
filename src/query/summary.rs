//! Summary Aggregator
//!
//! Applies a filter across every device, groups the surviving readings by
//! device and reports count, max, median, mean and quartiles per group.
//! Devices are ordered by descending reading count, ties by device id.

use crate::query::error::{QueryResult, StatsError};
use crate::query::filter::{compose, QueryShape};
use crate::query::stats;
use crate::storage::{ReadingFilter, ReadingStore};
use serde::Serialize;
use std::collections::BTreeMap;

/// Per-device rollup
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceSummary {
    pub device_uuid: String,
    pub number_of_readings: usize,
    pub max_reading_value: i64,
    pub median_reading_value: f64,
    pub mean_reading_value: f64,
    pub quartile_1_value: f64,
    pub quartile_3_value: f64,
}

/// Readings of one device that survived the filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceGroup {
    pub device_uuid: String,
    pub values: Vec<i64>,
}

impl DeviceGroup {
    /// Reduce the group to its summary. Groups are never empty.
    pub fn summarize(&self) -> QueryResult<DeviceSummary> {
        let quartiles = stats::quartiles(&self.values)?;
        let max = self
            .values
            .iter()
            .copied()
            .max()
            .ok_or(StatsError::EmptyInput)?;

        Ok(DeviceSummary {
            device_uuid: self.device_uuid.clone(),
            number_of_readings: self.values.len(),
            max_reading_value: max,
            median_reading_value: stats::median(&self.values)?,
            mean_reading_value: stats::mean(&self.values)?,
            quartile_1_value: quartiles.quartile_1,
            quartile_3_value: quartiles.quartile_3,
        })
    }
}

/// Group `(device_uuid, value)` rows, preserving duplicates
pub fn group_by_device(rows: impl IntoIterator<Item = (String, i64)>) -> Vec<DeviceGroup> {
    let mut groups: BTreeMap<String, Vec<i64>> = BTreeMap::new();
    for (device_uuid, value) in rows {
        groups.entry(device_uuid).or_default().push(value);
    }

    groups
        .into_iter()
        .map(|(device_uuid, values)| DeviceGroup {
            device_uuid,
            values,
        })
        .collect()
}

/// Summaries for every device with at least one matching reading
pub fn summarize(store: &ReadingStore, filter: &ReadingFilter) -> QueryResult<Vec<DeviceSummary>> {
    let query = compose(QueryShape::DeviceValues, None, filter);
    let rows = store.query(&query, |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)))?;

    let mut summaries = group_by_device(rows)
        .iter()
        .map(DeviceGroup::summarize)
        .collect::<QueryResult<Vec<_>>>()?;

    // stable: equal counts keep device_uuid order from the BTreeMap
    summaries.sort_by(|a, b| b.number_of_readings.cmp(&a.number_of_readings));

    tracing::debug!(devices = summaries.len(), "Computed reading summary");
    Ok(summaries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{Reading, SensorType};

    fn store_with(rows: &[(&str, SensorType, i64, i64)]) -> ReadingStore {
        let store = ReadingStore::open_in_memory().unwrap();
        for &(device, sensor_type, value, ts) in rows {
            store
                .insert(&Reading::with_timestamp(device, sensor_type, value, ts))
                .unwrap();
        }
        store
    }

    #[test]
    fn test_summary_two_devices() {
        let store = store_with(&[
            ("d2", SensorType::Temperature, 22, 5),
            ("d1", SensorType::Humidity, 22, 1),
            ("d1", SensorType::Temperature, 22, 2),
            ("d1", SensorType::Temperature, 50, 3),
            ("d1", SensorType::Temperature, 100, 4),
        ]);

        let summary = summarize(&store, &ReadingFilter::new()).unwrap();

        assert_eq!(
            summary,
            vec![
                DeviceSummary {
                    device_uuid: "d1".to_string(),
                    number_of_readings: 4,
                    max_reading_value: 100,
                    median_reading_value: 36.0,
                    mean_reading_value: 48.5,
                    quartile_1_value: 22.0,
                    quartile_3_value: 62.5,
                },
                DeviceSummary {
                    device_uuid: "d2".to_string(),
                    number_of_readings: 1,
                    max_reading_value: 22,
                    median_reading_value: 22.0,
                    mean_reading_value: 22.0,
                    quartile_1_value: 22.0,
                    quartile_3_value: 22.0,
                },
            ]
        );
    }

    #[test]
    fn test_summary_filter_omits_devices_without_rows() {
        let store = store_with(&[
            ("d1", SensorType::Humidity, 30, 1),
            ("d1", SensorType::Temperature, 40, 2),
            ("d2", SensorType::Temperature, 50, 3),
            ("d2", SensorType::Temperature, 60, 4),
        ]);

        let humidity = summarize(&store, &ReadingFilter::new().sensor_type(SensorType::Humidity))
            .unwrap();
        assert_eq!(humidity.len(), 1);
        assert_eq!(humidity[0].device_uuid, "d1");
        assert_eq!(humidity[0].number_of_readings, 1);

        let late = summarize(&store, &ReadingFilter::new().start(3)).unwrap();
        assert_eq!(late.len(), 1);
        assert_eq!(late[0].device_uuid, "d2");
        assert_eq!(late[0].max_reading_value, 60);
    }

    #[test]
    fn test_summary_empty_store_and_inverted_range() {
        let store = store_with(&[("d1", SensorType::Humidity, 30, 10)]);

        assert!(summarize(&ReadingStore::open_in_memory().unwrap(), &ReadingFilter::new())
            .unwrap()
            .is_empty());
        assert!(summarize(&store, &ReadingFilter::new().start(20).end(5))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_summary_ties_ordered_by_device() {
        let store = store_with(&[
            ("c", SensorType::Humidity, 1, 1),
            ("a", SensorType::Humidity, 1, 1),
            ("b", SensorType::Humidity, 1, 1),
            ("b", SensorType::Humidity, 2, 2),
        ]);

        let order: Vec<String> = summarize(&store, &ReadingFilter::new())
            .unwrap()
            .into_iter()
            .map(|s| s.device_uuid)
            .collect();
        assert_eq!(order, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_group_by_device_keeps_duplicates() {
        let groups = group_by_device(vec![
            ("x".to_string(), 5),
            ("y".to_string(), 1),
            ("x".to_string(), 5),
        ]);

        assert_eq!(
            groups,
            vec![
                DeviceGroup { device_uuid: "x".to_string(), values: vec![5, 5] },
                DeviceGroup { device_uuid: "y".to_string(), values: vec![1] },
            ]
        );
    }
}
