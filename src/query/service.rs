//! Reading Query Service
//!
//! Per-device reads over the reading store. Each call composes a fresh query
//! from the filter and runs it; nothing is cached between calls.

use crate::query::error::{QueryError, QueryResult};
use crate::query::filter::{compose, QueryShape};
use crate::query::stats::{self, Quartiles};
use crate::storage::{reading_from_row, Reading, ReadingFilter, ReadingStore};

/// Rows returned by [`ReadingQueryService::fetch`]
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched {
    Readings(Vec<Reading>),
    Max(Option<i64>),
    Values(Vec<i64>),
}

/// Query service borrowing a store handle
#[derive(Debug, Clone, Copy)]
pub struct ReadingQueryService<'a> {
    store: &'a ReadingStore,
}

impl<'a> ReadingQueryService<'a> {
    pub fn new(store: &'a ReadingStore) -> Self {
        Self { store }
    }

    /// Append a reading
    pub fn record(&self, reading: &Reading) -> QueryResult<()> {
        self.store.insert(reading)?;
        tracing::info!(
            device_uuid = %reading.device_uuid,
            sensor_type = %reading.sensor_type,
            value = reading.value,
            "Recorded reading"
        );
        Ok(())
    }

    /// Run one of the per-device shapes
    ///
    /// `QueryShape::DeviceValues` spans every device and is rejected with
    /// `UnsupportedShape`; the summary aggregator runs it instead.
    pub fn fetch(
        &self,
        device_uuid: &str,
        shape: QueryShape,
        filter: &ReadingFilter,
    ) -> QueryResult<Fetched> {
        Ok(match shape {
            QueryShape::All => Fetched::Readings(self.all(device_uuid, filter)?),
            QueryShape::Max => Fetched::Max(self.max(device_uuid, filter)?),
            QueryShape::Values => Fetched::Values(self.values(device_uuid, filter)?),
            QueryShape::DeviceValues => return Err(QueryError::UnsupportedShape(shape)),
        })
    }

    /// Every matching reading, oldest first. Empty when nothing matches.
    pub fn all(&self, device_uuid: &str, filter: &ReadingFilter) -> QueryResult<Vec<Reading>> {
        let query = compose(QueryShape::All, Some(device_uuid), filter);
        Ok(self.store.query(&query, reading_from_row)?)
    }

    /// Largest matching value, `None` when nothing matches
    pub fn max(&self, device_uuid: &str, filter: &ReadingFilter) -> QueryResult<Option<i64>> {
        let query = compose(QueryShape::Max, Some(device_uuid), filter);
        let rows = self
            .store
            .query(&query, |row| row.get::<_, Option<i64>>(0))?;
        Ok(rows.into_iter().next().flatten())
    }

    /// Bare values of every matching reading
    pub fn values(&self, device_uuid: &str, filter: &ReadingFilter) -> QueryResult<Vec<i64>> {
        let query = compose(QueryShape::Values, Some(device_uuid), filter);
        Ok(self.store.query(&query, |row| row.get::<_, i64>(0))?)
    }

    /// Largest matching value, or `NoData`
    pub fn require_max(&self, device_uuid: &str, filter: &ReadingFilter) -> QueryResult<i64> {
        self.max(device_uuid, filter)?
            .ok_or_else(|| QueryError::NoData(format!("no readings for device {}", device_uuid)))
    }

    pub fn median(&self, device_uuid: &str, filter: &ReadingFilter) -> QueryResult<f64> {
        Ok(stats::median(&self.values(device_uuid, filter)?)?)
    }

    pub fn mean(&self, device_uuid: &str, filter: &ReadingFilter) -> QueryResult<f64> {
        Ok(stats::mean(&self.values(device_uuid, filter)?)?)
    }

    pub fn quartiles(&self, device_uuid: &str, filter: &ReadingFilter) -> QueryResult<Quartiles> {
        Ok(stats::quartiles(&self.values(device_uuid, filter)?)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::error::StatsError;
    use crate::storage::SensorType;

    const NOW: i64 = 1_700_000_000;

    /// Mirrors a typical device: one humidity and three temperature readings
    fn seeded_store() -> ReadingStore {
        let store = ReadingStore::open_in_memory().unwrap();
        let rows = [
            ("test_device", SensorType::Humidity, 22, NOW - 200),
            ("test_device", SensorType::Temperature, 22, NOW - 100),
            ("test_device", SensorType::Temperature, 50, NOW - 50),
            ("test_device", SensorType::Temperature, 100, NOW),
            ("other_uuid", SensorType::Temperature, 22, NOW),
        ];
        for (device, sensor_type, value, ts) in rows {
            store
                .insert(&Reading::with_timestamp(device, sensor_type, value, ts))
                .unwrap();
        }
        store
    }

    fn temperature() -> ReadingFilter {
        ReadingFilter::new().sensor_type(SensorType::Temperature)
    }

    #[test]
    fn test_all_readings_for_device() {
        let store = seeded_store();
        let service = ReadingQueryService::new(&store);

        let readings = service.all("test_device", &ReadingFilter::new()).unwrap();
        assert_eq!(readings.len(), 4);
        assert!(readings.iter().all(|r| r.device_uuid == "test_device"));
        assert!(readings.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    }

    #[test]
    fn test_all_filtered_by_type_and_range() {
        let store = seeded_store();
        let service = ReadingQueryService::new(&store);

        let humidity = service
            .all("test_device", &ReadingFilter::new().sensor_type(SensorType::Humidity))
            .unwrap();
        assert_eq!(humidity.len(), 1);
        assert_eq!(humidity[0].sensor_type, SensorType::Humidity);

        let recent = service
            .all("test_device", &temperature().start(NOW - 50).end(NOW))
            .unwrap();
        assert_eq!(recent.iter().map(|r| r.value).collect::<Vec<_>>(), vec![50, 100]);
    }

    #[test]
    fn test_all_unknown_device_is_empty_not_error() {
        let store = seeded_store();
        let service = ReadingQueryService::new(&store);

        assert!(service.all("missing", &ReadingFilter::new()).unwrap().is_empty());
        assert!(service
            .all("test_device", &ReadingFilter::new().start(NOW).end(NOW - 200))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_record_then_list_includes_row() {
        let store = seeded_store();
        let service = ReadingQueryService::new(&store);

        let reading = Reading::with_timestamp("test_device", SensorType::Temperature, 77, NOW + 5);
        service.record(&reading).unwrap();

        let readings = service.all("test_device", &ReadingFilter::new()).unwrap();
        assert_eq!(readings.len(), 5);
        assert_eq!(readings.last(), Some(&reading));
    }

    #[test]
    fn test_max() {
        let store = seeded_store();
        let service = ReadingQueryService::new(&store);

        assert_eq!(service.max("test_device", &temperature()).unwrap(), Some(100));
        assert_eq!(
            service.max("test_device", &temperature().end(NOW - 60)).unwrap(),
            Some(22)
        );
        assert_eq!(service.max("missing", &temperature()).unwrap(), None);
        assert!(matches!(
            service.require_max("missing", &temperature()),
            Err(QueryError::NoData(_))
        ));
    }

    #[test]
    fn test_median_mean_quartiles() {
        let store = seeded_store();
        let service = ReadingQueryService::new(&store);

        assert_eq!(service.median("test_device", &temperature()).unwrap(), 50.0);
        assert_eq!(
            service.mean("test_device", &temperature()).unwrap(),
            172.0 / 3.0
        );

        let all = ReadingFilter::new();
        assert_eq!(service.median("test_device", &all).unwrap(), 36.0);
        assert_eq!(service.mean("test_device", &all).unwrap(), 48.5);
        assert_eq!(
            service.quartiles("test_device", &all).unwrap(),
            Quartiles { quartile_1: 22.0, quartile_3: 62.5 }
        );
    }

    #[test]
    fn test_statistics_without_rows_report_empty_input() {
        let store = seeded_store();
        let service = ReadingQueryService::new(&store);
        let filter = temperature();

        for result in [
            service.median("missing", &filter),
            service.mean("missing", &filter),
        ] {
            assert!(matches!(result, Err(QueryError::Stats(StatsError::EmptyInput))));
        }
        let err = service.quartiles("missing", &filter).unwrap_err();
        assert!(err.is_no_data());
    }

    #[test]
    fn test_fetch_dispatches_on_shape() {
        let store = seeded_store();
        let service = ReadingQueryService::new(&store);
        let filter = temperature();

        assert_eq!(
            service.fetch("test_device", QueryShape::Max, &filter).unwrap(),
            Fetched::Max(Some(100))
        );
        assert_eq!(
            service.fetch("test_device", QueryShape::Values, &filter).unwrap(),
            Fetched::Values(vec![22, 50, 100])
        );
        match service.fetch("test_device", QueryShape::All, &filter).unwrap() {
            Fetched::Readings(readings) => assert_eq!(readings.len(), 3),
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(
            service.fetch("test_device", QueryShape::DeviceValues, &filter),
            Err(QueryError::UnsupportedShape(QueryShape::DeviceValues))
        ));
    }
}
