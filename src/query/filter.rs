//! Filter Builder
//!
//! Composes the optional type/time constraints of a [`ReadingFilter`] onto a
//! base query shape. Every constraint is ANDed and bound as a parameter.
//!
//! ```text
//! base shape (device-scoped or global)
//!   + AND type = ?          (if type)
//!   + AND date_created >= ? (if start)
//!   + AND date_created <= ? (if end)
//!   + ORDER BY ...          (shape-specific)
//! ```

use crate::storage::{ReadingFilter, SensorType, SqlQuery, READING_COLUMNS};

/// What a query returns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryShape {
    /// Full readings, oldest first
    All,
    /// `MAX(value)` as a single scalar
    Max,
    /// Bare `value` column
    Values,
    /// `(device_uuid, value)` pairs across all devices
    DeviceValues,
}

impl QueryShape {
    fn select(&self) -> String {
        match self {
            Self::All => format!("SELECT {} FROM readings", READING_COLUMNS),
            Self::Max => "SELECT MAX(value) FROM readings".to_string(),
            Self::Values => "SELECT value FROM readings".to_string(),
            Self::DeviceValues => "SELECT device_uuid, value FROM readings".to_string(),
        }
    }

    fn order_by(&self) -> &'static str {
        match self {
            Self::All => " ORDER BY date_created, rowid",
            Self::Max => "",
            Self::Values => " ORDER BY rowid",
            Self::DeviceValues => " ORDER BY device_uuid, rowid",
        }
    }
}

/// Incrementally adds constraints to a base query
///
/// The individual steps commute: any order of `sensor_type`, `since` and
/// `until` selects the same rows.
#[derive(Debug, Clone)]
pub struct FilterBuilder {
    shape: QueryShape,
    query: SqlQuery,
}

impl FilterBuilder {
    /// Start from a base query scoped to one device
    pub fn for_device(shape: QueryShape, device_uuid: &str) -> Self {
        Self {
            shape,
            query: SqlQuery::new(shape.select()).bind(" WHERE device_uuid = ?", device_uuid),
        }
    }

    /// Start from a base query over every device
    pub fn global(shape: QueryShape) -> Self {
        Self {
            shape,
            query: SqlQuery::new(shape.select()).push(" WHERE 1 = 1"),
        }
    }

    /// Only readings of this sensor type
    pub fn sensor_type(mut self, sensor_type: SensorType) -> Self {
        self.query = self.query.bind(" AND type = ?", sensor_type.as_str());
        self
    }

    /// Only readings at or after `start`
    pub fn since(mut self, start: i64) -> Self {
        self.query = self.query.bind(" AND date_created >= ?", start);
        self
    }

    /// Only readings at or before `end`
    pub fn until(mut self, end: i64) -> Self {
        self.query = self.query.bind(" AND date_created <= ?", end);
        self
    }

    /// Apply every constraint present in `filter`
    pub fn apply(self, filter: &ReadingFilter) -> Self {
        let mut builder = self;
        if let Some(sensor_type) = filter.sensor_type {
            builder = builder.sensor_type(sensor_type);
        }
        if let Some(start) = filter.start {
            builder = builder.since(start);
        }
        if let Some(end) = filter.end {
            builder = builder.until(end);
        }
        builder
    }

    /// Finish the query with the shape's ordering
    pub fn build(self) -> SqlQuery {
        self.query.push(self.shape.order_by())
    }
}

/// Compose `filter` onto the base query for `shape`
///
/// `device_uuid = None` produces an unscoped (all devices) query.
pub fn compose(shape: QueryShape, device_uuid: Option<&str>, filter: &ReadingFilter) -> SqlQuery {
    let builder = match device_uuid {
        Some(device) => FilterBuilder::for_device(shape, device),
        None => FilterBuilder::global(shape),
    };
    builder.apply(filter).build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{reading_from_row, Reading, ReadingStore, SqlParam};

    #[test]
    fn test_empty_filter_adds_nothing() {
        let query = compose(QueryShape::Values, Some("dev-1"), &ReadingFilter::new());

        assert_eq!(
            query.sql(),
            "SELECT value FROM readings WHERE device_uuid = ? ORDER BY rowid"
        );
        assert_eq!(query.params(), &[SqlParam::Text("dev-1".to_string())]);
    }

    #[test]
    fn test_full_filter_binds_every_value() {
        let filter = ReadingFilter::new()
            .sensor_type(SensorType::Temperature)
            .start(100)
            .end(200);
        let query = compose(QueryShape::Max, Some("dev-1"), &filter);

        assert_eq!(
            query.sql(),
            "SELECT MAX(value) FROM readings WHERE device_uuid = ? \
             AND type = ? AND date_created >= ? AND date_created <= ?"
        );
        assert_eq!(
            query.params(),
            &[
                SqlParam::Text("dev-1".to_string()),
                SqlParam::Text("temperature".to_string()),
                SqlParam::Integer(100),
                SqlParam::Integer(200),
            ]
        );
    }

    #[test]
    fn test_global_shape_is_unscoped() {
        let filter = ReadingFilter::new().end(50);
        let query = compose(QueryShape::DeviceValues, None, &filter);

        assert_eq!(
            query.sql(),
            "SELECT device_uuid, value FROM readings WHERE 1 = 1 \
             AND date_created <= ? ORDER BY device_uuid, rowid"
        );
        assert_eq!(query.params(), &[SqlParam::Integer(50)]);
    }

    #[test]
    fn test_device_uuid_is_never_interpolated() {
        let hostile = "x\" OR \"1\"=\"1";
        let query = compose(QueryShape::All, Some(hostile), &ReadingFilter::new());

        assert!(!query.sql().contains(hostile));

        let store = ReadingStore::open_in_memory().unwrap();
        store
            .insert(&Reading::with_timestamp("dev-1", SensorType::Humidity, 1, 1))
            .unwrap();
        let rows = store.query(&query, reading_from_row).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_constraint_order_does_not_change_rows() {
        let store = ReadingStore::open_in_memory().unwrap();
        for (i, sensor_type) in [SensorType::Temperature, SensorType::Humidity]
            .iter()
            .cycle()
            .take(20)
            .enumerate()
        {
            store
                .insert(&Reading::with_timestamp("dev-1", *sensor_type, i as i64, i as i64 * 10))
                .unwrap();
        }

        let base = || FilterBuilder::for_device(QueryShape::All, "dev-1");
        let orders = [
            base().sensor_type(SensorType::Humidity).since(30).until(150).build(),
            base().until(150).since(30).sensor_type(SensorType::Humidity).build(),
            base().since(30).sensor_type(SensorType::Humidity).until(150).build(),
        ];

        let expected = store.query(&orders[0], reading_from_row).unwrap();
        assert_eq!(
            expected.iter().map(|r| r.value).collect::<Vec<_>>(),
            vec![3, 5, 7, 9, 11, 13, 15]
        );
        for query in &orders[1..] {
            assert_eq!(store.query(query, reading_from_row).unwrap(), expected);
        }
    }

    #[test]
    fn test_bounds_are_inclusive_and_inverted_range_is_empty() {
        let store = ReadingStore::open_in_memory().unwrap();
        for ts in [10, 20, 30] {
            store
                .insert(&Reading::with_timestamp("dev-1", SensorType::Temperature, ts, ts))
                .unwrap();
        }

        let inclusive = compose(QueryShape::Values, Some("dev-1"), &ReadingFilter::new().start(10).end(20));
        let values = store.query(&inclusive, |row| row.get::<_, i64>(0)).unwrap();
        assert_eq!(values, vec![10, 20]);

        let inverted = compose(QueryShape::Values, Some("dev-1"), &ReadingFilter::new().start(30).end(10));
        let values = store.query(&inverted, |row| row.get::<_, i64>(0)).unwrap();
        assert!(values.is_empty());
    }
}
