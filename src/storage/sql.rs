//! Parameterized SQL
//!
//! A `SqlQuery` is SQL text with `?` placeholders plus the values bound to
//! them, in order. Values never appear in the text.

use rusqlite::types::{ToSql, ToSqlOutput};

/// A value bound to a `?` placeholder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlParam {
    Text(String),
    Integer(i64),
}

impl ToSql for SqlParam {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match self {
            SqlParam::Text(s) => s.to_sql(),
            SqlParam::Integer(i) => i.to_sql(),
        }
    }
}

impl From<&str> for SqlParam {
    fn from(s: &str) -> Self {
        SqlParam::Text(s.to_string())
    }
}

impl From<String> for SqlParam {
    fn from(s: String) -> Self {
        SqlParam::Text(s)
    }
}

impl From<i64> for SqlParam {
    fn from(i: i64) -> Self {
        SqlParam::Integer(i)
    }
}

/// SQL text plus its bound parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlQuery {
    sql: String,
    params: Vec<SqlParam>,
}

impl SqlQuery {
    /// Create a query with no parameters
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    /// Builder method: append a fragment containing exactly one `?`
    pub fn bind(mut self, fragment: &str, param: impl Into<SqlParam>) -> Self {
        debug_assert_eq!(fragment.matches('?').count(), 1);
        self.sql.push_str(fragment);
        self.params.push(param.into());
        self
    }

    /// Builder method: append a fragment without parameters
    pub fn push(mut self, fragment: &str) -> Self {
        self.sql.push_str(fragment);
        self
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[SqlParam] {
        &self.params
    }
}

impl std::fmt::Display for SqlQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {:?}", self.sql, self.params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_keeps_values_out_of_text() {
        let query = SqlQuery::new("SELECT value FROM readings")
            .bind(" WHERE device_uuid = ?", "dev-1")
            .bind(" AND type = ?", "humidity\" OR 1=1 --")
            .push(" ORDER BY rowid");

        assert_eq!(
            query.sql(),
            "SELECT value FROM readings WHERE device_uuid = ? AND type = ? ORDER BY rowid"
        );
        assert_eq!(
            query.params(),
            &[
                SqlParam::Text("dev-1".to_string()),
                SqlParam::Text("humidity\" OR 1=1 --".to_string()),
            ]
        );
    }
}
