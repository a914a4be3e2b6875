//! Parameterized `WHERE` clause assembly.
//!
//! Filters are recorded as `(clause, value)` pairs. Clause templates are
//! `&'static str` with a single `{}` slot that becomes the dialect's
//! numbered placeholder, so caller input only ever travels as a bound value.

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::{ToSql, ToSqlOutput};

use crate::schedule::TimeRange;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    /// `$1, $2, ...` (PostgreSQL)
    Dollar,
    /// `?1, ?2, ...` (SQLite)
    Question,
}

impl Placeholder {
    fn render(self, index: usize) -> String {
        match self {
            Placeholder::Dollar => format!("${index}"),
            Placeholder::Question => format!("?{index}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Text(String),
    Timestamp(DateTime<Utc>),
}

/// SQLite keeps timestamps as fixed-width RFC 3339 text so that string
/// comparison orders them chronologically.
pub fn sqlite_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

impl ToSql for SqlValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match self {
            SqlValue::Text(text) => Ok(ToSqlOutput::from(text.as_str())),
            SqlValue::Timestamp(at) => Ok(ToSqlOutput::from(sqlite_timestamp(at))),
        }
    }
}

#[derive(Debug)]
pub struct QueryBuilder {
    select: &'static str,
    placeholder: Placeholder,
    clauses: Vec<String>,
    values: Vec<SqlValue>,
    order_by: Option<&'static str>,
}

impl QueryBuilder {
    /// `select` is everything up to (not including) the `WHERE` keyword.
    pub fn new(select: &'static str, placeholder: Placeholder) -> Self {
        Self {
            select,
            placeholder,
            clauses: Vec::new(),
            values: Vec::new(),
            order_by: None,
        }
    }

    pub fn filter(mut self, template: &'static str, value: SqlValue) -> Self {
        self.values.push(value);
        let slot = self.placeholder.render(self.values.len());
        self.clauses.push(template.replacen("{}", &slot, 1));
        self
    }

    pub fn filter_opt(self, template: &'static str, value: Option<SqlValue>) -> Self {
        match value {
            Some(value) => self.filter(template, value),
            None => self,
        }
    }

    /// Restrict `column` to `range`: `>=` the lower bound, `<` the upper.
    pub fn within(self, range: &TimeRange, lower: &'static str, upper: &'static str) -> Self {
        self.filter_opt(lower, range.from.map(SqlValue::Timestamp))
            .filter_opt(upper, range.until.map(SqlValue::Timestamp))
    }

    pub fn order_by(mut self, order_by: &'static str) -> Self {
        self.order_by = Some(order_by);
        self
    }

    pub fn build(self) -> (String, Vec<SqlValue>) {
        let mut sql = String::from(self.select.trim_end());
        if !self.clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.clauses.join(" AND "));
        }
        if let Some(order_by) = self.order_by {
            sql.push_str(" ORDER BY ");
            sql.push_str(order_by);
        }
        (sql, self.values)
    }
}

/// `%value%` pattern for a case-insensitive substring match.
pub fn contains_pattern(value: &str) -> SqlValue {
    SqlValue::Text(format!("%{value}%"))
}
