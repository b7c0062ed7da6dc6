use rusqlite::types::{ToSql, ToSqlOutput, Value};
use std::collections::HashMap;
use std::fmt;

/// A scalar bind value, matched positionally to a `$N` placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Bool(bool),
    Integer(i64),
    Real(f64),
    Text(String),
}

impl SqlValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            SqlValue::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }
}

impl ToSql for SqlValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        let value = match self {
            SqlValue::Null => Value::Null,
            SqlValue::Bool(value) => Value::Integer(*value as i64),
            SqlValue::Integer(value) => Value::Integer(*value),
            SqlValue::Real(value) => Value::Real(*value),
            SqlValue::Text(value) => Value::Text(value.clone()),
        };

        Ok(ToSqlOutput::Owned(value))
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_owned())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Integer(value)
    }
}

impl From<f64> for SqlValue {
    fn from(value: f64) -> Self {
        SqlValue::Real(value)
    }
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        SqlValue::Bool(value)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(SqlValue::Null)
    }
}

/// Fields a caller wants to change, in the order the caller supplied them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdatePayload {
    fields: Vec<(String, SqlValue)>,
}

impl UpdatePayload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push<K: Into<String>, V: Into<SqlValue>>(&mut self, field: K, value: V) {
        self.fields.push((field.into(), value.into()));
    }

    /// First value stored under `field`, if any.
    pub fn get(&self, field: &str) -> Option<&SqlValue> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SqlValue)> {
        self.fields
            .iter()
            .map(|(field, value)| (field.as_str(), value))
    }
}

impl<K: Into<String>, V: Into<SqlValue>> std::iter::FromIterator<(K, V)> for UpdatePayload {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut payload = UpdatePayload::new();
        for (field, value) in iter {
            payload.push(field, value);
        }
        payload
    }
}

/// Translation from application field names to column names. Lookups are
/// exact; fields without an entry keep their own name.
#[derive(Debug, Clone, Default)]
pub struct ColumnMapping {
    columns: HashMap<String, String>,
}

impl ColumnMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<K: Into<String>, V: Into<String>>(mut self, field: K, column: V) -> Self {
        self.columns.insert(field.into(), column.into());
        self
    }

    pub fn resolve<'a>(&'a self, field: &'a str) -> &'a str {
        self.columns
            .get(field)
            .map(String::as_str)
            .unwrap_or(field)
    }
}

impl<K: Into<String>, V: Into<String>> std::iter::FromIterator<(K, V)> for ColumnMapping {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(ColumnMapping::new(), |mapping, (field, column)| {
                mapping.with(field, column)
            })
    }
}

/// The `SET` part of an UPDATE statement plus its bind values.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlFragment {
    assignments: String,
    values: Vec<SqlValue>,
}

impl SqlFragment {
    /// `"col1"=$1, "col2"=$2, ...`
    pub fn assignments(&self) -> &str {
        &self.assignments
    }

    pub fn values(&self) -> &[SqlValue] {
        &self.values
    }

    /// Placeholder index available to the caller for its own WHERE clause.
    pub fn next_placeholder(&self) -> usize {
        self.values.len() + 1
    }

    pub fn into_values(self) -> Vec<SqlValue> {
        self.values
    }
}

impl fmt::Display for SqlFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.assignments)
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum InvalidUpdate {
    #[error("No data")]
    Empty,

    #[error("Column \"{}\" is assigned more than once", column)]
    DuplicateColumn { column: String },
}

/// Builds the column assignments for a partial UPDATE.
///
/// Columns follow the payload's order and are numbered from `$1`. Values are
/// never interpolated into the clause, only column names, so the mapping and
/// payload keys must come from a known set of fields.
pub fn sql_for_partial_update(
    payload: &UpdatePayload,
    mapping: &ColumnMapping,
) -> Result<SqlFragment, InvalidUpdate> {
    if payload.is_empty() {
        return Err(InvalidUpdate::Empty);
    }

    let mut columns: Vec<&str> = Vec::with_capacity(payload.len());
    let mut values = Vec::with_capacity(payload.len());

    for (field, value) in payload.iter() {
        let column = mapping.resolve(field);
        if columns.contains(&column) {
            return Err(InvalidUpdate::DuplicateColumn {
                column: column.to_owned(),
            });
        }

        columns.push(column);
        values.push(value.clone());
    }

    let assignments = columns
        .iter()
        .enumerate()
        .map(|(idx, column)| format!("\"{}\"=${}", column, idx + 1))
        .collect::<Vec<String>>()
        .join(", ");

    Ok(SqlFragment {
        assignments,
        values,
    })
}
