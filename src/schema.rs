//! Request body and query validation.
//!
//! Create bodies deserialize into typed structs. Update bodies are read as
//! JSON objects in document order and checked field by field against an
//! allow-list, so only known fields ever reach the SQL builder as column names.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::errors::JoblyError;
use crate::sql::{SqlValue, UpdatePayload};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rule {
    /// Non-empty string.
    Text,
    /// Integer greater than or equal to zero.
    Count,
    /// Number between 0 and 1 inclusive.
    Fraction,
}

#[derive(Debug, Clone, Copy)]
pub struct Field {
    pub name: &'static str,
    pub rule: Rule,
    pub nullable: bool,
}

impl Field {
    pub const fn required(name: &'static str, rule: Rule) -> Self {
        Field {
            name,
            rule,
            nullable: false,
        }
    }

    pub const fn nullable(name: &'static str, rule: Rule) -> Self {
        Field {
            name,
            rule,
            nullable: true,
        }
    }

    fn check(&self, value: Value) -> Result<SqlValue, JoblyError> {
        match (value, self.rule) {
            (Value::Null, _) if self.nullable => Ok(SqlValue::Null),
            (Value::String(text), Rule::Text) => {
                check_text(self.name, &text)?;
                Ok(SqlValue::Text(text))
            }
            (Value::Number(number), Rule::Count) => {
                let count = number
                    .as_i64()
                    .ok_or_else(|| not_a(self.name, "integer"))?;
                check_count(self.name, count)?;
                Ok(SqlValue::Integer(count))
            }
            (Value::Number(number), Rule::Fraction) => {
                let fraction = number.as_f64().ok_or_else(|| not_a(self.name, "number"))?;
                check_fraction(self.name, fraction)?;
                Ok(SqlValue::Real(fraction))
            }
            (_, Rule::Text) => Err(not_a(self.name, "string")),
            (_, Rule::Count) => Err(not_a(self.name, "integer")),
            (_, Rule::Fraction) => Err(not_a(self.name, "number")),
        }
    }
}

fn not_a(field: &str, kind: &str) -> JoblyError {
    JoblyError::bad_request(format!("instance.{} is not of a type(s) {}", field, kind))
}

pub fn check_text(field: &str, value: &str) -> Result<(), JoblyError> {
    if value.is_empty() {
        return Err(JoblyError::bad_request(format!(
            "instance.{} does not meet minimum length of 1",
            field
        )));
    }
    Ok(())
}

pub fn check_lowercase(field: &str, value: &str) -> Result<(), JoblyError> {
    if value != value.to_lowercase() {
        return Err(JoblyError::bad_request(format!(
            "instance.{} must be lowercase",
            field
        )));
    }
    Ok(())
}

pub fn check_count(field: &str, value: i64) -> Result<(), JoblyError> {
    if value < 0 {
        return Err(JoblyError::bad_request(format!(
            "instance.{} must be greater than or equal to 0",
            field
        )));
    }
    Ok(())
}

pub fn check_fraction(field: &str, value: f64) -> Result<(), JoblyError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(JoblyError::bad_request(format!(
            "instance.{} must be between 0 and 1",
            field
        )));
    }
    Ok(())
}

/// Deserializes a create body, turning serde failures into bad requests.
pub fn parse<T: DeserializeOwned>(body: Value) -> Result<T, JoblyError> {
    serde_json::from_value(body).map_err(|err| JoblyError::bad_request(err.to_string()))
}

/// Checks a partial update body against `fields`, keeping the body's order.
pub fn update_payload(body: Value, fields: &[Field]) -> Result<UpdatePayload, JoblyError> {
    let object: Map<String, Value> = match body {
        Value::Object(object) => object,
        _ => return Err(JoblyError::bad_request("instance is not of a type(s) object")),
    };

    let mut payload = UpdatePayload::new();
    for (name, value) in object {
        let field = fields
            .iter()
            .find(|field| field.name == name)
            .ok_or_else(|| {
                JoblyError::bad_request(format!(
                    "instance is not allowed to have the additional property \"{}\"",
                    name
                ))
            })?;

        let value = field.check(value)?;
        payload.push(name, value);
    }

    Ok(payload)
}

/// Rejects query parameters outside `allowed`.
pub fn check_query_keys(
    query: &HashMap<String, String>,
    allowed: &[&str],
) -> Result<(), JoblyError> {
    match query.keys().find(|key| !allowed.contains(&key.as_str())) {
        Some(key) => Err(JoblyError::bad_request(format!(
            "instance is not allowed to have the additional property \"{}\"",
            key
        ))),
        None => Ok(()),
    }
}

pub fn query_count(
    query: &HashMap<String, String>,
    field: &str,
) -> Result<Option<i64>, JoblyError> {
    query
        .get(field)
        .map(|raw| {
            let count = raw.trim().parse::<i64>().map_err(|_| not_a(field, "integer"))?;
            check_count(field, count)?;
            Ok(count)
        })
        .transpose()
}

/// A flag is on when present, unless its value is `false`.
pub fn query_flag(query: &HashMap<String, String>, field: &str) -> bool {
    query
        .get(field)
        .map(|raw| !raw.eq_ignore_ascii_case("false"))
        .unwrap_or(false)
}
