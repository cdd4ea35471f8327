//! Upsert input validation
//!
//! Rules are applied in a fixed order and the first failing rule decides
//! the error:
//! 1. body is a JSON object carrying both `city` and `population`
//! 2. `city` is not blank after trimming
//! 3. `population` is an integer (or something that parses as one)
//! 4. `population` is not negative
//!
//! Nothing here touches the document store.

use serde_json::{Map, Value};
use thiserror::Error;

use super::record::CityRecord;

/// Client input rejected before any backend call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid input. Required fields: 'city' and 'population'")]
    MissingFields,

    #[error("City name cannot be empty")]
    EmptyCity,

    #[error("Population must be a valid integer")]
    InvalidPopulation,

    #[error("Population must be non-negative")]
    NegativePopulation,
}

/// A validated upsert request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpsertInput {
    /// Trimmed city name, original casing
    pub city: String,
    pub population: u64,
}

impl UpsertInput {
    /// Validate a raw request body.
    ///
    /// An empty body, malformed JSON or a non-object document is treated
    /// the same as a body missing the required fields.
    pub fn from_body(body: &[u8]) -> Result<Self, ValidationError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(ValidationError::MissingFields);
        }
        let value: Value =
            serde_json::from_slice(body).map_err(|_| ValidationError::MissingFields)?;
        Self::from_value(&value)
    }

    /// Validate an already-decoded JSON document.
    pub fn from_value(value: &Value) -> Result<Self, ValidationError> {
        let fields = value.as_object().ok_or(ValidationError::MissingFields)?;
        let (city, population) = required_fields(fields)?;

        let city = city.trim();
        if city.is_empty() {
            return Err(ValidationError::EmptyCity);
        }

        let population = parse_population(population)?;
        if population < 0 {
            return Err(ValidationError::NegativePopulation);
        }

        Ok(Self {
            city: city.to_string(),
            population: population as u64,
        })
    }

    /// Document id this input will be written under
    pub fn key(&self) -> String {
        super::normalize_key(&self.city)
    }

    pub fn into_record(self) -> CityRecord {
        CityRecord::new(self.city, self.population)
    }
}

fn required_fields(fields: &Map<String, Value>) -> Result<(&str, &Value), ValidationError> {
    let city = fields
        .get("city")
        .and_then(Value::as_str)
        .ok_or(ValidationError::MissingFields)?;
    let population = fields
        .get("population")
        .ok_or(ValidationError::MissingFields)?;
    Ok((city, population))
}

/// Coerce a JSON value into a signed integer.
///
/// Integers pass through, finite floats truncate toward zero and strings
/// must hold a plain decimal integer.
fn parse_population(value: &Value) -> Result<i64, ValidationError> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(i)
            } else if let Some(f) = n.as_f64() {
                truncate_float(f)
            } else {
                Err(ValidationError::InvalidPopulation)
            }
        }
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| ValidationError::InvalidPopulation),
        _ => Err(ValidationError::InvalidPopulation),
    }
}

fn truncate_float(f: f64) -> Result<i64, ValidationError> {
    // i64::MAX is not representable as f64; 2^63 is the first value out of range
    const UPPER: f64 = 9_223_372_036_854_775_808.0;
    let t = f.trunc();
    if !t.is_finite() || t >= UPPER || t < -UPPER {
        return Err(ValidationError::InvalidPopulation);
    }
    Ok(t as i64)
}
