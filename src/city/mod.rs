//! City domain
//!
//! The single record type served by the API and the rules that turn an
//! untrusted request body into one.

mod record;
mod validation;

pub use record::{normalize_key, CityRecord, WriteOutcome};
pub use validation::{UpsertInput, ValidationError};
