//! Observability
//!
//! - `tracing` subscriber setup (text or JSON)
//! - Typed lifecycle events with stable names
//!
//! # Usage
//!
//! ```ignore
//! use crate::observability::{log_event, Event};
//!
//! log_event!(Event::IndexCreated, index = %schema.name);
//! ```
//!
//! Extra arguments are ordinary `tracing` fields, so JSON output carries
//! them as keys next to `event`.

mod events;
mod logger;

pub use events::Event;
pub use logger::{init_logging, LogFormat, LoggingConfig, Severity};

/// Log a lifecycle event at its severity, with optional `tracing` fields
macro_rules! log_event {
    ($event:expr $(, $($fields:tt)+)?) => {{
        let event: $crate::observability::Event = $event;
        match event.severity() {
            $crate::observability::Severity::Trace => {
                ::tracing::trace!(event = event.as_str() $(, $($fields)+)?)
            }
            $crate::observability::Severity::Info => {
                ::tracing::info!(event = event.as_str() $(, $($fields)+)?)
            }
            $crate::observability::Severity::Warn => {
                ::tracing::warn!(event = event.as_str() $(, $($fields)+)?)
            }
            $crate::observability::Severity::Error => {
                ::tracing::error!(event = event.as_str() $(, $($fields)+)?)
            }
        }
    }};
}

pub(crate) use log_event;
