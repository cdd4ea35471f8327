//! Lifecycle events
//!
//! Every notable state change of the service has a typed event with a
//! stable name, so log lines can be grepped and alerted on.

use super::logger::Severity;

/// Observable lifecycle events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Boot & Lifecycle
    /// Process startup begins
    BootStart,
    /// Configuration resolved from flags and environment
    ConfigLoaded,
    /// HTTP listener bound, ready for requests
    Serving,
    /// Shutdown signal received
    ShutdownStart,
    /// Listener closed, process about to exit
    ShutdownComplete,

    // Document store
    /// One connection attempt failed (will retry if attempts remain)
    StoreConnectAttemptFailed,
    /// Connection verified with a ping
    StoreConnected,
    /// Startup connect exhausted its retries
    StoreUnavailable,
    /// Index was missing and has been created
    IndexCreated,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::BootStart => "CITYPOP_STARTUP_BEGIN",
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::Serving => "CITYPOP_SERVING",
            Event::ShutdownStart => "SHUTDOWN_START",
            Event::ShutdownComplete => "SHUTDOWN_COMPLETE",

            Event::StoreConnectAttemptFailed => "STORE_CONNECT_ATTEMPT_FAILED",
            Event::StoreConnected => "STORE_CONNECTED",
            Event::StoreUnavailable => "STORE_UNAVAILABLE",
            Event::IndexCreated => "INDEX_CREATED",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::StoreConnectAttemptFailed => Severity::Warn,
            Event::StoreUnavailable => Severity::Error,
            _ => Severity::Info,
        }
    }
}
