//! Connection management
//!
//! One store handle is shared by the whole process. It is established at
//! startup and re-established lazily whenever a request finds it missing
//! or dead. Handlers never retry on their own; reconnection only happens
//! here.
//!
//! Concurrent requests that all find the handle dead may each reconnect.
//! Every path publishes a valid handle and schema creation is idempotent,
//! so the last writer simply wins.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::debug;

use super::backend::{DocumentStore, StoreConnector, StoreHandle};
use super::errors::{StoreError, StoreResult};
use super::schema::{ensure_schema, IndexSchema};
use crate::observability::{log_event, Event};

/// Bounded retry with a fixed delay between attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// No waiting between attempts
    pub fn immediate(max_attempts: u32) -> Self {
        Self::new(max_attempts, Duration::ZERO)
    }
}


/// Owner of the process-wide store handle
pub struct ConnectionManager {
    connector: Arc<dyn StoreConnector>,
    policy: RetryPolicy,
    schema: IndexSchema,
    handle: RwLock<Option<StoreHandle>>,
}

impl ConnectionManager {
    pub fn new(connector: Arc<dyn StoreConnector>, policy: RetryPolicy, schema: IndexSchema) -> Self {
        Self {
            connector,
            policy,
            schema,
            handle: RwLock::new(None),
        }
    }

    pub fn schema(&self) -> &IndexSchema {
        &self.schema
    }

    /// The published handle, if any. Never reconnects.
    pub async fn current(&self) -> Option<StoreHandle> {
        self.handle.read().await.clone()
    }

    /// Establish a new verified handle without publishing it.
    ///
    /// Each attempt builds a client and pings it; failed attempts are
    /// followed by the policy delay, except the last one.
    pub async fn connect(&self) -> StoreResult<StoreHandle> {
        let target = self.connector.describe();
        let attempts = self.policy.max_attempts;

        for attempt in 1..=attempts {
            match self.try_connect().await {
                Ok(store) => {
                    log_event!(Event::StoreConnected, store = %target);
                    return Ok(store);
                }
                Err(e) => {
                    log_event!(
                        Event::StoreConnectAttemptFailed,
                        attempt,
                        max_attempts = attempts,
                        store = %target,
                        reason = %e
                    );
                    if attempt < attempts && !self.policy.delay.is_zero() {
                        tokio::time::sleep(self.policy.delay).await;
                    }
                }
            }
        }

        Err(StoreError::ConnectFailed { target, attempts })
    }

    async fn try_connect(&self) -> StoreResult<StoreHandle> {
        let store = self.connector.connect().await?;
        if store.ping().await? {
            Ok(store)
        } else {
            Err(StoreError::Connection("ping failed".to_string()))
        }
    }

    /// Return a live handle, reconnecting if the published one is absent
    /// or fails a ping.
    ///
    /// A replacement handle is published before the schema check runs, so
    /// a schema failure still leaves the new connection in place.
    pub async fn ensure_connected(&self) -> StoreResult<StoreHandle> {
        if let Some(store) = self.current().await {
            match store.ping().await {
                Ok(true) => return Ok(store),
                Ok(false) => debug!("store handle failed liveness probe, reconnecting"),
                Err(e) => debug!(error = %e, "store liveness probe errored, reconnecting"),
            }
        }

        let store = self.connect().await?;
        *self.handle.write().await = Some(store.clone());
        ensure_schema(store.as_ref(), &self.schema).await?;
        Ok(store)
    }

    /// Startup connect. Failure is logged and the process keeps running
    /// without a handle; the next request will try again.
    pub async fn initialize(&self) -> bool {
        match self.ensure_connected().await {
            Ok(_) => true,
            Err(e) => {
                log_event!(Event::StoreUnavailable, reason = %e);
                false
            }
        }
    }
}
