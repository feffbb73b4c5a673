//! crates/promail_core/src/recorder.rs
//!
//! Appends usage and visit events to the profile store. Usage entries are
//! enriched with a best-effort geolocation lookup before their first (and
//! only) persistence.

use std::sync::Arc;
use std::time::Duration;
use chrono::Utc;
use tracing::debug;
use crate::domain::{Category, Language, Tone, UsageLogEntry, VisitLogEntry};
use crate::ports::{GeolocationService, PortResult, StorageService};

/// How long a usage append waits for the geolocation provider before
/// falling back to a location-less entry.
pub const GEO_LOOKUP_TIMEOUT: Duration = Duration::from_secs(2);

/// Records usage and visit events.
///
/// Both operations are pure appends: read the full log, push one entry,
/// write the log back. Duplicates are expected and meaningful; there is no
/// dedup logic.
#[derive(Clone)]
pub struct UsageRecorder {
    store: Arc<dyn StorageService>,
    geo: Option<Arc<dyn GeolocationService>>,
    geo_timeout: Duration,
}

impl UsageRecorder {
    pub fn new(store: Arc<dyn StorageService>, geo: Option<Arc<dyn GeolocationService>>) -> Self {
        Self {
            store,
            geo,
            geo_timeout: GEO_LOOKUP_TIMEOUT,
        }
    }

    #[cfg(test)]
    fn with_geo_timeout(mut self, timeout: Duration) -> Self {
        self.geo_timeout = timeout;
        self
    }

    /// Appends one usage entry for a successful generation.
    ///
    /// The geolocation lookup is a single-resolution race between the
    /// provider and the timeout; whichever completes first decides whether
    /// the entry carries coordinates. Exactly one append happens per call.
    pub async fn record_usage(
        &self,
        email: &str,
        language: Language,
        tone: Tone,
        category: Category,
    ) -> PortResult<()> {
        let mut entry = UsageLogEntry {
            timestamp: Utc::now(),
            email: email.to_string(),
            language,
            tone,
            category,
            location: None,
        };

        if let Some(geo) = &self.geo {
            match tokio::time::timeout(self.geo_timeout, geo.locate()).await {
                Ok(Ok(coordinates)) => entry.location = Some(coordinates),
                Ok(Err(e)) => debug!("Geolocation lookup declined: {e}"),
                Err(_) => debug!("Geolocation lookup timed out"),
            }
        }

        let mut log = self.store.load_usage_log().await?;
        log.push(entry);
        self.store.store_usage_log(&log).await
    }

    /// Appends one visit entry. Invoked once per application session start.
    pub async fn record_visit(&self) -> PortResult<()> {
        let mut log = self.store.load_visit_log().await?;
        log.push(VisitLogEntry { timestamp: Utc::now() });
        self.store.store_visit_log(&log).await
    }
}
