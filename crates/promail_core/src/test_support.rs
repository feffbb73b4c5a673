//! crates/promail_core/src/test_support.rs
//!
//! In-memory stand-ins for the service ports, used by the unit tests in this
//! crate. Not compiled into release builds.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use crate::domain::{Coordinates, EmailDraft, EmailRequest, UsageLogEntry, User, VisitLogEntry};
use crate::ports::{
    EmailDraftingService, GeolocationService, PortError, PortResult, StorageService,
};

/// An in-memory `StorageService` that also counts user-record writes, so
/// tests can assert that a same-day reload performs no persistence.
#[derive(Default)]
pub struct MemoryStore {
    user: Mutex<Option<User>>,
    usage: Mutex<Vec<UsageLogEntry>>,
    visits: Mutex<Vec<VisitLogEntry>>,
    user_saves: AtomicUsize,
}

impl MemoryStore {
    pub fn seed_user(&self, user: User) {
        *self.user.lock().unwrap() = Some(user);
    }

    pub fn stored_user(&self) -> Option<User> {
        self.user.lock().unwrap().clone()
    }

    pub fn user_saves(&self) -> usize {
        self.user_saves.load(Ordering::SeqCst)
    }

    pub fn usage_entries(&self) -> Vec<UsageLogEntry> {
        self.usage.lock().unwrap().clone()
    }

    pub fn seed_visit(&self) {
        self.visits
            .lock()
            .unwrap()
            .push(VisitLogEntry { timestamp: Utc::now() });
    }

    pub fn visit_count(&self) -> usize {
        self.visits.lock().unwrap().len()
    }
}

#[async_trait]
impl StorageService for MemoryStore {
    async fn load_user(&self) -> PortResult<Option<User>> {
        Ok(self.user.lock().unwrap().clone())
    }

    async fn save_user(&self, user: &User) -> PortResult<()> {
        self.user_saves.fetch_add(1, Ordering::SeqCst);
        *self.user.lock().unwrap() = Some(user.clone());
        Ok(())
    }

    async fn clear_user(&self) -> PortResult<()> {
        *self.user.lock().unwrap() = None;
        Ok(())
    }

    async fn load_usage_log(&self) -> PortResult<Vec<UsageLogEntry>> {
        Ok(self.usage.lock().unwrap().clone())
    }

    async fn store_usage_log(&self, entries: &[UsageLogEntry]) -> PortResult<()> {
        *self.usage.lock().unwrap() = entries.to_vec();
        Ok(())
    }

    async fn load_visit_log(&self) -> PortResult<Vec<VisitLogEntry>> {
        Ok(self.visits.lock().unwrap().clone())
    }

    async fn store_visit_log(&self, entries: &[VisitLogEntry]) -> PortResult<()> {
        *self.visits.lock().unwrap() = entries.to_vec();
        Ok(())
    }
}

/// A drafting service that always returns the same draft.
pub struct FixedDrafting;

#[async_trait]
impl EmailDraftingService for FixedDrafting {
    async fn draft(&self, _request: &EmailRequest) -> PortResult<EmailDraft> {
        Ok(EmailDraft {
            subject: "Subject".to_string(),
            body: "Dear [Name],".to_string(),
        })
    }
}

/// A drafting service that always fails, standing in for a backend outage.
pub struct FailingDrafting;

#[async_trait]
impl EmailDraftingService for FailingDrafting {
    async fn draft(&self, _request: &EmailRequest) -> PortResult<EmailDraft> {
        Err(PortError::Unexpected("backend unavailable".to_string()))
    }
}

/// A geolocation provider with a fixed answer.
pub struct StubGeo(pub Coordinates);

#[async_trait]
impl GeolocationService for StubGeo {
    async fn locate(&self) -> PortResult<Coordinates> {
        Ok(self.0)
    }
}

/// A geolocation provider that declines every lookup.
pub struct UnavailableGeo;

#[async_trait]
impl GeolocationService for UnavailableGeo {
    async fn locate(&self) -> PortResult<Coordinates> {
        Err(PortError::NotFound("position unavailable".to_string()))
    }
}
