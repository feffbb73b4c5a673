//! crates/promail_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like the profile store
//! or the drafting backend.

use async_trait::async_trait;
use crate::domain::{Coordinates, EmailDraft, EmailRequest, UsageLogEntry, User, VisitLogEntry};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., filesystem, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// The durable profile store, holding three independent records: the current
/// user, the usage log, and the visit log. Each record is read and written
/// whole; there is no transactional guarantee across records.
#[async_trait]
pub trait StorageService: Send + Sync {
    // --- Current User Record ---
    async fn load_user(&self) -> PortResult<Option<User>>;

    async fn save_user(&self, user: &User) -> PortResult<()>;

    async fn clear_user(&self) -> PortResult<()>;

    // --- Usage Log Record ---
    async fn load_usage_log(&self) -> PortResult<Vec<UsageLogEntry>>;

    async fn store_usage_log(&self, entries: &[UsageLogEntry]) -> PortResult<()>;

    // --- Visit Log Record ---
    async fn load_visit_log(&self) -> PortResult<Vec<VisitLogEntry>>;

    async fn store_visit_log(&self, entries: &[VisitLogEntry]) -> PortResult<()>;
}

#[async_trait]
pub trait EmailDraftingService: Send + Sync {
    /// Produces a subject/body draft for the given request.
    async fn draft(&self, request: &EmailRequest) -> PortResult<EmailDraft>;
}

#[async_trait]
pub trait GeolocationService: Send + Sync {
    /// Resolves the caller's position. Failure is treated the same as absence
    /// by every caller; no error from this port is ever surfaced.
    async fn locate(&self) -> PortResult<Coordinates>;
}
