//! crates/promail_core/src/orchestrator.rs
//!
//! Sequences one generation request: validate the signed-in user and
//! balance, call the drafting backend, then settle (debit, record usage).
//! A failed drafting call must leave the balance untouched.

use std::sync::Arc;
use tracing::{error, warn};
use crate::account::{AccountError, AccountManager};
use crate::domain::{EmailDraft, EmailRequest};
use crate::ports::{EmailDraftingService, PortError};
use crate::recorder::UsageRecorder;

/// Points consumed by one generation.
pub const GENERATION_COST: u32 = 30;

/// The outcome of one settled generation: the draft plus the post-debit
/// balance.
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    pub draft: EmailDraft,
    pub points: u32,
}

/// Errors surfaced by [`GenerationOrchestrator::generate`].
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("No signed-in user")]
    NotSignedIn,

    #[error("Description must not be empty")]
    EmptyDescription,

    /// The balance cannot cover [`GENERATION_COST`]. Recovered by sending
    /// the caller to the purchase flow; never fatal.
    #[error("Insufficient points! Each email costs {GENERATION_COST} points.")]
    InsufficientBalance { balance: u32 },

    /// The drafting backend errored or returned malformed data. The message
    /// is the only detail callers may show; internals go to the log.
    #[error("Failed to generate email. Please try again later.")]
    DraftingFailed,

    #[error(transparent)]
    Storage(#[from] PortError),
}

impl From<AccountError> for GenerateError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::InsufficientBalance { balance, .. } => {
                GenerateError::InsufficientBalance { balance }
            }
            AccountError::Storage(e) => GenerateError::Storage(e),
        }
    }
}

/// Coordinates the debit-then-call-then-record sequence for one request.
///
/// Overlapping invocations are not serialized here; each runs as an
/// independent sequence against the then-current persisted balance, so a
/// concurrent settle cannot be lost to a cached read.
#[derive(Clone)]
pub struct GenerationOrchestrator {
    accounts: AccountManager,
    recorder: UsageRecorder,
    drafting: Arc<dyn EmailDraftingService>,
}

impl GenerationOrchestrator {
    pub fn new(
        accounts: AccountManager,
        recorder: UsageRecorder,
        drafting: Arc<dyn EmailDraftingService>,
    ) -> Self {
        Self {
            accounts,
            recorder,
            drafting,
        }
    }

    /// Runs one generation request to completion.
    ///
    /// On success the debit is durably applied before this returns; the
    /// usage append is best-effort and a failure there does not roll the
    /// debit back. On a drafting failure no balance mutation occurs.
    pub async fn generate(
        &self,
        request: &EmailRequest,
    ) -> Result<GenerationOutcome, GenerateError> {
        let user = self
            .accounts
            .load()
            .await?
            .ok_or(GenerateError::NotSignedIn)?;

        if request.description.trim().is_empty() {
            return Err(GenerateError::EmptyDescription);
        }

        if user.points < GENERATION_COST {
            return Err(GenerateError::InsufficientBalance {
                balance: user.points,
            });
        }

        let draft = self.drafting.draft(request).await.map_err(|e| {
            error!("Email drafting call failed: {e}");
            GenerateError::DraftingFailed
        })?;

        // Billing before logging: the debit must land before control
        // returns, the usage append may not.
        let user = self.accounts.debit(GENERATION_COST).await?;

        if let Err(e) = self
            .recorder
            .record_usage(&user.email, request.language, request.tone, request.category)
            .await
        {
            warn!("Usage log append failed after a settled debit: {e}");
        }

        Ok(GenerationOutcome {
            draft,
            points: user.points,
        })
    }
}
