pub mod account;
pub mod analytics;
pub mod domain;
pub mod orchestrator;
pub mod ports;
pub mod recorder;

#[cfg(test)]
pub(crate) mod test_support;

pub use account::{AccountError, AccountManager, ADMIN_EMAIL, DAILY_POINTS};
pub use analytics::{RankedCount, UsageReport};
pub use domain::{
    Category, Coordinates, EmailDraft, EmailRequest, Language, Tone, UsageLogEntry, User,
    VisitLogEntry,
};
pub use orchestrator::{GenerateError, GenerationOrchestrator, GenerationOutcome, GENERATION_COST};
pub use ports::{EmailDraftingService, GeolocationService, PortError, PortResult, StorageService};
pub use recorder::UsageRecorder;
