//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use promail_core::account::AccountManager;
use promail_core::orchestrator::GenerationOrchestrator;
use promail_core::ports::StorageService;
use promail_core::recorder::UsageRecorder;
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn StorageService>,
    pub accounts: AccountManager,
    pub recorder: UsageRecorder,
    pub orchestrator: GenerationOrchestrator,
}

#[cfg(test)]
pub(crate) mod test_fixtures {
    use super::*;
    use crate::adapters::JsonFileStore;
    use async_trait::async_trait;
    use promail_core::domain::{EmailDraft, EmailRequest};
    use promail_core::ports::{EmailDraftingService, PortResult};
    use std::path::Path;
    use tracing::Level;

    struct CannedDrafting;

    #[async_trait]
    impl EmailDraftingService for CannedDrafting {
        async fn draft(&self, _request: &EmailRequest) -> PortResult<EmailDraft> {
            Ok(EmailDraft {
                subject: "Subject".to_string(),
                body: "Dear [Name],".to_string(),
            })
        }
    }

    /// Builds an `AppState` over a file store rooted at `dir`, with a canned
    /// drafting backend and no geolocation provider.
    pub(crate) fn app_state(dir: &Path) -> Arc<AppState> {
        let store: Arc<dyn StorageService> = Arc::new(JsonFileStore::new(dir));
        let accounts = AccountManager::new(store.clone());
        let recorder = UsageRecorder::new(store.clone(), None);
        let orchestrator =
            GenerationOrchestrator::new(accounts.clone(), recorder.clone(), Arc::new(CannedDrafting));
        let config = Arc::new(Config {
            bind_address: "127.0.0.1:0".parse().unwrap(),
            profile_dir: dir.to_path_buf(),
            log_level: Level::INFO,
            openai_api_key: None,
            drafting_model: "test-model".to_string(),
            site_location: None,
        });
        Arc::new(AppState {
            config,
            store,
            accounts,
            recorder,
            orchestrator,
        })
    }
}
