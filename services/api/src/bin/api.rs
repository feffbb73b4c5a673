//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{FixedGeoAdapter, JsonFileStore, OpenAiDraftingAdapter},
    config::Config,
    error::ApiError,
    web::{
        auth::{me_handler, signin_handler, signout_handler},
        admin_stats_handler, generate_handler, purchase_handler,
        rest::ApiDoc,
        state::AppState,
        visit_handler,
    },
};
use async_openai::{config::OpenAIConfig, Client};
use axum::{
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    routing::{get, post},
    Router,
};
use promail_core::{
    account::AccountManager, orchestrator::GenerationOrchestrator, ports::GeolocationService,
    recorder::UsageRecorder,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Open the Profile Store ---
    info!("Opening profile store at {}", config.profile_dir.display());
    let store = JsonFileStore::new(&config.profile_dir);
    store.init().await?;
    let store: Arc<dyn promail_core::ports::StorageService> = Arc::new(store);

    // --- 3. Initialize Service Adapters ---
    let openai_config = OpenAIConfig::new().with_api_key(
        config
            .openai_api_key
            .as_ref()
            .ok_or_else(|| ApiError::Internal("OPENAI_API_KEY is required".to_string()))?,
    );
    let openai_client = Client::with_config(openai_config);

    let drafting_adapter = Arc::new(OpenAiDraftingAdapter::new(
        openai_client,
        config.drafting_model.clone(),
    ));

    let geo_adapter: Option<Arc<dyn GeolocationService>> = config
        .site_location
        .map(|coordinates| Arc::new(FixedGeoAdapter::new(coordinates)) as _);

    // --- 4. Assemble the Core Services & Shared AppState ---
    let accounts = AccountManager::new(store.clone());
    let recorder = UsageRecorder::new(store.clone(), geo_adapter);
    let orchestrator =
        GenerationOrchestrator::new(accounts.clone(), recorder.clone(), drafting_adapter);

    let app_state = Arc::new(AppState {
        config: config.clone(),
        store,
        accounts,
        recorder,
        orchestrator,
    });

    let cors = CorsLayer::new()
        .allow_origin("http://localhost:3000".parse::<HeaderValue>().unwrap())
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT]);

    // --- 5. Create the Web Router ---
    let api_router = Router::new()
        .route("/auth/signin", post(signin_handler))
        .route("/auth/signout", post(signout_handler))
        .route("/me", get(me_handler))
        .route("/visits", post(visit_handler))
        .route("/generate", post(generate_handler))
        .route("/purchase", post(purchase_handler))
        .route("/admin/stats", get(admin_stats_handler))
        .layer(cors)
        .with_state(app_state);

    // Merge the API router with the Swagger UI router for a complete application.
    let app = Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 6. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
