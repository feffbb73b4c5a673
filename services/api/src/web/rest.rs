//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use promail_core::analytics::UsageReport;
use promail_core::domain::{Category, Language, Tone};
use promail_core::orchestrator::GenerateError;
use promail_core::ports::PortError;
use promail_core::{AccountError, EmailRequest};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;
use crate::web::state::AppState;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::web::auth::signin_handler,
        crate::web::auth::signout_handler,
        crate::web::auth::me_handler,
        generate_handler,
        purchase_handler,
        visit_handler,
        admin_stats_handler,
    ),
    components(
        schemas(
            crate::web::auth::SigninRequest,
            crate::web::auth::UserResponse,
            GenerateRequest,
            GenerateResponse,
            PurchaseRequest,
            PurchaseResponse,
            AdminStatsResponse,
            RankedRow,
        )
    ),
    tags(
        (name = "ProMail API", description = "API endpoints for the AI email writer.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// Purchase Plans
//=========================================================================================

struct Plan {
    id: &'static str,
    points: u32,
    price: &'static str,
    label: &'static str,
}

/// The fixed plan table shown by the purchase flow. The credited amount is
/// always the plan's points, never derived from the displayed price.
static PLANS: [Plan; 3] = [
    Plan { id: "small", points: 500, price: "$1", label: "Starter" },
    Plan { id: "medium", points: 2000, price: "$2", label: "Pro" },
    Plan { id: "large", points: 10000, price: "$4", label: "Elite" },
];

fn find_plan(id: &str) -> Option<&'static Plan> {
    PLANS.iter().find(|plan| plan.id == id)
}

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct GenerateRequest {
    pub description: String,
    #[schema(value_type = String, example = "English")]
    pub language: Language,
    #[schema(value_type = String, example = "Professional")]
    pub tone: Tone,
    #[schema(value_type = String, example = "Meeting Request")]
    pub category: Category,
}

/// The draft plus the balance left after the 30-point debit.
#[derive(Serialize, ToSchema)]
pub struct GenerateResponse {
    pub subject: String,
    pub body: String,
    pub points: u32,
}

#[derive(Deserialize, ToSchema)]
pub struct PurchaseRequest {
    /// One of the fixed plan ids: `small`, `medium`, `large`.
    pub plan: String,
}

#[derive(Serialize, ToSchema)]
pub struct PurchaseResponse {
    pub order_id: Uuid,
    pub plan: String,
    pub points_added: u32,
    pub points: u32,
}

#[derive(Serialize, ToSchema)]
pub struct RankedRow {
    pub label: String,
    pub count: usize,
}

#[derive(Serialize, ToSchema)]
pub struct AdminStatsResponse {
    pub total_visits: usize,
    pub total_generations: usize,
    pub unique_users: usize,
    pub top_combinations: Vec<RankedRow>,
    pub top_categories: Vec<RankedRow>,
}

impl From<UsageReport> for AdminStatsResponse {
    fn from(report: UsageReport) -> Self {
        let rows = |ranked: Vec<promail_core::RankedCount>| {
            ranked
                .into_iter()
                .map(|row| RankedRow { label: row.label, count: row.count })
                .collect()
        };
        Self {
            total_visits: report.total_visits,
            total_generations: report.total_generations,
            unique_users: report.unique_users,
            top_combinations: rows(report.top_combinations),
            top_categories: rows(report.top_categories),
        }
    }
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Generate an email draft, debiting 30 points on success.
#[utoipa::path(
    post,
    path = "/generate",
    request_body = GenerateRequest,
    responses(
        (status = 200, description = "Draft generated and points debited", body = GenerateResponse),
        (status = 400, description = "Empty description"),
        (status = 401, description = "Not signed in"),
        (status = 402, description = "Insufficient points"),
        (status = 502, description = "The drafting backend failed"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn generate_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GenerateRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let request = EmailRequest {
        description: req.description,
        language: req.language,
        tone: req.tone,
        category: req.category,
    };

    let outcome = state.orchestrator.generate(&request).await.map_err(|e| match e {
        GenerateError::NotSignedIn => (StatusCode::UNAUTHORIZED, e.to_string()),
        GenerateError::EmptyDescription => (StatusCode::BAD_REQUEST, e.to_string()),
        GenerateError::InsufficientBalance { .. } => {
            (StatusCode::PAYMENT_REQUIRED, e.to_string())
        }
        GenerateError::DraftingFailed => (StatusCode::BAD_GATEWAY, e.to_string()),
        GenerateError::Storage(ref inner) => {
            error!("Generation failed on storage: {:?}", inner);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to generate email".to_string(),
            )
        }
    })?;

    Ok(Json(GenerateResponse {
        subject: outcome.draft.subject,
        body: outcome.draft.body,
        points: outcome.points,
    }))
}

/// Simulated checkout: credits the selected plan's points.
#[utoipa::path(
    post,
    path = "/purchase",
    request_body = PurchaseRequest,
    responses(
        (status = 200, description = "Points credited", body = PurchaseResponse),
        (status = 400, description = "Unknown plan"),
        (status = 401, description = "Not signed in"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn purchase_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PurchaseRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let plan = find_plan(&req.plan).ok_or((
        StatusCode::BAD_REQUEST,
        format!("Unknown plan '{}'", req.plan),
    ))?;

    let user = state.accounts.credit(plan.points).await.map_err(|e| match e {
        AccountError::Storage(PortError::NotFound(_)) => {
            (StatusCode::UNAUTHORIZED, "Not signed in".to_string())
        }
        other => {
            error!("Failed to credit purchase: {:?}", other);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to complete purchase".to_string(),
            )
        }
    })?;

    Ok(Json(PurchaseResponse {
        order_id: Uuid::new_v4(),
        plan: plan.label.to_string(),
        points_added: plan.points,
        points: user.points,
    }))
}

/// Record one application session start.
#[utoipa::path(
    post,
    path = "/visits",
    responses(
        (status = 201, description = "Visit recorded"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn visit_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    state.recorder.record_visit().await.map_err(|e| {
        error!("Failed to record visit: {:?}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to record visit".to_string(),
        )
    })?;
    Ok(StatusCode::CREATED)
}

/// Aggregated usage statistics for the admin dashboard.
#[utoipa::path(
    get,
    path = "/admin/stats",
    responses(
        (status = 200, description = "Aggregated statistics", body = AdminStatsResponse),
        (status = 401, description = "Not signed in"),
        (status = 403, description = "Admin access required"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn admin_stats_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let user = state
        .accounts
        .load()
        .await
        .map_err(|e| {
            error!("Failed to load user: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to load user".to_string(),
            )
        })?
        .ok_or((StatusCode::UNAUTHORIZED, "Not signed in".to_string()))?;

    if !user.is_admin {
        return Err((StatusCode::FORBIDDEN, "Admin access required".to_string()));
    }

    let result = async {
        let usage = state.store.load_usage_log().await?;
        let visits = state.store.load_visit_log().await?;
        Ok::<_, PortError>(UsageReport::build(&usage, &visits))
    }
    .await;

    match result {
        Ok(report) => Ok(Json(AdminStatsResponse::from(report))),
        Err(e) => {
            error!("Failed to aggregate stats: {:?}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to aggregate stats".to_string(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::state::test_fixtures::app_state;
    use promail_core::{ADMIN_EMAIL, DAILY_POINTS, GENERATION_COST};

    #[test]
    fn plan_table_matches_the_published_pricing() {
        let pro = find_plan("medium").unwrap();
        assert_eq!(pro.points, 2000);
        assert_eq!(pro.price, "$2");
        assert_eq!(pro.label, "Pro");
        assert!(find_plan("mega").is_none());
    }

    fn generate_request() -> GenerateRequest {
        GenerateRequest {
            description: "Ask my boss for a 30% raise".to_string(),
            language: Language::English,
            tone: Tone::Professional,
            category: Category::General,
        }
    }

    #[tokio::test]
    async fn generate_settles_the_debit_on_success() {
        let dir = tempfile::tempdir().unwrap();
        let state = app_state(dir.path());
        state.accounts.create("alice@example.com").await.unwrap();

        let result = generate_handler(State(state.clone()), Json(generate_request())).await;
        assert!(result.is_ok());

        let user = state.accounts.load().await.unwrap().unwrap();
        assert_eq!(user.points, DAILY_POINTS - GENERATION_COST);
        assert_eq!(state.store.load_usage_log().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn generate_returns_payment_required_when_points_run_out() {
        let dir = tempfile::tempdir().unwrap();
        let state = app_state(dir.path());
        state.accounts.create("alice@example.com").await.unwrap();
        state.accounts.debit(90).await.unwrap();

        let (status, message) = generate_handler(State(state.clone()), Json(generate_request()))
            .await
            .err()
            .unwrap();
        assert_eq!(status, StatusCode::PAYMENT_REQUIRED);
        assert_eq!(message, "Insufficient points! Each email costs 30 points.");
        assert_eq!(state.accounts.load().await.unwrap().unwrap().points, 10);
    }

    #[tokio::test]
    async fn purchase_credits_the_plan_points_regardless_of_price() {
        let dir = tempfile::tempdir().unwrap();
        let state = app_state(dir.path());
        state.accounts.create("alice@example.com").await.unwrap();

        let result = purchase_handler(
            State(state.clone()),
            Json(PurchaseRequest { plan: "medium".to_string() }),
        )
        .await;
        assert!(result.is_ok());

        let user = state.accounts.load().await.unwrap().unwrap();
        assert_eq!(user.points, DAILY_POINTS + 2000);
    }

    #[tokio::test]
    async fn purchase_requires_a_signed_in_user() {
        let dir = tempfile::tempdir().unwrap();
        let state = app_state(dir.path());

        let (status, _) = purchase_handler(
            State(state),
            Json(PurchaseRequest { plan: "small".to_string() }),
        )
        .await
        .err()
        .unwrap();
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn admin_stats_refuse_non_admin_users() {
        let dir = tempfile::tempdir().unwrap();
        let state = app_state(dir.path());
        state.accounts.create("alice@example.com").await.unwrap();

        let (status, _) = admin_stats_handler(State(state)).await.err().unwrap();
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn admin_stats_are_served_to_the_reserved_identity() {
        let dir = tempfile::tempdir().unwrap();
        let state = app_state(dir.path());
        state.accounts.create(ADMIN_EMAIL).await.unwrap();
        visit_handler(State(state.clone())).await.unwrap();

        assert!(admin_stats_handler(State(state)).await.is_ok());
    }
}
