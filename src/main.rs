use axum::{
    Router,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Json},
    routing::{delete, get, post, put},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;
use uuid::Uuid;

use outreach_core::{
    CelebrationEvent, ChecklistItem, CooperationStatus, CoreConfig, DoctorProfile, GoalState,
    GoalTarget, Interaction, OtherGoal, OutreachError, OutreachService, PresentationDraft,
    PresentationRecord,
};

/// Application state shared across REST API handlers.
///
/// Holds the [`OutreachService`] used by every endpoint; all durable state
/// lives behind it.
#[derive(Clone)]
struct AppState {
    service: Arc<OutreachService>,
}

#[derive(Serialize, ToSchema)]
struct HealthRes {
    ok: bool,
    message: String,
}

/// Goal state plus the celebration events produced by the auto-tracking
/// pass that ran while answering the request.
#[derive(Serialize, ToSchema)]
struct GoalsRes {
    state: GoalState,
    events: Vec<CelebrationEvent>,
}

#[derive(Serialize, ToSchema)]
struct EventsRes {
    events: Vec<CelebrationEvent>,
}

#[derive(Deserialize, ToSchema)]
struct AdjustCurrentReq {
    /// Signed delta applied to the goal's current count.
    delta: i32,
}

#[derive(Deserialize, ToSchema)]
struct AdjustTargetReq {
    /// New wanted count, clamped to at least 1.
    target: u32,
}

#[derive(Deserialize, ToSchema)]
struct AddTargetReq {
    specialty: String,
    #[serde(default = "AddTargetReq::default_target")]
    target: u32,
}

impl AddTargetReq {
    fn default_target() -> u32 {
        2
    }
}

#[derive(Serialize, ToSchema)]
struct AddTargetRes {
    id: String,
}

#[derive(Serialize, ToSchema)]
struct PriorityRes {
    priority: bool,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        list_presentations,
        create_presentation,
        update_presentation,
        delete_presentation,
        doctors,
        goals,
        add_target,
        remove_target,
        set_target,
        toggle_priority,
        adjust_current,
        toggle_item,
        export_csv
    ),
    components(schemas(
        HealthRes,
        GoalsRes,
        EventsRes,
        AdjustCurrentReq,
        AdjustTargetReq,
        AddTargetReq,
        AddTargetRes,
        PriorityRes,
        PresentationRecord,
        PresentationDraft,
        CooperationStatus,
        DoctorProfile,
        Interaction,
        GoalState,
        GoalTarget,
        OtherGoal,
        ChecklistItem,
        CelebrationEvent
    ))
)]
struct ApiDoc;

/// Maps core errors onto HTTP statuses; anything unexpected is logged and
/// reported as a 500.
fn error_response(err: OutreachError) -> (StatusCode, String) {
    let status = match &err {
        OutreachError::InvalidInput(_)
        | OutreachError::EmptySpecialty
        | OutreachError::DuplicateSpecialty(_)
        | OutreachError::NotAChecklistGoal(_) => StatusCode::BAD_REQUEST,
        OutreachError::UnknownGoal(_)
        | OutreachError::UnknownChecklistItem { .. }
        | OutreachError::UnknownPresentation(_) => StatusCode::NOT_FOUND,
        _ => {
            tracing::error!("request failed: {err:?}");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, err.to_string())
}

/// Main entry point for the outreach tracker REST server.
///
/// # Environment Variables
/// - `OUTREACH_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `OUTREACH_DATA_DIR`: Directory for durable JSON state (default: "outreach_data")
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("outreach=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr =
        std::env::var("OUTREACH_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let data_dir = std::env::var("OUTREACH_DATA_DIR").ok().map(PathBuf::from);
    let config = CoreConfig::resolve(data_dir);

    tracing::info!("starting outreach REST on {rest_addr}");
    tracing::info!("data directory: {}", config.data_dir().display());

    let service = Arc::new(OutreachService::new(&config));

    let app = Router::new()
        .route("/health", get(health))
        .route(
            "/presentations",
            get(list_presentations).post(create_presentation),
        )
        .route(
            "/presentations/:id",
            put(update_presentation).delete(delete_presentation),
        )
        .route("/doctors", get(doctors))
        .route("/goals", get(goals))
        .route("/goals/targets", post(add_target))
        .route("/goals/targets/:id", delete(remove_target))
        .route("/goals/targets/:id/target", post(set_target))
        .route("/goals/targets/:id/priority", post(toggle_priority))
        .route("/goals/:id/current", post(adjust_current))
        .route("/goals/:goal_id/checklist/:item_id", post(toggle_item))
        .route("/export.csv", get(export_csv))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(AppState { service });

    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Health check response", body = HealthRes))
)]
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthRes {
        ok: true,
        message: "outreach tracker is alive".into(),
    })
}

#[utoipa::path(
    get,
    path = "/presentations",
    responses(
        (status = 200, description = "The full presentation log, newest first", body = [PresentationRecord]),
        (status = 500, description = "Internal server error")
    )
)]
async fn list_presentations(
    State(state): State<AppState>,
) -> Result<Json<Vec<PresentationRecord>>, (StatusCode, String)> {
    state
        .service
        .list_presentations()
        .map(Json)
        .map_err(error_response)
}

#[utoipa::path(
    post,
    path = "/presentations",
    request_body = PresentationDraft,
    responses(
        (status = 200, description = "Logged presentation with its assigned id", body = PresentationRecord),
        (status = 400, description = "Missing facility or date"),
        (status = 500, description = "Internal server error")
    )
)]
async fn create_presentation(
    State(state): State<AppState>,
    Json(draft): Json<PresentationDraft>,
) -> Result<Json<PresentationRecord>, (StatusCode, String)> {
    state
        .service
        .add_presentation(draft)
        .map(Json)
        .map_err(error_response)
}

#[utoipa::path(
    put,
    path = "/presentations/{id}",
    params(("id" = Uuid, Path, description = "Presentation id")),
    request_body = PresentationDraft,
    responses(
        (status = 200, description = "Updated presentation", body = PresentationRecord),
        (status = 400, description = "Missing facility or date"),
        (status = 404, description = "Unknown presentation id")
    )
)]
async fn update_presentation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(draft): Json<PresentationDraft>,
) -> Result<Json<PresentationRecord>, (StatusCode, String)> {
    state
        .service
        .update_presentation(id, draft)
        .map(Json)
        .map_err(error_response)
}

#[utoipa::path(
    delete,
    path = "/presentations/{id}",
    params(("id" = Uuid, Path, description = "Presentation id")),
    responses(
        (status = 200, description = "Presentation deleted"),
        (status = 404, description = "Unknown presentation id")
    )
)]
async fn delete_presentation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    state
        .service
        .remove_presentation(id)
        .map(|()| StatusCode::OK)
        .map_err(error_response)
}

#[utoipa::path(
    get,
    path = "/doctors",
    responses(
        (status = 200, description = "Deduplicated doctor roster", body = [DoctorProfile]),
        (status = 500, description = "Internal server error")
    )
)]
async fn doctors(
    State(state): State<AppState>,
) -> Result<Json<Vec<DoctorProfile>>, (StatusCode, String)> {
    state.service.roster().map(Json).map_err(error_response)
}

#[utoipa::path(
    get,
    path = "/goals",
    responses(
        (status = 200, description = "Goal state after an auto-tracking pass", body = GoalsRes),
        (status = 500, description = "Internal server error")
    )
)]
async fn goals(State(state): State<AppState>) -> Result<Json<GoalsRes>, (StatusCode, String)> {
    state
        .service
        .goal_state()
        .map(|(state, events)| Json(GoalsRes { state, events }))
        .map_err(error_response)
}

#[utoipa::path(
    post,
    path = "/goals/targets",
    request_body = AddTargetReq,
    responses(
        (status = 200, description = "Specialty target added", body = AddTargetRes),
        (status = 400, description = "Empty or duplicate specialty")
    )
)]
async fn add_target(
    State(state): State<AppState>,
    Json(req): Json<AddTargetReq>,
) -> Result<Json<AddTargetRes>, (StatusCode, String)> {
    state
        .service
        .add_specialty_target(&req.specialty, req.target)
        .map(|id| Json(AddTargetRes { id }))
        .map_err(error_response)
}

#[utoipa::path(
    delete,
    path = "/goals/targets/{id}",
    params(("id" = String, Path, description = "Goal id (specialty slug)")),
    responses(
        (status = 200, description = "Specialty target removed"),
        (status = 404, description = "Unknown goal id")
    )
)]
async fn remove_target(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, (StatusCode, String)> {
    state
        .service
        .remove_specialty_target(&id)
        .map(|()| StatusCode::OK)
        .map_err(error_response)
}

#[utoipa::path(
    post,
    path = "/goals/targets/{id}/target",
    params(("id" = String, Path, description = "Goal id (specialty slug)")),
    request_body = AdjustTargetReq,
    responses(
        (status = 200, description = "Target updated; completion events if any", body = EventsRes),
        (status = 404, description = "Unknown goal id")
    )
)]
async fn set_target(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<AdjustTargetReq>,
) -> Result<Json<EventsRes>, (StatusCode, String)> {
    state
        .service
        .adjust_goal_target(&id, req.target)
        .map(|events| Json(EventsRes { events }))
        .map_err(error_response)
}

#[utoipa::path(
    post,
    path = "/goals/targets/{id}/priority",
    params(("id" = String, Path, description = "Goal id (specialty slug)")),
    responses(
        (status = 200, description = "Priority flag toggled", body = PriorityRes),
        (status = 404, description = "Unknown goal id")
    )
)]
async fn toggle_priority(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PriorityRes>, (StatusCode, String)> {
    state
        .service
        .toggle_priority(&id)
        .map(|priority| Json(PriorityRes { priority }))
        .map_err(error_response)
}

#[utoipa::path(
    post,
    path = "/goals/{id}/current",
    params(("id" = String, Path, description = "Goal id")),
    request_body = AdjustCurrentReq,
    responses(
        (status = 200, description = "Count adjusted; completion events if any", body = EventsRes),
        (status = 400, description = "Checklist goals cannot be adjusted directly"),
        (status = 404, description = "Unknown goal id")
    )
)]
async fn adjust_current(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<AdjustCurrentReq>,
) -> Result<Json<EventsRes>, (StatusCode, String)> {
    state
        .service
        .adjust_goal_current(&id, req.delta)
        .map(|events| Json(EventsRes { events }))
        .map_err(error_response)
}

#[utoipa::path(
    post,
    path = "/goals/{goal_id}/checklist/{item_id}",
    params(
        ("goal_id" = String, Path, description = "Checklist goal id"),
        ("item_id" = String, Path, description = "Item id within the goal")
    ),
    responses(
        (status = 200, description = "Item toggled; completion events if any", body = EventsRes),
        (status = 404, description = "Unknown goal or item id")
    )
)]
async fn toggle_item(
    State(state): State<AppState>,
    Path((goal_id, item_id)): Path<(String, String)>,
) -> Result<Json<EventsRes>, (StatusCode, String)> {
    state
        .service
        .toggle_checklist_item(&goal_id, &item_id)
        .map(|events| Json(EventsRes { events }))
        .map_err(error_response)
}

#[utoipa::path(
    get,
    path = "/export.csv",
    responses(
        (status = 200, description = "Presentation log as CSV", content_type = "text/csv"),
        (status = 500, description = "Internal server error")
    )
)]
async fn export_csv(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let csv = state.service.export_csv().map_err(error_response)?;
    Ok(([(header::CONTENT_TYPE, "text/csv; charset=utf-8")], csv))
}
