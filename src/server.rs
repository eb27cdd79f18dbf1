// SSBG Dashboard - HTTP surface
// JSON page/component views, CSV downloads and the two HTML shells

use crate::config::DashboardConfig;
use crate::export::{national_filename, state_filename, to_csv_bytes};
use crate::pages::{
    self, national, Control, FilterParams, NationalFilters, PageView, ParamError, StateFilters,
};
use crate::states::{report_path, state_name};
use crate::store::{DataStore, FilterOptions};
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Json, Redirect, Response},
    routing::get,
    Router,
};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<DataStore>,
    pub config: Arc<DashboardConfig>,
}

impl AppState {
    pub fn new(store: DataStore, config: DashboardConfig) -> Self {
        AppState {
            store: Arc::new(store),
            config: Arc::new(config),
        }
    }
}

/// API Response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Handler failure, rendered as a wrapped error body
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl From<ParamError> for ApiError {
    fn from(err: ParamError) -> Self {
        match err {
            ParamError::InvalidYear(_) => ApiError::BadRequest(err.to_string()),
            ParamError::UnknownControl(_) | ParamError::ControlNotOnPage(_) => {
                ApiError::NotFound(err.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m),
            ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m),
            ApiError::Internal(m) => {
                error!("Request failed: {}", m);
                (StatusCode::INTERNAL_SERVER_ERROR, m)
            }
        };
        (status, Json(ApiResponse::<()>::err(message))).into_response()
    }
}

type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

/// Dropdown values plus the defaults the pages start from
#[derive(Debug, Serialize)]
pub struct OptionsResponse {
    #[serde(flatten)]
    pub options: FilterOptions,
    pub default_year: u16,
    pub default_metric: String,
    pub default_state: String,
    pub year_range: (u16, u16),
}

#[derive(Debug, Serialize)]
pub struct ResolvedState {
    pub code: String,
    pub state_name: String,
    pub path: String,
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/options - Filter choices and defaults
async fn get_options(State(state): State<AppState>) -> Json<ApiResponse<OptionsResponse>> {
    let bounds = state.store.year_bounds();
    Json(ApiResponse::ok(OptionsResponse {
        options: state.store.filter_options().clone(),
        default_year: bounds.1,
        default_metric: state.config.defaults.metric.to_string(),
        default_state: state.config.defaults.state.clone(),
        year_range: bounds,
    }))
}

fn national_filters(state: &AppState, params: &FilterParams) -> Result<NationalFilters, ApiError> {
    Ok(NationalFilters::from_params(
        params,
        &state.store,
        &state.config.defaults,
    )?)
}

/// GET /api/national - Every national component
async fn get_national(
    State(state): State<AppState>,
    Query(params): Query<FilterParams>,
) -> ApiResult<PageView> {
    let filters = national_filters(&state, &params)?;
    Ok(Json(ApiResponse::ok(national::render(&state.store, &filters))))
}

/// GET /api/national/update/:control - Components invalidated by one control
async fn update_national(
    State(state): State<AppState>,
    Path(control): Path<String>,
    Query(params): Query<FilterParams>,
) -> ApiResult<PageView> {
    let control: Control = control.parse()?;
    let filters = national_filters(&state, &params)?;
    Ok(Json(ApiResponse::ok(national::update(
        &state.store,
        &filters,
        control,
    )?)))
}

/// GET /api/national/export - CSV of the filtered year/category slice
async fn export_national(
    State(state): State<AppState>,
    Query(params): Query<FilterParams>,
) -> Result<Response, ApiError> {
    let filters = national_filters(&state, &params)?;
    let slice = national::current_slice(&state.store, &filters);
    let bytes = to_csv_bytes(&slice).map_err(|e| ApiError::Internal(e.to_string()))?;
    info!(rows = slice.len(), "Exported national CSV");
    Ok(csv_response(bytes, &national_filename()))
}

/// GET /api/state/:name - Every component of one state report
async fn get_state(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(params): Query<FilterParams>,
) -> ApiResult<PageView> {
    if !state.store.has_state(&name) {
        debug!(state = %name, "No rows for requested state");
    }
    let filters = StateFilters::from_params(&name, &params, &state.store)?;
    Ok(Json(ApiResponse::ok(pages::state::render(&state.store, &filters))))
}

/// GET /api/state/:name/update/:control
async fn update_state(
    State(state): State<AppState>,
    Path((name, control)): Path<(String, String)>,
    Query(params): Query<FilterParams>,
) -> ApiResult<PageView> {
    let control: Control = control.parse()?;
    let filters = StateFilters::from_params(&name, &params, &state.store)?;
    Ok(Json(ApiResponse::ok(pages::state::update(
        &state.store,
        &filters,
        control,
    )?)))
}

/// GET /api/state/:name/export - CSV of the state's filtered year/category slice
async fn export_state(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(params): Query<FilterParams>,
) -> Result<Response, ApiError> {
    let filters = StateFilters::from_params(&name, &params, &state.store)?;
    let slice = pages::state::current_slice(&state.store, &filters);
    let bytes = to_csv_bytes(&slice).map_err(|e| ApiError::Internal(e.to_string()))?;
    info!(state = %name, rows = slice.len(), "Exported state CSV");
    Ok(csv_response(
        bytes,
        &state_filename(&name, state.store.year_bounds()),
    ))
}

/// GET /api/map/resolve/:code - Map click to report page
async fn resolve_map_click(Path(code): Path<String>) -> ApiResult<ResolvedState> {
    let name = state_name(&code)
        .ok_or_else(|| ApiError::NotFound(format!("unknown state code '{}'", code)))?;
    Ok(Json(ApiResponse::ok(ResolvedState {
        code: code.to_uppercase(),
        state_name: name.to_string(),
        path: report_path(name),
    })))
}

fn csv_response(bytes: Vec<u8>, filename: &str) -> Response {
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        bytes,
    )
        .into_response()
}

// ============================================================================
// Pages
// ============================================================================

/// GET / - National overview
async fn serve_national() -> impl IntoResponse {
    Html(include_str!("../web/national.html"))
}

/// GET /state - Report for the configured default state
async fn serve_default_state(State(state): State<AppState>) -> impl IntoResponse {
    Redirect::temporary(&report_path(&state.config.defaults.state))
}

/// GET /state/:name - State report (the page reads the name from its URL)
async fn serve_state() -> impl IntoResponse {
    Html(include_str!("../web/state.html"))
}

// ============================================================================
// Router
// ============================================================================

pub fn build_router(state: AppState) -> Router {
    let static_dir = state.config.static_dir.clone();

    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/options", get(get_options))
        .route("/national", get(get_national))
        .route("/national/update/:control", get(update_national))
        .route("/national/export", get(export_national))
        .route("/state/:name", get(get_state))
        .route("/state/:name/update/:control", get(update_state))
        .route("/state/:name/export", get(export_state))
        .route("/map/resolve/:code", get(resolve_map_click))
        .with_state(state.clone());

    Router::new()
        .route("/", get(serve_national))
        .route("/state", get(serve_default_state))
        .route("/state/:name", get(serve_state))
        .with_state(state)
        .nest("/api", api_routes)
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

pub async fn serve(state: AppState, addr: SocketAddr) -> std::io::Result<()> {
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", addr);
    axum::serve(listener, app).await
}
