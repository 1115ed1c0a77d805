//! HTTP request handlers for the Router service.
//!
//! Exposes the evaluation engine over stateless snapshot endpoints and over
//! stored analysis sessions, using axum.

use crate::rate_limit::{RateLimited, RateLimiter};
use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{delete, get, post, put},
    Router as AxumRouter,
};
use heuer_domain::traits::SessionStore;
use heuer_domain::{
    render_matrix, sort_by_diagnosticity, AnalysisSession, AnalysisSnapshot, Completeness,
    ConfidenceLevel, DiagnosticityResult, EngineError, EvidenceId, EvidenceRef, Hypothesis,
    HypothesisEngine, HypothesisId, LikelihoodAssessment, LikelihoodResult, MatrixView,
    OrphanScore, ScaleType, ScoreEntry, ScoreKey, SessionId, SessionSummary,
};
use heuer_store::{SqliteStore, StoreError};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// Header naming the analyst a write is charged to
pub const ANALYST_HEADER: &str = "x-analyst-id";

/// Analyst used when the header is missing
pub const ANONYMOUS_ANALYST: &str = "anonymous";

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Session storage
    pub store: Arc<Mutex<SqliteStore>>,
    /// Engine configured with the confidence policy
    pub engine: HypothesisEngine,
    /// Write limiter
    pub limiter: RateLimiter,
}

impl AppState {
    /// Assemble state from its parts
    pub fn new(store: SqliteStore, engine: HypothesisEngine, limiter: RateLimiter) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            engine,
            limiter,
        }
    }
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    /// Overall health status
    pub status: String,
    /// Service version
    pub version: String,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Machine-readable error kind, for engine errors
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    /// The engine rejected the input
    Engine(EngineError),
    /// Session does not exist
    NotFound(String),
    /// Analyst is over the write limit
    RateLimited(RateLimited),
    /// Storage failure
    Store(StoreError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, kind) = match self {
            AppError::Engine(e) => (StatusCode::UNPROCESSABLE_ENTITY, e.to_string(), Some(e.kind())),
            AppError::NotFound(what) => (StatusCode::NOT_FOUND, what, None),
            AppError::RateLimited(e) => {
                let body = Json(ErrorResponse {
                    error: e.to_string(),
                    kind: Some("rate_limited".to_string()),
                });
                return (
                    StatusCode::TOO_MANY_REQUESTS,
                    [(header::RETRY_AFTER, e.retry_after_secs.to_string())],
                    body,
                )
                    .into_response();
            }
            AppError::Store(e) => {
                warn!(error = %e, "Store operation failed");
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string(), None)
            }
        };

        let body = Json(ErrorResponse {
            error: message,
            kind: kind.map(str::to_string),
        });
        (status, body).into_response()
    }
}

impl From<EngineError> for AppError {
    fn from(e: EngineError) -> Self {
        AppError::Engine(e)
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Engine(e) => AppError::Engine(e),
            StoreError::NotFound(id) => AppError::NotFound(format!("Session not found: {}", id)),
            other => AppError::Store(other),
        }
    }
}

impl From<RateLimited> for AppError {
    fn from(e: RateLimited) -> Self {
        AppError::RateLimited(e)
    }
}

/// Diagnosticity results plus skipped orphan scores
#[derive(Debug, Serialize, Deserialize)]
pub struct DiagnosticityResponse {
    /// One entry per evidence item
    pub results: Vec<DiagnosticityResult>,
    /// Orphan scores excluded from the computation
    pub warnings: Vec<OrphanScore>,
}

/// Likelihood ranking plus skipped orphan scores
#[derive(Debug, Serialize, Deserialize)]
pub struct LikelihoodResponse {
    /// Hypotheses in rank order
    pub results: Vec<LikelihoodResult>,
    /// Confidence that rank 1 beats rank 2
    pub confidence: ConfidenceLevel,
    /// Percentage-point gap between ranks 1 and 2
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gap: Option<f64>,
    /// Orphan scores excluded from the computation
    pub warnings: Vec<OrphanScore>,
}

impl LikelihoodResponse {
    fn new(assessment: LikelihoodAssessment, warnings: Vec<OrphanScore>) -> Self {
        Self {
            results: assessment.results,
            confidence: assessment.confidence,
            gap: assessment.gap,
            warnings,
        }
    }
}

/// Query options for diagnosticity endpoints
#[derive(Debug, Default, Deserialize)]
pub struct DiagnosticityQuery {
    /// Most diagnostic first instead of evidence order
    #[serde(default)]
    pub sorted: bool,
}

/// Session creation request
#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    /// Analysis title
    pub title: String,
    /// Scale for every score in the session
    #[serde(default)]
    pub scale_type: ScaleType,
    /// Competing hypotheses (at least one)
    pub hypotheses: Vec<Hypothesis>,
    /// Evidence references
    #[serde(default)]
    pub evidence: Vec<EvidenceRef>,
}

/// Full session view
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    /// Session identifier
    pub id: SessionId,
    /// Analysis title
    pub title: String,
    /// Active scale
    pub scale_type: ScaleType,
    /// Creation time (milliseconds since Unix epoch)
    pub created_at: u64,
    /// Hypotheses in tie-break order
    pub hypotheses: Vec<Hypothesis>,
    /// Evidence references
    pub evidence: Vec<EvidenceRef>,
    /// Explicit scores
    pub scores: Vec<ScoreEntry>,
    /// Share of cells scored
    pub completeness: Completeness,
}

impl From<&AnalysisSession> for SessionResponse {
    fn from(session: &AnalysisSession) -> Self {
        Self {
            id: session.id(),
            title: session.title().to_string(),
            scale_type: session.scale(),
            created_at: session.created_at(),
            hypotheses: session.hypotheses().to_vec(),
            evidence: session.evidence().to_vec(),
            scores: session.snapshot().scores,
            completeness: session.completeness(),
        }
    }
}

/// Score write request
#[derive(Debug, Deserialize)]
pub struct PutScoreRequest {
    /// Hypothesis being scored
    pub hypothesis_id: HypothesisId,
    /// Evidence being scored
    pub evidence_id: EvidenceId,
    /// Value on the session's scale
    pub value: i32,
}

/// Echo of a stored score
#[derive(Debug, Serialize, Deserialize)]
pub struct ScoreResponse {
    /// Hypothesis scored
    pub hypothesis_id: HypothesisId,
    /// Evidence scored
    pub evidence_id: EvidenceId,
    /// Stored value
    pub value: i32,
    /// Strength label for the value
    pub label: String,
    /// Matrix glyph for the value
    pub symbol: String,
}

/// Scale change request
#[derive(Debug, Deserialize)]
pub struct ChangeScaleRequest {
    /// New scale
    pub scale_type: ScaleType,
}

/// Result of a scale change
#[derive(Debug, Serialize, Deserialize)]
pub struct ChangeScaleResponse {
    /// Scale now in effect
    pub scale_type: ScaleType,
    /// Cells removed because the new scale rejects their values
    pub removed: Vec<ScoreKey>,
}

fn analyst_id(headers: &HeaderMap) -> &str {
    headers
        .get(ANALYST_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(ANONYMOUS_ANALYST)
}

fn parse_session_id(raw: &str) -> Result<SessionId, AppError> {
    SessionId::from_string(raw).map_err(|_| AppError::NotFound(format!("Session not found: {}", raw)))
}

fn log_orphans(warnings: &[OrphanScore]) {
    for orphan in warnings {
        warn!(
            hypothesis_id = %orphan.hypothesis_id,
            evidence_id = %orphan.evidence_id,
            "{}",
            orphan
        );
    }
}

fn load_session(state: &AppState, id: SessionId) -> Result<AnalysisSession, AppError> {
    let store = state.store.lock().unwrap();
    store
        .get_session(id)?
        .ok_or_else(|| AppError::NotFound(format!("Session not found: {}", id)))
}

fn diagnosticity_response(
    state: &AppState,
    snapshot: &AnalysisSnapshot,
    query: &DiagnosticityQuery,
) -> Result<DiagnosticityResponse, AppError> {
    let assessment = state.engine.compute_diagnosticity(snapshot)?;
    log_orphans(&assessment.warnings);

    let mut results = assessment.value;
    if query.sorted {
        sort_by_diagnosticity(&mut results);
    }

    Ok(DiagnosticityResponse {
        results,
        warnings: assessment.warnings,
    })
}

fn likelihood_response(state: &AppState, snapshot: &AnalysisSnapshot) -> Result<LikelihoodResponse, AppError> {
    let assessment = state.engine.compute_likelihood(snapshot)?;
    log_orphans(&assessment.warnings);
    Ok(LikelihoodResponse::new(assessment.value, assessment.warnings))
}

/// POST /analysis/diagnosticity - Rate evidence in a supplied snapshot
async fn analyze_diagnosticity(
    State(state): State<AppState>,
    Query(query): Query<DiagnosticityQuery>,
    Json(snapshot): Json<AnalysisSnapshot>,
) -> Result<Json<DiagnosticityResponse>, AppError> {
    Ok(Json(diagnosticity_response(&state, &snapshot, &query)?))
}

/// POST /analysis/likelihood - Rank hypotheses in a supplied snapshot
async fn analyze_likelihood(
    State(state): State<AppState>,
    Json(snapshot): Json<AnalysisSnapshot>,
) -> Result<Json<LikelihoodResponse>, AppError> {
    Ok(Json(likelihood_response(&state, &snapshot)?))
}

/// POST /sessions - Create an analysis session
async fn create_session(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<SessionResponse>), AppError> {
    let analyst = analyst_id(&headers);
    state.limiter.check(analyst)?;

    let mut store = state.store.lock().unwrap();
    let id = store.create_session(&request.title, request.scale_type, request.hypotheses, request.evidence)?;
    let session = store
        .get_session(id)?
        .ok_or_else(|| AppError::NotFound(format!("Session not found: {}", id)))?;

    info!(session_id = %id, analyst, "Session created");
    Ok((StatusCode::CREATED, Json(SessionResponse::from(&session))))
}

/// GET /sessions - List sessions
async fn list_sessions(State(state): State<AppState>) -> Result<Json<Vec<SessionSummary>>, AppError> {
    let store = state.store.lock().unwrap();
    Ok(Json(store.list_sessions()?))
}

/// GET /sessions/:id - Full session with scores
async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, AppError> {
    let session = load_session(&state, parse_session_id(&id)?)?;
    Ok(Json(SessionResponse::from(&session)))
}

/// DELETE /sessions/:id - Delete a session and its scores
async fn delete_session(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_session_id(&id)?;
    let analyst = analyst_id(&headers);
    state.limiter.check(analyst)?;

    let mut store = state.store.lock().unwrap();
    if !store.delete_session(id)? {
        return Err(AppError::NotFound(format!("Session not found: {}", id)));
    }

    info!(session_id = %id, analyst, "Session deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /sessions/:id/scores - Write one score (last write wins)
async fn put_score(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(request): Json<PutScoreRequest>,
) -> Result<Json<ScoreResponse>, AppError> {
    let id = parse_session_id(&id)?;
    let analyst = analyst_id(&headers);
    state.limiter.check(analyst)?;

    let mut store = state.store.lock().unwrap();
    store.put_score(id, &request.hypothesis_id, &request.evidence_id, request.value)?;
    let scale = store
        .get_session(id)?
        .map(|s| s.scale())
        .ok_or_else(|| AppError::NotFound(format!("Session not found: {}", id)))?;

    debug!(session_id = %id, analyst, value = request.value, "Score written");
    Ok(Json(ScoreResponse {
        label: scale.label(request.value).to_string(),
        symbol: scale.symbol(request.value).to_string(),
        hypothesis_id: request.hypothesis_id,
        evidence_id: request.evidence_id,
        value: request.value,
    }))
}

/// DELETE /sessions/:id/scores/:hypothesis_id/:evidence_id - Clear one score
async fn clear_score(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((id, hypothesis_id, evidence_id)): Path<(String, String, String)>,
) -> Result<StatusCode, AppError> {
    let id = parse_session_id(&id)?;
    state.limiter.check(analyst_id(&headers))?;

    let mut store = state.store.lock().unwrap();
    let removed = store.clear_score(id, &HypothesisId::new(hypothesis_id), &EvidenceId::new(evidence_id))?;
    if !removed {
        return Err(AppError::NotFound("Score not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// PUT /sessions/:id/scale - Switch scale, discarding out-of-range scores
async fn change_scale(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(request): Json<ChangeScaleRequest>,
) -> Result<Json<ChangeScaleResponse>, AppError> {
    let id = parse_session_id(&id)?;
    state.limiter.check(analyst_id(&headers))?;

    let mut store = state.store.lock().unwrap();
    let removed = store.change_scale(id, request.scale_type)?;

    Ok(Json(ChangeScaleResponse {
        scale_type: request.scale_type,
        removed,
    }))
}

/// GET /sessions/:id/diagnosticity - Rate evidence in a stored session
async fn session_diagnosticity(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<DiagnosticityQuery>,
) -> Result<Json<DiagnosticityResponse>, AppError> {
    let session = load_session(&state, parse_session_id(&id)?)?;
    Ok(Json(diagnosticity_response(&state, &session.snapshot(), &query)?))
}

/// GET /sessions/:id/likelihood - Rank hypotheses in a stored session
async fn session_likelihood(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<LikelihoodResponse>, AppError> {
    let session = load_session(&state, parse_session_id(&id)?)?;
    Ok(Json(likelihood_response(&state, &session.snapshot())?))
}

/// GET /sessions/:id/completeness
async fn session_completeness(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Completeness>, AppError> {
    let session = load_session(&state, parse_session_id(&id)?)?;
    Ok(Json(session.completeness()))
}

/// GET /sessions/:id/matrix - Glyph grid for display
async fn session_matrix(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MatrixView>, AppError> {
    let session = load_session(&state, parse_session_id(&id)?)?;
    Ok(Json(render_matrix(session.matrix())))
}

/// GET /health
async fn health_check() -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Create the axum router with all routes
pub fn create_router(state: AppState) -> AxumRouter {
    AxumRouter::new()
        .route("/analysis/diagnosticity", post(analyze_diagnosticity))
        .route("/analysis/likelihood", post(analyze_likelihood))
        .route("/sessions", post(create_session).get(list_sessions))
        .route("/sessions/:id", get(get_session).delete(delete_session))
        .route("/sessions/:id/scores", put(put_score))
        .route("/sessions/:id/scores/:hypothesis_id/:evidence_id", delete(clear_score))
        .route("/sessions/:id/scale", put(change_scale))
        .route("/sessions/:id/diagnosticity", get(session_diagnosticity))
        .route("/sessions/:id/likelihood", get(session_likelihood))
        .route("/sessions/:id/completeness", get(session_completeness))
        .route("/sessions/:id/matrix", get(session_matrix))
        .route("/health", get(health_check))
        .with_state(state)
}
