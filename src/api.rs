// 🌐 REST API with Axum
// /api/calculate, /api/history, plus parse/voice endpoints for the voice form

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;
use tower_http::cors::CorsLayer;

use crate::amount::Amount;
use crate::change::{calculate_change, Sale};
use crate::db::{get_history, insert_record, TransactionRecord};
use crate::error::{CalcError, ParseError};
use crate::parser::AmountParser;
use crate::segmenter::Segmenter;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Mutex<Connection>>,
    pub parser: Arc<AmountParser>,
    pub segmenter: Arc<Segmenter>,
}

impl AppState {
    pub fn new(conn: Connection, parser: AmountParser, segmenter: Segmenter) -> Self {
        AppState {
            db: Arc::new(Mutex::new(conn)),
            parser: Arc::new(parser),
            segmenter: Arc::new(segmenter),
        }
    }

    fn db(&self) -> Result<MutexGuard<'_, Connection>, ApiError> {
        self.db.lock().map_err(|_| ApiError::LockPoisoned)
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Calc(#[from] CalcError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),

    #[error("database lock poisoned")]
    LockPoisoned,
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) | ApiError::Calc(_) => StatusCode::BAD_REQUEST,
            ApiError::Parse(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Storage(_) | ApiError::LockPoisoned => {
                tracing::error!("Internal error: {}", self);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let message = match status {
            StatusCode::INTERNAL_SERVER_ERROR => "Internal server error".to_string(),
            _ => self.to_string(),
        };

        (
            status,
            Json(serde_json::json!({
                "success": false,
                "error": message,
            })),
        )
            .into_response()
    }
}

// ============================================================================
// Request / Response types
// ============================================================================

/// API Response wrapper
#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Both fields optional so a missing value is a 400, not a JSON rejection
#[derive(Debug, Deserialize)]
pub struct CalculateRequest {
    pub total: Option<f64>,
    pub received: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CalculateResponse {
    pub success: bool,
    pub change: Amount,
}

#[derive(Debug, Deserialize)]
pub struct HistoryRequest {
    pub total: Option<f64>,
    pub received: Option<f64>,
    /// Recomputed server-side; if sent it has to agree
    pub change: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct ParseRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct ParseResponse {
    pub success: bool,
    pub amount: Amount,
    pub rule: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct VoiceRequest {
    pub transcript: String,
}

#[derive(Debug, Serialize)]
pub struct VoiceResponse {
    pub success: bool,
    pub total: Option<Amount>,
    pub received: Option<Amount>,
    pub keyword: Option<String>,
}

fn required_amount(value: Option<f64>, field: &str) -> Result<Amount, ApiError> {
    let value = value.ok_or_else(|| ApiError::BadRequest(format!("Missing value: {}", field)))?;
    Amount::from_f64(value)
        .ok_or_else(|| ApiError::BadRequest(format!("Invalid number for {}", field)))
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// POST /api/calculate - received - total
async fn calculate(
    payload: Result<Json<CalculateRequest>, JsonRejection>,
) -> Result<Json<CalculateResponse>, ApiError> {
    let Json(request) = payload?;
    let total = required_amount(request.total, "total")?;
    let received = required_amount(request.received, "received")?;

    let change = calculate_change(total, received)?;

    Ok(Json(CalculateResponse {
        success: true,
        change,
    }))
}

/// GET /api/history - All stored sales, newest first, as a bare JSON array
async fn list_history(
    State(state): State<AppState>,
) -> Result<Json<Vec<TransactionRecord>>, ApiError> {
    let conn = state.db()?;
    let records = get_history(&conn)?;
    Ok(Json(records))
}

/// POST /api/history - Append a sale
async fn add_history(
    State(state): State<AppState>,
    payload: Result<Json<HistoryRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<TransactionRecord>>), ApiError> {
    let Json(request) = payload?;
    let total = required_amount(request.total, "total")?;
    let received = required_amount(request.received, "received")?;

    let sale = Sale::settle(total, received)?;
    if let Some(claimed) = request.change {
        let claimed = Amount::from_f64(claimed)
            .ok_or_else(|| ApiError::BadRequest("Invalid number for change".to_string()))?;
        if claimed != sale.change {
            return Err(ApiError::BadRequest(format!(
                "change {} does not match received - total ({})",
                claimed, sale.change
            )));
        }
    }

    let conn = state.db()?;
    let record = insert_record(&conn, &sale)?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(record))))
}

/// POST /api/parse - One phrase → amount
async fn parse_phrase(
    State(state): State<AppState>,
    payload: Result<Json<ParseRequest>, JsonRejection>,
) -> Result<Json<ParseResponse>, ApiError> {
    let Json(request) = payload?;
    let (amount, rule) = state.parser.parse_with_rule(&request.text)?;

    Ok(Json(ParseResponse {
        success: true,
        amount,
        rule,
    }))
}

/// POST /api/voice - Transcript → total + received
async fn parse_voice(
    State(state): State<AppState>,
    payload: Result<Json<VoiceRequest>, JsonRejection>,
) -> Result<Json<VoiceResponse>, ApiError> {
    let Json(request) = payload?;
    let amounts = state
        .segmenter
        .segment_and_parse(&state.parser, &request.transcript);

    Ok(Json(VoiceResponse {
        success: !amounts.is_unrecognized(),
        total: amounts.total,
        received: amounts.received,
        keyword: amounts.keyword,
    }))
}

// ============================================================================
// Router
// ============================================================================

pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/calculate", post(calculate))
        .route("/history", get(list_history).post(add_history))
        .route("/parse", post(parse_phrase))
        .route("/voice", post(parse_voice))
        .with_state(state);

    Router::new()
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive())
}
