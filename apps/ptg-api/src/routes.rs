use axum::{
	Json, Router,
	extract::State,
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::Serialize;

use crate::state::AppState;
use ptg_service::{
	ChatRequest, Error, IndexReport, IndexRequest, LikeResponse, RateRequest, StartRequest,
	StartResponse, SuggestionResponse, UpsertEventsRequest, UpsertEventsResponse,
};

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/start", post(start))
		.route("/v1/chat", post(chat))
		.route("/v1/dislike", post(dislike))
		.route("/v1/like", post(like))
		.with_state(state)
}

pub fn admin_router(state: AppState) -> Router {
	Router::new()
		.route("/v1/admin/events", post(upsert_events))
		.route("/v1/admin/reindex", post(reindex))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn start(
	State(state): State<AppState>,
	Json(payload): Json<StartRequest>,
) -> Result<Json<StartResponse>, ApiError> {
	let response = state.service.start(payload).await?;

	Ok(Json(response))
}

async fn chat(
	State(state): State<AppState>,
	Json(payload): Json<ChatRequest>,
) -> Result<Json<SuggestionResponse>, ApiError> {
	let response = state.service.chat(payload).await?;

	Ok(Json(response))
}

async fn dislike(
	State(state): State<AppState>,
	Json(payload): Json<RateRequest>,
) -> Result<Json<SuggestionResponse>, ApiError> {
	let response = state.service.dislike(payload).await?;

	Ok(Json(response))
}

async fn like(
	State(state): State<AppState>,
	Json(payload): Json<RateRequest>,
) -> Result<Json<LikeResponse>, ApiError> {
	let response = state.service.like(payload).await?;

	Ok(Json(response))
}

async fn upsert_events(
	State(state): State<AppState>,
	Json(payload): Json<UpsertEventsRequest>,
) -> Result<Json<UpsertEventsResponse>, ApiError> {
	let response = state.service.upsert_events(payload).await?;

	Ok(Json(response))
}

async fn reindex(
	State(state): State<AppState>,
	payload: Option<Json<IndexRequest>>,
) -> Result<Json<IndexReport>, ApiError> {
	let request = payload.map(|Json(request)| request).unwrap_or_default();
	let response = state.service.index_events(request).await?;

	Ok(Json(response))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}
impl ApiError {
	fn new(
		status: StatusCode,
		error_code: impl Into<String>,
		message: impl Into<String>,
		fields: Option<Vec<String>>,
	) -> Self {
		Self { status, error_code: error_code.into(), message: message.into(), fields }
	}
}

impl From<Error> for ApiError {
	fn from(err: Error) -> Self {
		match err {
			Error::InvalidRequest { message } => {
				let fields = field_path(&message).map(|field| vec![field]);

				ApiError::new(StatusCode::BAD_REQUEST, "invalid_request", message, fields)
			},
			Error::NotFound { message } =>
				ApiError::new(StatusCode::NOT_FOUND, "not_found", message, None),
			Error::Provider { message } => {
				tracing::error!(error = %message, "Provider call failed.");

				ApiError::new(
					StatusCode::BAD_GATEWAY,
					"provider_error",
					"Upstream model provider failed.",
					None,
				)
			},
			Error::Storage { message } => {
				tracing::error!(error = %message, "Storage error.");

				ApiError::new(
					StatusCode::INTERNAL_SERVER_ERROR,
					"storage_error",
					"Internal storage error.",
					None,
				)
			},
			Error::Qdrant { message } => {
				tracing::error!(error = %message, "Qdrant error.");

				ApiError::new(
					StatusCode::INTERNAL_SERVER_ERROR,
					"qdrant_error",
					"Internal vector store error.",
					None,
				)
			},
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body =
			ErrorBody { error_code: self.error_code, message: self.message, fields: self.fields };

		(self.status, Json(body)).into_response()
	}
}

/// Pulls a leading JSON path such as `$.events[0].name` out of a validation message.
fn field_path(message: &str) -> Option<String> {
	let path = message.split_whitespace().next()?;

	path.starts_with("$.").then(|| path.to_string())
}
