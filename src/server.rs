use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::llm::GenerationClient;
use crate::reminders::{NewReminder, Reminder, ReminderPatch, ReminderStore};
use crate::router::{ChatRouter, IncomingMessage, RouteError, DEFAULT_CONTEXT};
use crate::weather::WeatherLookup;

/// Shared application state, built once in main and handed to every handler.
pub struct AppState {
    pub router: ChatRouter,
    pub qa: GenerationClient,
    pub summarizer: GenerationClient,
    pub weather: Arc<dyn WeatherLookup>,
    pub reminders: ReminderStore,
}

type ApiError = (StatusCode, String);

fn internal_error(context: &str, e: anyhow::Error) -> ApiError {
    error!("{}: {:#}", context, e);
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

// ── Request / response types ───────────────────────────────────────────────

#[derive(Deserialize)]
struct ChatRequest {
    message: String,
    #[serde(default = "default_context")]
    context: String,
}

fn default_context() -> String {
    DEFAULT_CONTEXT.to_string()
}

#[derive(Serialize)]
struct ChatResponse {
    response: String,
}

#[derive(Deserialize)]
struct QaRequest {
    question: String,
    context: String,
}

#[derive(Serialize)]
struct QaResponse {
    answer: String,
}

#[derive(Deserialize)]
struct SummarizeRequest {
    text: String,
}

#[derive(Serialize)]
struct SummarizeResponse {
    summary: String,
}

#[derive(Deserialize)]
struct WeatherRequest {
    city: String,
}

#[derive(Serialize)]
struct WeatherResponse {
    temperature: f64,
    description: String,
}

#[derive(Serialize)]
struct RootResponse {
    message: &'static str,
}

// ── Handlers ───────────────────────────────────────────────────────────────

async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "AI-Twin API is running",
    })
}

async fn chat(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    info!(
        "Received chat request: {} (context: {})",
        request.message, request.context
    );

    let msg = IncomingMessage::with_context(request.message, request.context);
    match state.router.route(&msg).await {
        Ok(reply) => {
            info!("Sending chat response: {}", reply.text);
            Ok(Json(ChatResponse {
                response: reply.text,
            }))
        }
        Err(e @ RouteError::EmptyMessage) => Err((StatusCode::BAD_REQUEST, e.to_string())),
        Err(e @ RouteError::PoemUnavailable(_)) => {
            error!("Error processing chat request: {}", e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}

async fn qa(
    State(state): State<Arc<AppState>>,
    Json(request): Json<QaRequest>,
) -> Result<Json<QaResponse>, ApiError> {
    let answer = state
        .qa
        .answer(&request.question, &request.context)
        .await
        .map_err(|e| internal_error("Error answering question", e))?;
    Ok(Json(QaResponse { answer }))
}

async fn summarize(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SummarizeRequest>,
) -> Result<Json<SummarizeResponse>, ApiError> {
    let summary = state
        .summarizer
        .summarize(&request.text)
        .await
        .map_err(|e| internal_error("Error summarizing text", e))?;
    Ok(Json(SummarizeResponse { summary }))
}

async fn city_weather(
    State(state): State<Arc<AppState>>,
    Json(request): Json<WeatherRequest>,
) -> Result<Json<WeatherResponse>, ApiError> {
    match state.weather.lookup(&request.city).await {
        Some(report) => Ok(Json(WeatherResponse {
            temperature: report.temperature,
            description: report.description,
        })),
        None => Err((
            StatusCode::NOT_FOUND,
            "City not found or weather data unavailable".to_string(),
        )),
    }
}

async fn create_reminder(
    State(state): State<Arc<AppState>>,
    Json(reminder): Json<NewReminder>,
) -> Result<Json<Vec<Reminder>>, ApiError> {
    let rows = state
        .reminders
        .create(&reminder)
        .await
        .map_err(|e| internal_error("Error creating reminder", e))?;
    Ok(Json(rows))
}

async fn get_reminders(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<Reminder>>, ApiError> {
    let rows = state
        .reminders
        .list_for_user(&user_id)
        .await
        .map_err(|e| internal_error("Error getting reminders", e))?;
    Ok(Json(rows))
}

async fn update_reminder(
    State(state): State<Arc<AppState>>,
    Path(reminder_id): Path<i64>,
    Json(patch): Json<ReminderPatch>,
) -> Result<Json<Vec<Reminder>>, ApiError> {
    if patch.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            "No fields to update".to_string(),
        ));
    }
    let rows = state
        .reminders
        .update(reminder_id, &patch)
        .await
        .map_err(|e| internal_error("Error updating reminder", e))?;
    Ok(Json(rows))
}

async fn delete_reminder(
    State(state): State<Arc<AppState>>,
    Path(reminder_id): Path<i64>,
) -> Result<Json<Vec<Reminder>>, ApiError> {
    let rows = state
        .reminders
        .delete(reminder_id)
        .await
        .map_err(|e| internal_error("Error deleting reminder", e))?;
    Ok(Json(rows))
}

// ── Wiring ─────────────────────────────────────────────────────────────────

pub fn app(state: Arc<AppState>) -> Router {
    // GET takes a user id while PUT/DELETE take a reminder id; the original
    // API shape shares the one path segment between them.
    Router::new()
        .route("/", get(root))
        .route("/chat", post(chat))
        .route("/qa", post(qa))
        .route("/summarize", post(summarize))
        .route("/weather/", post(city_weather))
        .route("/reminders/", post(create_reminder))
        .route(
            "/reminders/{id}",
            get(get_reminders)
                .put(update_reminder)
                .delete(delete_reminder),
        )
        .with_state(state)
}

pub async fn run(state: Arc<AppState>, addr: &str) -> anyhow::Result<()> {
    use anyhow::Context;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    info!("Listening on http://{}", addr);

    axum::serve(listener, app(state))
        .await
        .context("Server error")?;

    Ok(())
}
