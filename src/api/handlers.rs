use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    error::AppResult,
    models::{DailyWord, RecordOutcome, TriviaGame},
    selector::DateKey,
    services::DailyStats,
};

use super::AppState;

const DEFAULT_SLOT: u32 = 1;
const DEFAULT_PREVIEW_DAYS: u32 = 7;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct DailyWordQuery {
    pub date: Option<String>,
    pub slot: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct TriviaQuery {
    pub date: Option<String>,
    pub game: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct WordPreviewQuery {
    pub start: Option<String>,
    pub days: Option<u32>,
    pub slot: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct TriviaPreviewQuery {
    pub start: Option<String>,
    pub days: Option<u32>,
    pub game: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct RecordWordRequest {
    pub date: String,
    pub slot: Option<u32>,
    pub items: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct RecordTriviaRequest {
    pub date: String,
    pub game: Option<u32>,
    pub items: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub backend: &'static str,
    #[serde(flatten)]
    pub stats: DailyStats,
}

/// Today (UTC) when no date is given
fn parse_date(raw: Option<&str>) -> AppResult<DateKey> {
    match raw {
        Some(raw) => Ok(raw.parse::<DateKey>()?),
        None => Ok(DateKey::today()),
    }
}

// Handlers

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({ "status": "healthy", "store": state.store_backend })),
    )
}

/// Word of the day
pub async fn daily_word(
    State(state): State<AppState>,
    Query(params): Query<DailyWordQuery>,
) -> AppResult<Json<DailyWord>> {
    let date = parse_date(params.date.as_deref())?;
    let selection = state
        .words
        .resolve(date, params.slot.unwrap_or(DEFAULT_SLOT))
        .await;
    Ok(Json(DailyWord::from(&selection)))
}

/// Upcoming words, computed as if each day were resolved in turn
pub async fn preview_words(
    State(state): State<AppState>,
    Query(params): Query<WordPreviewQuery>,
) -> AppResult<Json<Vec<DailyWord>>> {
    let start = parse_date(params.start.as_deref())?;
    let selections = state
        .words
        .preview(
            start,
            params.days.unwrap_or(DEFAULT_PREVIEW_DAYS),
            params.slot.unwrap_or(DEFAULT_SLOT),
        )
        .await?;
    Ok(Json(selections.iter().map(DailyWord::from).collect()))
}

pub async fn record_word(
    State(state): State<AppState>,
    Json(request): Json<RecordWordRequest>,
) -> AppResult<Json<RecordOutcome>> {
    let date = parse_date(Some(&request.date))?;
    let slot = request.slot.unwrap_or(DEFAULT_SLOT);
    let recorded = state.words.record_played(date, slot, request.items).await?;
    Ok(Json(RecordOutcome { date, slot, recorded }))
}

pub async fn word_stats(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse {
        backend: state.store_backend,
        stats: state.words.stats().await,
    })
}

/// Wipes FlickWord history (debug only)
pub async fn clear_word_history(State(state): State<AppState>) -> StatusCode {
    state.words.clear_history().await;
    StatusCode::NO_CONTENT
}

/// Questions for one trivia game
pub async fn daily_trivia(
    State(state): State<AppState>,
    Query(params): Query<TriviaQuery>,
) -> AppResult<Json<TriviaGame>> {
    let date = parse_date(params.date.as_deref())?;
    let selection = state
        .trivia
        .resolve(date, params.game.unwrap_or(DEFAULT_SLOT))
        .await;
    Ok(Json(TriviaGame::from(&selection)))
}

pub async fn preview_trivia(
    State(state): State<AppState>,
    Query(params): Query<TriviaPreviewQuery>,
) -> AppResult<Json<Vec<TriviaGame>>> {
    let start = parse_date(params.start.as_deref())?;
    let selections = state
        .trivia
        .preview(
            start,
            params.days.unwrap_or(DEFAULT_PREVIEW_DAYS),
            params.game.unwrap_or(DEFAULT_SLOT),
        )
        .await?;
    Ok(Json(selections.iter().map(TriviaGame::from).collect()))
}

/// Marks a finished game's questions as played
pub async fn record_trivia(
    State(state): State<AppState>,
    Json(request): Json<RecordTriviaRequest>,
) -> AppResult<Json<RecordOutcome>> {
    let date = parse_date(Some(&request.date))?;
    let game = request.game.unwrap_or(DEFAULT_SLOT);
    let recorded = state.trivia.record_played(date, game, request.items).await?;
    Ok(Json(RecordOutcome {
        date,
        slot: game,
        recorded,
    }))
}

pub async fn trivia_stats(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse {
        backend: state.store_backend,
        stats: state.trivia.stats().await,
    })
}

/// Wipes trivia history (debug only)
pub async fn clear_trivia_history(State(state): State<AppState>) -> StatusCode {
    state.trivia.clear_history().await;
    StatusCode::NO_CONTENT
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    #[test]
    fn test_parse_date_accepts_timestamps() {
        let date = parse_date(Some("2024-02-29T23:30:00-05:00")).unwrap();
        assert_eq!(date, DateKey::from_ymd(2024, 3, 1).unwrap());
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert!(matches!(
            parse_date(Some("tomorrow")),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_parse_date_defaults_to_today() {
        assert_eq!(parse_date(None).unwrap(), DateKey::today());
    }
}
