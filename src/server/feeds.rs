use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Local, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Baby, Feed};

use super::{failure, AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddFeedRequest {
    feed_type: String,
    #[serde(default)]
    amount_ml: Option<f64>,
    #[serde(default)]
    notes: Option<String>,
    #[serde(default)]
    custom_time: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
struct FeedResponse {
    success: bool,
    feed: Feed,
}

pub async fn add_feed(State(state): State<AppState>, Json(req): Json<AddFeedRequest>) -> Response {
    match create_feed(&state, req).await {
        Ok(feed) => (
            StatusCode::OK,
            Json(FeedResponse {
                success: true,
                feed,
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Error adding feed: {}", e);
            failure(StatusCode::INTERNAL_SERVER_ERROR, "Failed to add feed")
        }
    }
}

async fn create_feed(state: &AppState, req: AddFeedRequest) -> Result<Feed, sqlx::Error> {
    // The single tracked baby is the first one created; bootstrap it with a
    // placeholder name the first time a feed is logged.
    let baby = match state.babies.first().await? {
        Some(baby) => baby,
        None => state.babies.create(&Baby::new("Baby")).await?,
    };

    let feed_type = state.feed_types.resolve_or_create(&req.feed_type).await?;
    let feed_time = req.custom_time.unwrap_or_else(Utc::now);

    let mut feed = Feed::new(baby.id, feed_type.id, feed_time);
    feed.amount_ml = req.amount_ml;
    feed.notes = req.notes;

    let created = state.feeds.create(&feed).await?;

    dispatch_notification(state, &created, &feed_type.name);

    Ok(created)
}

/// Fire-and-forget: the feed is already durable, so delivery runs on a
/// detached task and its outcome is only logged.
fn dispatch_notification(state: &AppState, feed: &Feed, type_name: &str) {
    let emoji = if type_name == "Milk" { "🍼" } else { "🍽️" };
    let message = format!("{} *{} logged*", emoji, type_name);

    let local_time = feed.start_time.with_timezone(&Local);
    let mut details = vec![(
        "Time".to_string(),
        local_time.format("%-I:%M %p").to_string(),
    )];
    if let Some(amount) = feed.amount_ml {
        details.push(("Amount".to_string(), format!("{} ml", amount.round() as i64)));
    }
    if let Some(notes) = &feed.notes {
        details.push(("Notes".to_string(), notes.clone()));
    }

    let notifier = state.notifier.clone();
    tokio::spawn(async move {
        if let Err(e) = notifier.notify(&message, &details).await {
            tracing::warn!("Feed notification failed: {}", e);
        }
    });
}

#[derive(Debug, Deserialize)]
pub struct DeleteFeedQuery {
    #[serde(default)]
    id: Option<Uuid>,
}

#[derive(Serialize)]
struct DeleteFeedResponse {
    success: bool,
}

pub async fn delete_feed(
    State(state): State<AppState>,
    Query(query): Query<DeleteFeedQuery>,
) -> Response {
    let id = match query.id {
        Some(id) => id,
        None => return failure(StatusCode::BAD_REQUEST, "Feed ID is required"),
    };

    match state.feeds.delete(id).await {
        Ok(()) => (StatusCode::OK, Json(DeleteFeedResponse { success: true })).into_response(),
        Err(e) => {
            tracing::error!("Error deleting feed: {}", e);
            failure(StatusCode::INTERNAL_SERVER_ERROR, "Failed to delete feed")
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TodayQuery {
    #[serde(default)]
    date: Option<String>,
}

#[derive(Serialize)]
struct FeedListResponse {
    success: bool,
    feeds: Vec<Feed>,
}

pub async fn feeds_today(
    State(state): State<AppState>,
    Query(query): Query<TodayQuery>,
) -> Response {
    let date = match &query.date {
        Some(raw) => match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            Ok(date) => date,
            Err(_) => return failure(StatusCode::BAD_REQUEST, "Invalid date"),
        },
        None => Local::now().date_naive(),
    };

    let (start, end) = day_window(date);
    match state.feeds.list_between(start, end).await {
        Ok(feeds) => (
            StatusCode::OK,
            Json(FeedListResponse {
                success: true,
                feeds,
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Error fetching feeds: {}", e);
            failure(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch feeds")
        }
    }
}

/// The inclusive UTC window covering `date`'s local wall-clock day,
/// 00:00:00.000 through 23:59:59.999. The client builds its date parameter
/// from the same local calendar, so both sides agree on day boundaries.
pub(crate) fn day_window(date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = date.and_hms_opt(0, 0, 0).expect("midnight is valid");
    let end = date
        .and_hms_milli_opt(23, 59, 59, 999)
        .expect("end of day is valid");
    (to_utc_instant(start), to_utc_instant(end))
}

fn to_utc_instant(naive: NaiveDateTime) -> DateTime<Utc> {
    match naive.and_local_timezone(Local) {
        LocalResult::Single(t) => t.with_timezone(&Utc),
        // DST fold: take the earlier instant
        LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
        // DST gap: the wall-clock time does not exist locally
        LocalResult::None => Utc.from_utc_datetime(&naive),
    }
}
