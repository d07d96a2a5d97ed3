use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::baby::Baby;
use super::feed_type::FeedType;

/// A single logged feeding event.
///
/// Feeds are instantaneous: `end_time` always equals `start_time`.
/// `amount_ml` is only populated for milk feeds; that rule is enforced by
/// the caller, not the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feed {
    pub id: Uuid,
    pub baby_id: Uuid,
    pub feed_type_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub amount_ml: Option<f64>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feed_type: Option<FeedType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baby: Option<Baby>,
}

impl Feed {
    pub fn new(baby_id: Uuid, feed_type_id: Uuid, time: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            baby_id,
            feed_type_id,
            start_time: time,
            end_time: time,
            amount_ml: None,
            notes: None,
            created_at: Utc::now(),
            feed_type: None,
            baby: None,
        }
    }

    pub fn with_amount_ml(mut self, amount_ml: f64) -> Self {
        self.amount_ml = Some(amount_ml);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}
