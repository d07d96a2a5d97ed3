use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named feed category, e.g. "Milk" or "Feed".
///
/// Names are unique; records are created lazily the first time a name is
/// logged and reused afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedType {
    pub id: Uuid,
    pub name: String,
}

impl FeedType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
        }
    }
}
