use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Baby {
    pub id: Uuid,
    pub name: String,
    pub birth_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Baby {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            birth_date: now,
            created_at: now,
        }
    }

    pub fn with_birth_date(mut self, birth_date: DateTime<Utc>) -> Self {
        self.birth_date = birth_date;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_baby_new() {
        let baby = Baby::new("Ada");
        assert_eq!(baby.name, "Ada");
        assert_eq!(baby.birth_date, baby.created_at);
    }

    #[test]
    fn test_baby_with_birth_date() {
        let birth = Utc.with_ymd_and_hms(2025, 3, 1, 8, 30, 0).unwrap();
        let baby = Baby::new("Ada").with_birth_date(birth);
        assert_eq!(baby.birth_date, birth);
        assert_ne!(baby.birth_date, baby.created_at);
    }

    #[test]
    fn test_baby_serializes_camel_case() {
        let baby = Baby::new("Ada");
        let json = serde_json::to_value(&baby).unwrap();
        assert!(json.get("birthDate").is_some());
        assert!(json.get("createdAt").is_some());
        assert_eq!(json["name"], "Ada");
    }
}
