use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::Payload;

/// Current NFL season state as returned by `GET /state/nfl`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NflState {
    pub season: String,
    pub week: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_week: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leg: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub league_season: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_season: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season_start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub league_create_season: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Payload for NflState {
    // A state without a season is what upstream sends before it is ready;
    // it must never be cached.
    fn validate(&self) -> Result<(), String> {
        if self.season.trim().is_empty() {
            return Err("season is empty".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_state() -> Value {
        json!({
            "week": 2,
            "season_type": "regular",
            "season_start_date": "2024-09-05",
            "season": "2024",
            "previous_season": "2023",
            "leg": 2,
            "league_season": "2024",
            "league_create_season": "2024",
            "display_week": 2
        })
    }

    #[test]
    fn test_parses_upstream_shape() {
        let state: NflState = serde_json::from_value(sample_state()).unwrap();

        assert_eq!(state.season, "2024");
        assert_eq!(state.week, 2);
        assert_eq!(state.season_type.as_deref(), Some("regular"));
        assert_eq!(state.display_week, Some(2));
        assert!(state.extra.is_empty());
        assert!(state.validate().is_ok());
    }

    #[test]
    fn test_week_must_be_numeric() {
        let result = serde_json::from_value::<NflState>(json!({ "season": "2024", "week": "two" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_season_fails_validation() {
        let state: NflState = serde_json::from_value(json!({ "season": "", "week": 0 })).unwrap();
        assert!(state.validate().is_err());
    }
}
