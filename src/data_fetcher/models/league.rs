use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::Payload;

/// League metadata as returned by `GET /league/{league_id}`.
///
/// Only `league_id` is required. Fields the crate does not model are kept in
/// `extra` so the payload serializes back to what upstream sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct League {
    pub league_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sport: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_rosters: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_league_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub draft_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roster_positions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scoring_settings: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Payload for League {
    fn validate(&self) -> Result<(), String> {
        if self.league_id.trim().is_empty() {
            return Err("league_id is empty".to_string());
        }
        Ok(())
    }
}
