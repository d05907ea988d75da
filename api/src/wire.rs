/// Match Store wire types: serde shapes for the backend's JSON.
/// These map to the clean domain types in client.rs.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// Identifiers come back as numbers from some backends and strings from others.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum WireId {
    Text(String),
    Number(i64),
}

impl WireId {
    pub fn into_string(self) -> String {
        match self {
            WireId::Text(s) => s,
            WireId::Number(n) => n.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MatchResponse {
    pub id: Option<WireId>,
    pub regulation_duration: Option<u32>,
    pub team1_id: Option<WireId>,
    pub team2_id: Option<WireId>,
    pub team1_name: Option<String>,
    pub team2_name: Option<String>,
    pub team1_score: Option<u32>,
    pub team2_score: Option<u32>,
    pub team1_fouls: Option<u32>,
    pub team2_fouls: Option<u32>,
    pub status: Option<String>,
    pub winner_id: Option<WireId>,
    pub win_reason: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScoreboardPayload {
    pub team1_score: u32,
    pub team2_score: u32,
    pub team1_fouls: u32,
    pub team2_fouls: u32,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EndMatchPayload {
    pub winner_id: Option<String>,
    pub win_reason: &'static str,
}

/// Administrative result edit: the corrected counters plus the recomputed result.
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResultPayload {
    #[serde(flatten)]
    pub scoreboard: ScoreboardPayload,
    pub winner_id: Option<String>,
    pub win_reason: &'static str,
}
