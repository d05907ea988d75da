use crate::wire::{EndMatchPayload, MatchResponse, ResultPayload, ScoreboardPayload};
use crate::{Match, MatchResult, MatchStatus, Scoreboard, TeamRef, WinReason};
use reqwest::{Client, Method, StatusCode};
use serde::Serialize;
use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/api";

/// HTTP client for the Match Store backend.
///
/// No request timeout is set: a slow call resolves late instead of failing,
/// and the live clock never waits on it.
#[derive(Debug, Clone)]
pub struct MatchStoreClient {
    client: Client,
    base_url: String,
}

impl Default for MatchStoreClient {
    fn default() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("network error for {url}: {source}")]
    Network { url: String, source: reqwest::Error },
    #[error("match store returned {status} for {url}")]
    Status { url: String, status: StatusCode },
    #[error("parse error for {url}: {source}")]
    Parsing { url: String, source: reqwest::Error },
    #[error("invalid match record: {0}")]
    Invalid(String),
    #[error("not found: {0}")]
    NotFound(String),
}

impl MatchStoreClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::builder()
                .user_agent("livescore/0.1 (match operator console)")
                .build()
                .unwrap_or_default(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Load configuration, scoreboard, status and start timestamp of a match.
    pub async fn get_match(&self, match_id: &str) -> StoreResult<Match> {
        let url = self.match_url(match_id, "");
        let response = self.send(Method::GET, &url, None::<&()>).await?;
        let raw = response
            .json::<MatchResponse>()
            .await
            .map_err(|e| StoreError::Parsing { url: url.clone(), source: e })?;
        map_match(match_id, raw)
    }

    /// Move a `pending`/`postponed` match to `active`; the store records the start time.
    pub async fn start_match(&self, match_id: &str) -> StoreResult<()> {
        let url = self.match_url(match_id, "/start");
        self.send(Method::POST, &url, None::<&()>).await.map(drop)
    }

    /// Persist the full scoreboard snapshot.
    pub async fn update_scoreboard(&self, match_id: &str, board: &Scoreboard) -> StoreResult<()> {
        let url = self.match_url(match_id, "/scoreboard");
        let body = scoreboard_payload(board);
        self.send(Method::PUT, &url, Some(&body)).await.map(drop)
    }

    /// Move the match to `completed` with its result.
    pub async fn end_match(&self, match_id: &str, result: &MatchResult) -> StoreResult<()> {
        let url = self.match_url(match_id, "/end");
        let body = EndMatchPayload {
            winner_id: result.winner_id.clone(),
            win_reason: result.reason.label(),
        };
        self.send(Method::POST, &url, Some(&body)).await.map(drop)
    }

    /// Administrative correction of a completed match.
    pub async fn update_result(
        &self,
        match_id: &str,
        board: &Scoreboard,
        result: &MatchResult,
    ) -> StoreResult<()> {
        let url = self.match_url(match_id, "/result");
        let body = ResultPayload {
            scoreboard: scoreboard_payload(board),
            winner_id: result.winner_id.clone(),
            win_reason: result.reason.label(),
        };
        self.send(Method::PUT, &url, Some(&body)).await.map(drop)
    }

    fn match_url(&self, match_id: &str, suffix: &str) -> String {
        format!("{}/matches/{match_id}{suffix}", self.base_url)
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: &str,
        body: Option<&B>,
    ) -> StoreResult<reqwest::Response> {
        let mut request = self.client.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request
            .send()
            .await
            .map_err(|e| StoreError::Network { url: url.to_owned(), source: e })?;

        match response.status() {
            s if s.is_success() => Ok(response),
            StatusCode::NOT_FOUND => Err(StoreError::NotFound(url.to_owned())),
            status => Err(StoreError::Status { url: url.to_owned(), status }),
        }
    }
}

// ---------------------------------------------------------------------------
// Mapping: Match Store wire types → clean domain types
// ---------------------------------------------------------------------------

fn scoreboard_payload(board: &Scoreboard) -> ScoreboardPayload {
    ScoreboardPayload {
        team1_score: board.team1_score,
        team2_score: board.team2_score,
        team1_fouls: board.team1_fouls,
        team2_fouls: board.team2_fouls,
    }
}

fn map_match(requested_id: &str, raw: MatchResponse) -> StoreResult<Match> {
    let status = match raw.status.as_deref() {
        Some(s) => parse_status(s)
            .ok_or_else(|| StoreError::Invalid(format!("unknown match status `{s}`")))?,
        None => MatchStatus::Pending,
    };
    let win_reason = match raw.win_reason.as_deref() {
        Some(r) => Some(
            parse_win_reason(r)
                .ok_or_else(|| StoreError::Invalid(format!("unknown win reason `{r}`")))?,
        ),
        None => None,
    };

    let team1_id = raw.team1_id.map(|id| id.into_string());
    let team2_id = raw.team2_id.map(|id| id.into_string());
    let winner_id = raw.winner_id.map(|id| id.into_string());

    if let Some(winner) = winner_id.as_deref()
        && team1_id.as_deref() != Some(winner)
        && team2_id.as_deref() != Some(winner)
    {
        return Err(StoreError::Invalid(format!(
            "winner `{winner}` is neither team of match {requested_id}"
        )));
    }

    Ok(Match {
        id: raw
            .id
            .map(|id| id.into_string())
            .unwrap_or_else(|| requested_id.to_string()),
        regulation_duration: raw.regulation_duration.filter(|d| *d > 0),
        team1: TeamRef {
            name: raw.team1_name.unwrap_or_else(|| "Team 1".to_string()),
            id: team1_id,
        },
        team2: TeamRef {
            name: raw.team2_name.unwrap_or_else(|| "Team 2".to_string()),
            id: team2_id,
        },
        scoreboard: Scoreboard {
            team1_score: raw.team1_score.unwrap_or_default(),
            team2_score: raw.team2_score.unwrap_or_default(),
            team1_fouls: raw.team1_fouls.unwrap_or_default(),
            team2_fouls: raw.team2_fouls.unwrap_or_default(),
        },
        status,
        winner_id,
        win_reason,
        started_at: raw.start_time,
    })
}

fn parse_status(s: &str) -> Option<MatchStatus> {
    match s.trim().to_ascii_lowercase().as_str() {
        "pending" => Some(MatchStatus::Pending),
        "postponed" => Some(MatchStatus::Postponed),
        "active" => Some(MatchStatus::Active),
        "completed" => Some(MatchStatus::Completed),
        _ => None,
    }
}

fn parse_win_reason(s: &str) -> Option<WinReason> {
    match s.trim().to_ascii_lowercase().as_str() {
        "score" => Some(WinReason::Score),
        "fouls" => Some(WinReason::Fouls),
        "referee" => Some(WinReason::Referee),
        "draw" => Some(WinReason::Draw),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use mockito::Matcher;
    use serde_json::json;

    #[test]
    fn test_parse_status() {
        assert_eq!(parse_status("pending"), Some(MatchStatus::Pending));
        assert_eq!(parse_status("POSTPONED"), Some(MatchStatus::Postponed));
        assert_eq!(parse_status(" Active "), Some(MatchStatus::Active));
        assert_eq!(parse_status("completed"), Some(MatchStatus::Completed));
        assert_eq!(parse_status("cancelled"), None);
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = MatchStoreClient::with_base_url("http://example.test/api/");
        assert_eq!(client.match_url("7", "/start"), "http://example.test/api/matches/7/start");
    }

    #[test]
    fn mapping_fills_defaults_for_missing_counters() {
        let raw = MatchResponse {
            team1_id: Some(crate::wire::WireId::Number(11)),
            team2_id: Some(crate::wire::WireId::Text("b".into())),
            regulation_duration: Some(0),
            ..Default::default()
        };
        let m = map_match("42", raw).expect("record should map");
        assert_eq!(m.id, "42");
        assert_eq!(m.team1.id.as_deref(), Some("11"));
        assert_eq!(m.team1.name, "Team 1");
        assert_eq!(m.status, MatchStatus::Pending);
        assert_eq!(m.regulation_duration, None, "zero duration counts as missing");
        assert_eq!(m.scoreboard, Scoreboard::default());
    }

    #[test]
    fn mapping_rejects_foreign_winner() {
        let raw = MatchResponse {
            team1_id: Some(crate::wire::WireId::Text("a".into())),
            team2_id: Some(crate::wire::WireId::Text("b".into())),
            winner_id: Some(crate::wire::WireId::Text("z".into())),
            win_reason: Some("score".into()),
            status: Some("completed".into()),
            ..Default::default()
        };
        assert!(matches!(map_match("1", raw), Err(StoreError::Invalid(_))));
    }

    #[tokio::test]
    async fn get_match_maps_an_active_record() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/matches/42")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "id": 42,
                    "regulationDuration": 600,
                    "team1Id": "a",
                    "team2Id": "b",
                    "team1Name": "Alpha",
                    "team2Name": "Bravo",
                    "team1Score": 2,
                    "team2Score": 1,
                    "team1Fouls": 0,
                    "team2Fouls": 3,
                    "status": "active",
                    "startTime": "2026-03-01T18:00:00Z"
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = MatchStoreClient::with_base_url(server.url());
        let m = client.get_match("42").await.expect("match should load");

        mock.assert_async().await;
        assert_eq!(m.id, "42");
        assert_eq!(m.regulation_duration, Some(600));
        assert_eq!(m.team2.name, "Bravo");
        assert_eq!(m.status, MatchStatus::Active);
        assert_eq!(m.scoreboard.team2_fouls, 3);
        assert_eq!(
            m.started_at,
            Some(Utc.with_ymd_and_hms(2026, 3, 1, 18, 0, 0).unwrap())
        );
    }

    #[tokio::test]
    async fn get_match_reports_not_found() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/matches/9")
            .with_status(404)
            .create_async()
            .await;

        let client = MatchStoreClient::with_base_url(server.url());
        let err = client.get_match("9").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)), "got {err}");
    }

    #[tokio::test]
    async fn update_scoreboard_sends_full_snapshot() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PUT", "/matches/42/scoreboard")
            .match_body(Matcher::Json(json!({
                "team1Score": 3,
                "team2Score": 0,
                "team1Fouls": 1,
                "team2Fouls": 2
            })))
            .with_status(204)
            .create_async()
            .await;

        let client = MatchStoreClient::with_base_url(server.url());
        let board = Scoreboard {
            team1_score: 3,
            team2_score: 0,
            team1_fouls: 1,
            team2_fouls: 2,
        };
        client
            .update_scoreboard("42", &board)
            .await
            .expect("update should succeed");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn end_match_sends_draw_as_null_winner() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/matches/42/end")
            .match_body(Matcher::Json(json!({ "winnerId": null, "winReason": "draw" })))
            .with_status(200)
            .create_async()
            .await;

        let client = MatchStoreClient::with_base_url(server.url());
        client
            .end_match("42", &MatchResult::draw())
            .await
            .expect("end should succeed");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn update_result_flattens_scoreboard() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PUT", "/matches/5/result")
            .match_body(Matcher::Json(json!({
                "team1Score": 1,
                "team2Score": 1,
                "team1Fouls": 4,
                "team2Fouls": 2,
                "winnerId": "b",
                "winReason": "fouls"
            })))
            .with_status(200)
            .create_async()
            .await;

        let client = MatchStoreClient::with_base_url(server.url());
        let board = Scoreboard {
            team1_score: 1,
            team2_score: 1,
            team1_fouls: 4,
            team2_fouls: 2,
        };
        let result = MatchResult { winner_id: Some("b".into()), reason: WinReason::Fouls };
        client
            .update_result("5", &board, &result)
            .await
            .expect("result edit should succeed");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn server_error_surfaces_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/matches/42/start")
            .with_status(500)
            .create_async()
            .await;

        let client = MatchStoreClient::with_base_url(server.url());
        let err = client.start_match("42").await.unwrap_err();
        match err {
            StoreError::Status { status, .. } => assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR),
            other => panic!("expected status error, got {other}"),
        }
    }
}
