use crate::state::network::LoadingState;
use crossterm::event::KeyEvent;
use match_api::{Match, MatchResult, Scoreboard};

#[derive(Debug, Clone, PartialEq)]
pub enum NetworkRequest {
    LoadMatch { match_id: String },
    StartMatch { match_id: String },
    UpdateScoreboard { match_id: String, scoreboard: Scoreboard },
    EndMatch { match_id: String, result: MatchResult },
    UpdateResult { match_id: String, scoreboard: Scoreboard, result: MatchResult },
}

impl NetworkRequest {
    /// Short operator-facing name used in notifications.
    pub fn action(&self) -> &'static str {
        match self {
            NetworkRequest::LoadMatch { .. } => "load match",
            NetworkRequest::StartMatch { .. } => "start match",
            NetworkRequest::UpdateScoreboard { .. } => "save scoreboard",
            NetworkRequest::EndMatch { .. } => "end match",
            NetworkRequest::UpdateResult { .. } => "save result",
        }
    }
}

#[derive(Debug)]
pub enum NetworkResponse {
    LoadingStateChanged { loading_state: LoadingState },
    MatchLoaded { record: Match },
    Acknowledged { action: &'static str },
    Error { action: &'static str, message: String },
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    KeyPressed(KeyEvent),
    Resize,
    AppStarted,
    /// One-second tick; `generation` identifies the ticker task that sent it.
    ClockTick { generation: u64 },
}
