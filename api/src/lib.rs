pub mod client;
pub mod duration;
pub mod result;
pub mod wire;

use chrono::{DateTime, Utc};
use std::fmt;

pub use result::{determine_winner, needs_overtime};

// ---------------------------------------------------------------------------
// Domain types: clean model, independent of the Match Store wire format
// ---------------------------------------------------------------------------

/// A match as held by the Match Store.
///
/// Configuration fields are optional because the administrative form that
/// creates matches does not enforce them; the live clock refuses to start a
/// match that is missing any of them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Match {
    pub id: String,
    /// Seconds per regulation period.
    pub regulation_duration: Option<u32>,
    pub team1: TeamRef,
    pub team2: TeamRef,
    pub scoreboard: Scoreboard,
    pub status: MatchStatus,
    pub winner_id: Option<String>,
    pub win_reason: Option<WinReason>,
    /// Server-recorded start timestamp, present once the match is active.
    pub started_at: Option<DateTime<Utc>>,
}

impl Match {
    /// The stored result, if the match has one.
    pub fn result(&self) -> Option<MatchResult> {
        let reason = self.win_reason?;
        Some(MatchResult {
            winner_id: self.winner_id.clone(),
            reason,
        })
    }

    pub fn team_name(&self, team_id: &str) -> Option<&str> {
        [&self.team1, &self.team2]
            .into_iter()
            .find(|t| t.id.as_deref() == Some(team_id))
            .map(|t| t.name.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamRef {
    pub id: Option<String>,
    pub name: String,
}

/// The four mutable counters of a match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Scoreboard {
    pub team1_score: u32,
    pub team2_score: u32,
    pub team1_fouls: u32,
    pub team2_fouls: u32,
}

impl Scoreboard {
    pub fn get(&self, counter: Counter) -> u32 {
        match counter {
            Counter::Team1Score => self.team1_score,
            Counter::Team2Score => self.team2_score,
            Counter::Team1Fouls => self.team1_fouls,
            Counter::Team2Fouls => self.team2_fouls,
        }
    }

    fn slot(&mut self, counter: Counter) -> &mut u32 {
        match counter {
            Counter::Team1Score => &mut self.team1_score,
            Counter::Team2Score => &mut self.team2_score,
            Counter::Team1Fouls => &mut self.team1_fouls,
            Counter::Team2Fouls => &mut self.team2_fouls,
        }
    }

    /// Apply a +1/-1 step to one counter. Decrementing a zero counter is a
    /// no-op. Returns true when the counter changed.
    pub fn step(&mut self, counter: Counter, step: Step) -> bool {
        let slot = self.slot(counter);
        match step {
            Step::Up => {
                *slot = slot.saturating_add(1);
                true
            }
            Step::Down if *slot > 0 => {
                *slot -= 1;
                true
            }
            Step::Down => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Counter {
    Team1Score,
    Team2Score,
    Team1Fouls,
    Team2Fouls,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchStatus {
    #[default]
    Pending,
    Postponed,
    Active,
    Completed,
}

impl MatchStatus {
    /// `pending` and `postponed` are equivalent entry states.
    pub fn is_startable(self) -> bool {
        matches!(self, MatchStatus::Pending | MatchStatus::Postponed)
    }

    pub fn label(self) -> &'static str {
        match self {
            MatchStatus::Pending => "pending",
            MatchStatus::Postponed => "postponed",
            MatchStatus::Active => "active",
            MatchStatus::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WinReason {
    Score,
    Fouls,
    Referee,
    Draw,
}

impl WinReason {
    pub fn label(self) -> &'static str {
        match self {
            WinReason::Score => "score",
            WinReason::Fouls => "fouls",
            WinReason::Referee => "referee",
            WinReason::Draw => "draw",
        }
    }
}

impl fmt::Display for WinReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome of a match. `winner_id == None` means a draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    pub winner_id: Option<String>,
    pub reason: WinReason,
}

impl MatchResult {
    pub fn draw() -> Self {
        Self { winner_id: None, reason: WinReason::Draw }
    }

    /// Result decided by the referee or operator rather than the counters.
    pub fn referee(winner_id: impl Into<String>) -> Self {
        Self {
            winner_id: Some(winner_id.into()),
            reason: WinReason::Referee,
        }
    }

    pub fn is_draw(&self) -> bool {
        self.winner_id.is_none()
    }
}
