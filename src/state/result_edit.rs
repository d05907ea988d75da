use crate::state::messages::NetworkRequest;
use match_api::{Counter, Match, MatchResult, MatchStatus, Scoreboard, Step, determine_winner};

/// Draft correction of a completed match's scoreboard.
///
/// The result is recomputed with the same rules the live clock uses, so a
/// draft equal to the final scoreboard always reproduces the live outcome
/// (referee decisions excepted).
#[derive(Debug, Clone, PartialEq)]
pub struct ResultEditor {
    match_id: String,
    team1_id: String,
    team2_id: String,
    original: Scoreboard,
    draft: Scoreboard,
    result: MatchResult,
}

impl ResultEditor {
    /// Only completed matches with both team ids can be edited.
    pub fn open(record: &Match) -> Option<Self> {
        if record.status != MatchStatus::Completed {
            return None;
        }
        let team1_id = record.team1.id.clone()?;
        let team2_id = record.team2.id.clone()?;
        let result = determine_winner(&record.scoreboard, &team1_id, &team2_id);
        Some(Self {
            match_id: record.id.clone(),
            team1_id,
            team2_id,
            original: record.scoreboard,
            draft: record.scoreboard,
            result,
        })
    }

    pub fn draft(&self) -> &Scoreboard {
        &self.draft
    }

    pub fn result(&self) -> &MatchResult {
        &self.result
    }

    pub fn is_dirty(&self) -> bool {
        self.draft != self.original
    }

    pub fn adjust(&mut self, counter: Counter, step: Step) -> bool {
        if !self.draft.step(counter, step) {
            return false;
        }
        self.result = determine_winner(&self.draft, &self.team1_id, &self.team2_id);
        true
    }

    pub fn revert(&mut self) {
        self.draft = self.original;
        self.result = determine_winner(&self.draft, &self.team1_id, &self.team2_id);
    }

    /// Request that persists the draft; the draft becomes the new baseline.
    pub fn save(&mut self) -> NetworkRequest {
        self.original = self.draft;
        NetworkRequest::UpdateResult {
            match_id: self.match_id.clone(),
            scoreboard: self.draft,
            result: self.result.clone(),
        }
    }
}
