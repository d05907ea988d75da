//! Live match controller: countdown, period progression and scoreboard.
//!
//! All mutation goes through the named transition methods below. Store calls
//! are queued in an outbox and drained by the app; the local state never
//! waits for them and is never rolled back when they fail.

use crate::state::countdown::Countdown;
use crate::state::messages::NetworkRequest;
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use match_api::duration::{DurationError, MAX_PERIOD_SECS, format_clock};
use match_api::{
    Counter, Match, MatchResult, MatchStatus, Scoreboard, Step, determine_winner,
};
use thiserror::Error;

pub const DEFAULT_BREAK_SECS: u32 = 5 * 60;
pub const DEFAULT_OVERTIME_SECS: u32 = 5 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    InPeriod,
    HalftimeBreak,
    OvertimePending,
    Finished,
}

impl Phase {
    pub fn label(self) -> &'static str {
        match self {
            Phase::NotStarted => "Not started",
            Phase::InPeriod => "In play",
            Phase::HalftimeBreak => "Halftime",
            Phase::OvertimePending => "Overtime pending",
            Phase::Finished => "Finished",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Period {
    First,
    Second,
    Overtime,
}

impl Period {
    pub fn label(self) -> &'static str {
        match self {
            Period::First => "1st half",
            Period::Second => "2nd half",
            Period::Overtime => "Overtime",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Team1,
    Team2,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClockError {
    #[error("cannot start: match has no regulation duration")]
    MissingDuration,
    #[error("cannot start: both team ids are required")]
    MissingTeams,
    #[error("a length of zero is not allowed")]
    ZeroDuration,
    #[error(transparent)]
    Duration(#[from] DurationError),
    #[error("time remaining {requested} is above the period length {max}")]
    AbovePeriodLength { requested: String, max: String },
    #[error("overtime has already started")]
    OvertimeStarted,
    #[error("pause the break timer before changing its length")]
    BreakTimerRunning,
}

#[derive(Debug)]
pub struct MatchClock {
    record: Match,
    phase: Phase,
    period: Period,
    period_length: u32,
    remaining: u32,
    running: bool,
    overtime_length: u32,
    break_length: u32,
    break_timer: Option<Countdown>,
    period_starts: u64,
    outbox: Vec<NetworkRequest>,
}

impl MatchClock {
    /// Build the session for a freshly loaded match.
    ///
    /// An `active` match is reconstructed from the server start timestamp
    /// rather than any client-side value.
    pub fn from_match(record: Match, now: DateTime<Utc>) -> Self {
        let regulation = record.regulation_duration.unwrap_or(0);
        let mut clock = Self {
            phase: Phase::NotStarted,
            period: Period::First,
            period_length: regulation,
            remaining: regulation,
            running: false,
            overtime_length: DEFAULT_OVERTIME_SECS,
            break_length: DEFAULT_BREAK_SECS,
            break_timer: None,
            period_starts: 0,
            outbox: Vec::new(),
            record,
        };

        match clock.record.status {
            MatchStatus::Pending | MatchStatus::Postponed => {}
            MatchStatus::Completed => clock.phase = Phase::Finished,
            MatchStatus::Active => clock.resume_active(now),
        }
        clock
    }

    fn resume_active(&mut self, now: DateTime<Utc>) {
        self.phase = Phase::InPeriod;
        self.period = Period::First;

        let Some(regulation) = self.record.regulation_duration else {
            warn!("match {} is active without a regulation duration", self.record.id);
            self.period_length = 0;
            self.remaining = 0;
            return;
        };

        let Some(started_at) = self.record.started_at else {
            debug!("match {} is active without a start time; clock paused", self.record.id);
            return;
        };

        self.remaining = remaining_since(started_at, regulation, now);
        info!(
            "resumed match {} with {} left in the first half",
            self.record.id,
            format_clock(self.remaining)
        );
        if self.remaining == 0 {
            self.end_period();
        } else {
            self.running = true;
        }
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn record(&self) -> &Match {
        &self.record
    }

    pub fn match_id(&self) -> &str {
        &self.record.id
    }

    pub fn status(&self) -> MatchStatus {
        self.record.status
    }

    pub fn scoreboard(&self) -> &Scoreboard {
        &self.record.scoreboard
    }

    pub fn result(&self) -> Option<MatchResult> {
        self.record.result()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn period(&self) -> Period {
        self.period
    }

    pub fn period_length(&self) -> u32 {
        self.period_length
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn overtime_length(&self) -> u32 {
        self.overtime_length
    }

    pub fn break_length(&self) -> u32 {
        self.break_length
    }

    pub fn break_timer(&self) -> Option<&Countdown> {
        self.break_timer.as_ref()
    }

    /// Bumped every time a period begins, so the ticker can realign to it.
    pub fn period_starts(&self) -> u64 {
        self.period_starts
    }

    /// Whether anything needs the one-second tick.
    pub fn needs_ticker(&self) -> bool {
        self.running || self.break_timer.is_some_and(|t| t.running)
    }

    /// Drain queued Match Store calls, oldest first.
    pub fn take_requests(&mut self) -> Vec<NetworkRequest> {
        std::mem::take(&mut self.outbox)
    }

    // -----------------------------------------------------------------------
    // Transitions
    // -----------------------------------------------------------------------

    /// `notStarted -> inPeriod(1)`. Returns `Ok(false)` outside `notStarted`.
    pub fn start(&mut self, now: DateTime<Utc>) -> Result<bool, ClockError> {
        if self.phase != Phase::NotStarted || !self.record.status.is_startable() {
            return Ok(false);
        }
        let regulation = self.record.regulation_duration.ok_or(ClockError::MissingDuration)?;
        if regulation == 0 {
            return Err(ClockError::ZeroDuration);
        }
        if self.record.team1.id.is_none() || self.record.team2.id.is_none() {
            return Err(ClockError::MissingTeams);
        }

        self.record.status = MatchStatus::Active;
        self.record.started_at = Some(now);
        self.begin_period(Period::First, regulation);
        self.outbox.push(NetworkRequest::StartMatch {
            match_id: self.record.id.clone(),
        });
        info!("match {} started", self.record.id);
        Ok(true)
    }

    /// Advance one second. Returns true when this tick ended the period.
    pub fn tick(&mut self) -> bool {
        if let Some(timer) = self.break_timer.as_mut() {
            timer.tick();
        }
        if self.phase != Phase::InPeriod || !self.running || self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        if self.remaining == 0 {
            debug!("{} expired", self.period.label());
            self.end_period();
            return true;
        }
        false
    }

    pub fn toggle_running(&mut self) -> bool {
        if self.phase != Phase::InPeriod || self.remaining == 0 {
            return false;
        }
        self.running = !self.running;
        true
    }

    /// Close the current period, automatically at zero or on operator request.
    pub fn end_period(&mut self) -> bool {
        if self.phase != Phase::InPeriod {
            return false;
        }
        self.running = false;

        match self.period {
            Period::First => {
                self.phase = Phase::HalftimeBreak;
                self.break_timer = Some(Countdown::new(self.break_length));
            }
            Period::Second => {
                let result = self.evaluate();
                if result.is_draw() {
                    info!("regulation ended level; overtime pending");
                    self.phase = Phase::OvertimePending;
                } else {
                    self.finish(result);
                }
            }
            // A single overtime only; a level score after it stands as a draw.
            Period::Overtime => {
                let result = self.evaluate();
                self.finish(result);
            }
        }
        true
    }

    /// `halftimeBreak -> inPeriod(2)` with a full regulation length.
    pub fn start_second_period(&mut self) -> bool {
        if self.phase != Phase::HalftimeBreak {
            return false;
        }
        let regulation = self.record.regulation_duration.unwrap_or(0);
        self.break_timer = None;
        self.begin_period(Period::Second, regulation);
        true
    }

    /// `overtimePending -> inPeriod(3)` with the configured overtime length.
    pub fn start_overtime(&mut self) -> bool {
        if self.phase != Phase::OvertimePending {
            return false;
        }
        self.begin_period(Period::Overtime, self.overtime_length);
        true
    }

    fn begin_period(&mut self, period: Period, length: u32) {
        self.phase = Phase::InPeriod;
        self.period = period;
        self.period_length = length;
        self.remaining = length;
        self.running = length > 0;
        self.period_starts += 1;
    }

    pub fn set_overtime_duration(&mut self, secs: u32) -> Result<(), ClockError> {
        check_length(secs)?;
        if self.period == Period::Overtime || self.phase == Phase::Finished {
            return Err(ClockError::OvertimeStarted);
        }
        self.overtime_length = secs;
        Ok(())
    }

    pub fn set_break_duration(&mut self, secs: u32) -> Result<(), ClockError> {
        check_length(secs)?;
        if let Some(timer) = self.break_timer.as_mut()
            && !timer.reset_to(secs)
        {
            return Err(ClockError::BreakTimerRunning);
        }
        self.break_length = secs;
        Ok(())
    }

    pub fn toggle_break_timer(&mut self) -> bool {
        match self.break_timer.as_mut() {
            Some(timer) => {
                timer.toggle();
                true
            }
            None => false,
        }
    }

    /// Set the time left in a paused period. Setting zero ends the period.
    pub fn edit_remaining(&mut self, secs: u32) -> Result<bool, ClockError> {
        if self.phase != Phase::InPeriod || self.running {
            return Ok(false);
        }
        if secs > self.period_length {
            return Err(ClockError::AbovePeriodLength {
                requested: format_clock(secs),
                max: format_clock(self.period_length),
            });
        }
        self.remaining = secs;
        if secs == 0 {
            self.end_period();
        }
        Ok(true)
    }

    /// +1/-1 on one counter; pushes the full snapshot when it changed.
    pub fn adjust(&mut self, counter: Counter, step: Step) -> bool {
        if self.record.status != MatchStatus::Active || self.phase == Phase::Finished {
            return false;
        }
        if !self.record.scoreboard.step(counter, step) {
            return false;
        }
        self.outbox.push(NetworkRequest::UpdateScoreboard {
            match_id: self.record.id.clone(),
            scoreboard: self.record.scoreboard,
        });
        true
    }

    /// Evaluate the counters now and finish, skipping any remaining periods.
    pub fn force_end(&mut self) -> bool {
        if !self.can_end_early() {
            return false;
        }
        let result = self.evaluate();
        self.finish(result);
        true
    }

    /// Finish with a winner decided by the referee.
    pub fn award(&mut self, side: Side) -> bool {
        if !self.can_end_early() {
            return false;
        }
        let team = match side {
            Side::Team1 => &self.record.team1,
            Side::Team2 => &self.record.team2,
        };
        let Some(winner_id) = team.id.clone() else {
            warn!("cannot award match {}: team has no id", self.record.id);
            return false;
        };
        self.finish(MatchResult::referee(winner_id));
        true
    }

    fn can_end_early(&self) -> bool {
        self.record.status == MatchStatus::Active
            && matches!(
                self.phase,
                Phase::InPeriod | Phase::HalftimeBreak | Phase::OvertimePending
            )
    }

    fn evaluate(&self) -> MatchResult {
        match (self.record.team1.id.as_deref(), self.record.team2.id.as_deref()) {
            (Some(team1), Some(team2)) => determine_winner(&self.record.scoreboard, team1, team2),
            _ => {
                warn!("match {} has no team ids; recording a draw", self.record.id);
                MatchResult::draw()
            }
        }
    }

    fn finish(&mut self, result: MatchResult) {
        info!(
            "match {} finished: {} ({})",
            self.record.id,
            result.winner_id.as_deref().unwrap_or("draw"),
            result.reason
        );
        self.running = false;
        self.phase = Phase::Finished;
        self.break_timer = None;
        self.record.status = MatchStatus::Completed;
        self.record.winner_id = result.winner_id.clone();
        self.record.win_reason = Some(result.reason);
        self.outbox.push(NetworkRequest::EndMatch {
            match_id: self.record.id.clone(),
            result,
        });
    }
}

fn check_length(secs: u32) -> Result<(), ClockError> {
    if secs == 0 {
        return Err(ClockError::ZeroDuration);
    }
    if secs > MAX_PERIOD_SECS {
        return Err(DurationError::TooLong(secs).into());
    }
    Ok(())
}

/// `regulation - elapsed`, clamped at zero. A start time in the future counts as no time elapsed.
pub fn remaining_since(started_at: DateTime<Utc>, regulation: u32, now: DateTime<Utc>) -> u32 {
    let elapsed = (now - started_at).num_seconds().max(0);
    let elapsed = u32::try_from(elapsed).unwrap_or(u32::MAX);
    regulation.saturating_sub(elapsed)
}
