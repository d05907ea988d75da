use crate::app::MenuItem;
use crate::state::match_clock::MatchClock;
use crate::state::result_edit::ResultEditor;
use chrono::{DateTime, Local, TimeDelta};
use match_api::duration::parse_clock;

/// How long a notice stays on screen.
pub const NOTICE_TTL_SECS: i64 = 8;
const INPUT_MAX_CHARS: usize = 5;

// ---------------------------------------------------------------------------
// Text entry (time remaining, overtime and break lengths)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputField {
    TimeRemaining,
    OvertimeLength,
    BreakLength,
}

impl InputField {
    pub fn prompt(self) -> &'static str {
        match self {
            InputField::TimeRemaining => "Time remaining (mm:ss)",
            InputField::OvertimeLength => "Overtime length (mm:ss)",
            InputField::BreakLength => "Break length (mm:ss)",
        }
    }
}

/// An open text-entry field. While one is open it receives every key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputState {
    pub field: InputField,
    pub buffer: String,
}

impl InputState {
    pub fn new(field: InputField) -> Self {
        Self { field, buffer: String::new() }
    }

    pub fn push(&mut self, c: char) {
        if (c.is_ascii_digit() || c == ':') && self.buffer.chars().count() < INPUT_MAX_CHARS {
            self.buffer.push(c);
        }
    }

    pub fn backspace(&mut self) {
        self.buffer.pop();
    }

    /// Parsed length in seconds, if the buffer holds a valid `mm:ss`.
    pub fn value(&self) -> Option<u32> {
        parse_clock(&self.buffer)
    }
}

// ---------------------------------------------------------------------------
// Operator notices
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub message: String,
    pub is_error: bool,
    pub raised_at: DateTime<Local>,
}

impl Notice {
    pub fn is_fresh(&self, now: DateTime<Local>) -> bool {
        now - self.raised_at < TimeDelta::seconds(NOTICE_TTL_SECS)
    }
}

// ---------------------------------------------------------------------------
// Root app state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct AppState {
    pub active_tab: MenuItem,
    pub previous_tab: MenuItem,
    pub show_logs: bool,
    pub match_id: String,
    /// Present once the match record has loaded.
    pub clock: Option<MatchClock>,
    pub result_edit: Option<ResultEditor>,
    pub input: Option<InputState>,
    pub notice: Option<Notice>,
    /// Store calls forwarded to the worker and not yet answered.
    pub in_flight: usize,
}

impl AppState {
    pub fn new(match_id: String) -> Self {
        Self { match_id, ..Self::default() }
    }

    pub fn notify(&mut self, message: impl Into<String>) {
        self.notice = Some(Notice {
            message: message.into(),
            is_error: false,
            raised_at: Local::now(),
        });
    }

    pub fn notify_error(&mut self, message: impl Into<String>) {
        self.notice = Some(Notice {
            message: message.into(),
            is_error: true,
            raised_at: Local::now(),
        });
    }

    pub fn is_typing(&self) -> bool {
        self.input.is_some()
    }
}
