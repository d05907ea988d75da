use crate::keys::{Command, InputKey, KeyContext};
use crate::state::app_settings::AppSettings;
use crate::state::app_state::{AppState, InputField, InputState};
use crate::state::match_clock::{MatchClock, Phase};
use crate::state::messages::NetworkRequest;
use crate::state::result_edit::ResultEditor;
use chrono::{DateTime, Utc};
use log::{debug, info};
use match_api::duration::{format_clock, format_duration};
use match_api::{Match, MatchStatus};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum MenuItem {
    #[default]
    Live,
    Result,
    Help,
}

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
}

impl App {
    pub fn new(settings: AppSettings, match_id: String) -> Self {
        Self {
            state: AppState::new(match_id),
            settings,
        }
    }

    pub fn clock(&self) -> Option<&MatchClock> {
        self.state.clock.as_ref()
    }

    pub fn key_context(&self) -> KeyContext {
        let clock = self.clock();
        KeyContext {
            tab: self.state.active_tab,
            phase: clock.map(MatchClock::phase),
            status: clock.map(MatchClock::status),
            running: clock.is_some_and(MatchClock::is_running),
            typing: self.state.is_typing(),
        }
    }

    /// Whether the one-second ticker should be alive.
    pub fn needs_ticker(&self) -> bool {
        self.clock().is_some_and(MatchClock::needs_ticker)
    }

    pub fn period_starts(&self) -> u64 {
        self.clock().map_or(0, MatchClock::period_starts)
    }

    // -----------------------------------------------------------------------
    // Network response handlers: called from main_ui_loop
    // -----------------------------------------------------------------------

    pub fn on_match_loaded(&mut self, record: Match, now: DateTime<Utc>) {
        info!("loaded match {} ({})", record.id, record.status.label());
        let clock = MatchClock::from_match(record, now);
        self.state.clock = Some(clock);
        self.state.result_edit = None;
    }

    pub fn on_acknowledged(&mut self, action: &'static str) {
        debug!("{action} acknowledged");
        self.state.in_flight = self.state.in_flight.saturating_sub(1);
    }

    /// Store failures are shown to the operator; local state stays as it is.
    pub fn on_store_error(&mut self, action: &'static str, message: String) {
        self.state.in_flight = self.state.in_flight.saturating_sub(1);
        self.state.notify_error(format!("{action} failed: {message}"));
    }

    /// One-second tick from the live ticker.
    pub fn on_clock_tick(&mut self) -> Vec<NetworkRequest> {
        let Some(clock) = self.state.clock.as_mut() else {
            return Vec::new();
        };
        let period = clock.period();
        if clock.tick() {
            let message = match clock.phase() {
                Phase::HalftimeBreak => "Halftime".to_string(),
                Phase::OvertimePending => "Level after regulation: overtime pending".to_string(),
                _ => format!("{} over: match finished", period.label()),
            };
            self.state.notify(message);
        }
        self.take_requests()
    }

    // -----------------------------------------------------------------------
    // Commands: called from the key handler
    // -----------------------------------------------------------------------

    /// Apply one operator command and return the store calls it produced.
    pub fn apply(&mut self, command: Command, now: DateTime<Utc>) -> Vec<NetworkRequest> {
        match command {
            Command::Quit => {}
            Command::SwitchTab => self.switch_tab(),
            Command::ShowHelp => self.update_tab(MenuItem::Help),
            Command::ExitHelp => self.exit_help(),
            Command::ToggleLogs => self.toggle_show_logs(),
            Command::ToggleFullScreen => self.toggle_full_screen(),
            Command::Input(key) => return self.on_input_key(key),
            Command::OpenInput(field) => self.open_input(field),
            Command::SaveResult => return self.save_result(),
            Command::RevertResult => {
                if let Some(editor) = self.state.result_edit.as_mut() {
                    editor.revert();
                }
            }
            Command::Adjust(counter, step) if self.state.active_tab == MenuItem::Result => {
                if let Some(editor) = self.state.result_edit.as_mut() {
                    editor.adjust(counter, step);
                }
            }
            clock_command => return self.apply_to_clock(clock_command, now),
        }
        Vec::new()
    }

    fn apply_to_clock(&mut self, command: Command, now: DateTime<Utc>) -> Vec<NetworkRequest> {
        let Some(clock) = self.state.clock.as_mut() else {
            self.state.notify_error("Match not loaded yet");
            return Vec::new();
        };

        let applied = match command {
            Command::StartMatch => match clock.start(now) {
                Ok(applied) => applied,
                Err(e) => {
                    self.state.notify_error(e.to_string());
                    return Vec::new();
                }
            },
            Command::StartNextPeriod => clock.start_second_period(),
            Command::StartOvertime => clock.start_overtime(),
            Command::ToggleRunning => clock.toggle_running(),
            Command::EndPeriod => clock.end_period(),
            Command::ForceEnd => clock.force_end(),
            Command::Award(side) => clock.award(side),
            Command::Adjust(counter, step) => clock.adjust(counter, step),
            Command::ToggleBreakTimer => clock.toggle_break_timer(),
            other => {
                debug!("{other:?} is not a clock command");
                false
            }
        };
        if !applied {
            debug!("{command:?} ignored in phase {:?}", clock.phase());
        }
        self.take_requests()
    }

    fn take_requests(&mut self) -> Vec<NetworkRequest> {
        self.state
            .clock
            .as_mut()
            .map(MatchClock::take_requests)
            .unwrap_or_default()
    }

    // -----------------------------------------------------------------------
    // Text entry
    // -----------------------------------------------------------------------

    fn open_input(&mut self, field: InputField) {
        if self.state.clock.is_none() {
            return;
        }
        self.state.input = Some(InputState::new(field));
    }

    fn on_input_key(&mut self, key: InputKey) -> Vec<NetworkRequest> {
        let Some(input) = self.state.input.as_mut() else {
            return Vec::new();
        };
        match key {
            InputKey::Char(c) => input.push(c),
            InputKey::Backspace => input.backspace(),
            InputKey::Cancel => self.state.input = None,
            InputKey::Submit => return self.submit_input(),
        }
        Vec::new()
    }

    fn submit_input(&mut self) -> Vec<NetworkRequest> {
        let Some(input) = self.state.input.take() else {
            return Vec::new();
        };
        let Some(secs) = input.value() else {
            self.state
                .notify_error(format!("`{}` is not a valid mm:ss length", input.buffer));
            return Vec::new();
        };
        let Some(clock) = self.state.clock.as_mut() else {
            return Vec::new();
        };

        let outcome = match input.field {
            InputField::TimeRemaining => clock.edit_remaining(secs).map(|applied| {
                applied.then(|| format!("Time remaining set to {}", format_clock(secs)))
            }),
            InputField::OvertimeLength => clock
                .set_overtime_duration(secs)
                .map(|()| Some(format!("Overtime length: {}", format_duration(secs)))),
            InputField::BreakLength => clock
                .set_break_duration(secs)
                .map(|()| Some(format!("Break length: {}", format_duration(secs)))),
        };
        match outcome {
            Ok(Some(message)) => self.state.notify(message),
            Ok(None) => self.state.notify_error("Pause the clock before editing the time"),
            Err(e) => self.state.notify_error(e.to_string()),
        }
        self.take_requests()
    }

    // -----------------------------------------------------------------------
    // Result edit
    // -----------------------------------------------------------------------

    fn open_result_editor(&mut self) {
        let Some(clock) = self.state.clock.as_ref() else {
            return;
        };
        if clock.status() != MatchStatus::Completed {
            self.state.notify_error("Results can be edited once the match is completed");
            return;
        }
        if self.state.result_edit.is_none() {
            self.state.result_edit = ResultEditor::open(clock.record());
        }
    }

    fn save_result(&mut self) -> Vec<NetworkRequest> {
        let Some(editor) = self.state.result_edit.as_mut() else {
            return Vec::new();
        };
        if !editor.is_dirty() {
            return Vec::new();
        }
        let request = editor.save();
        self.state.notify("Result saved");
        vec![request]
    }

    // -----------------------------------------------------------------------
    // Tab management
    // -----------------------------------------------------------------------

    pub fn update_tab(&mut self, next: MenuItem) {
        if self.state.active_tab == next {
            return;
        }
        if next == MenuItem::Result {
            self.open_result_editor();
            if self.state.result_edit.is_none() {
                return;
            }
        }
        self.state.previous_tab = self.state.active_tab;
        self.state.active_tab = next;
    }

    fn switch_tab(&mut self) {
        let next = match self.state.active_tab {
            MenuItem::Live => MenuItem::Result,
            MenuItem::Result | MenuItem::Help => MenuItem::Live,
        };
        self.update_tab(next);
    }

    pub fn exit_help(&mut self) {
        if self.state.active_tab == MenuItem::Help {
            self.state.active_tab = self.state.previous_tab;
        }
    }

    pub fn toggle_show_logs(&mut self) {
        self.state.show_logs = !self.state.show_logs;
    }

    pub fn toggle_full_screen(&mut self) {
        self.settings.full_screen = !self.settings.full_screen;
    }
}
