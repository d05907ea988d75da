use crate::app::{App, MenuItem};
use crate::state::app_state::InputField;
use crate::state::match_clock::{Phase, Side};
use crate::state::messages::NetworkRequest;
use chrono::Utc;
use crossterm::event::KeyCode::Char;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::error;
use match_api::{Counter, MatchStatus, Step};
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

/// Everything an operator can ask for from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Quit,
    StartMatch,
    StartNextPeriod,
    StartOvertime,
    ToggleRunning,
    EndPeriod,
    ForceEnd,
    Award(Side),
    Adjust(Counter, Step),
    OpenInput(InputField),
    ToggleBreakTimer,
    SaveResult,
    RevertResult,
    SwitchTab,
    ShowHelp,
    ExitHelp,
    ToggleLogs,
    ToggleFullScreen,
    Input(InputKey),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKey {
    Char(char),
    Backspace,
    Submit,
    Cancel,
}

/// The slice of app state the key map depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyContext {
    pub tab: MenuItem,
    pub phase: Option<Phase>,
    pub status: Option<MatchStatus>,
    pub running: bool,
    pub typing: bool,
}

impl KeyContext {
    fn live_in_period(&self) -> bool {
        self.phase == Some(Phase::InPeriod) && self.status == Some(MatchStatus::Active)
    }
}

/// Q/W O/P A/S K/L: +1/-1 on team 1 score, team 2 score, team 1 fouls, team 2 fouls.
pub fn counter_for(c: char) -> Option<(Counter, Step)> {
    let mapped = match c.to_ascii_lowercase() {
        'q' => (Counter::Team1Score, Step::Up),
        'w' => (Counter::Team1Score, Step::Down),
        'o' => (Counter::Team2Score, Step::Up),
        'p' => (Counter::Team2Score, Step::Down),
        'a' => (Counter::Team1Fouls, Step::Up),
        's' => (Counter::Team1Fouls, Step::Down),
        'k' => (Counter::Team2Fouls, Step::Up),
        'l' => (Counter::Team2Fouls, Step::Down),
        _ => return None,
    };
    Some(mapped)
}

pub fn command_for_key(key: KeyEvent, ctx: KeyContext) -> Option<Command> {
    if let (Char('c'), KeyModifiers::CONTROL) = (key.code, key.modifiers) {
        return Some(Command::Quit);
    }

    // An open text field swallows every key.
    if ctx.typing {
        return match key.code {
            Char(c) => Some(Command::Input(InputKey::Char(c))),
            KeyCode::Backspace => Some(Command::Input(InputKey::Backspace)),
            KeyCode::Enter => Some(Command::Input(InputKey::Submit)),
            KeyCode::Esc => Some(Command::Input(InputKey::Cancel)),
            _ => None,
        };
    }

    match (ctx.tab, key.code) {
        (_, KeyCode::Tab) => Some(Command::SwitchTab),
        (_, Char('?')) => Some(Command::ShowHelp),
        (MenuItem::Help, KeyCode::Esc) => Some(Command::ExitHelp),
        (_, Char('"')) => Some(Command::ToggleLogs),
        (_, Char('f')) => Some(Command::ToggleFullScreen),

        // Period starts fire whether or not the clock is running.
        (MenuItem::Live, KeyCode::Enter) => match ctx.phase {
            Some(Phase::NotStarted) => Some(Command::StartMatch),
            Some(Phase::HalftimeBreak) => Some(Command::StartNextPeriod),
            _ => None,
        },
        (MenuItem::Live, Char(' ')) if ctx.live_in_period() => Some(Command::ToggleRunning),
        (MenuItem::Live, Char(c)) if ctx.live_in_period() && counter_for(c).is_some() => {
            counter_for(c).map(|(counter, step)| Command::Adjust(counter, step))
        }
        (MenuItem::Live, Char('e')) => Some(Command::EndPeriod),
        (MenuItem::Live, Char('n')) => Some(Command::StartOvertime),
        (MenuItem::Live, Char('x')) => Some(Command::ForceEnd),
        (MenuItem::Live, Char('1')) => Some(Command::Award(Side::Team1)),
        (MenuItem::Live, Char('2')) => Some(Command::Award(Side::Team2)),
        (MenuItem::Live, Char('t')) if ctx.phase == Some(Phase::InPeriod) && !ctx.running => {
            Some(Command::OpenInput(InputField::TimeRemaining))
        }
        (MenuItem::Live, Char('m')) => Some(Command::OpenInput(InputField::OvertimeLength)),
        (MenuItem::Live, Char('h')) => Some(Command::OpenInput(InputField::BreakLength)),
        (MenuItem::Live, Char('b')) => Some(Command::ToggleBreakTimer),

        (MenuItem::Result, KeyCode::Enter) => Some(Command::SaveResult),
        (MenuItem::Result, Char('r')) => Some(Command::RevertResult),
        (MenuItem::Result, Char(c)) => {
            counter_for(c).map(|(counter, step)| Command::Adjust(counter, step))
        }

        _ => None,
    }
}

pub async fn handle_key_bindings(
    key_event: KeyEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
) {
    let mut guard = app.lock().await;
    let Some(command) = command_for_key(key_event, guard.key_context()) else {
        return;
    };

    if command == Command::Quit {
        crate::cleanup_terminal();
        std::process::exit(0);
    }

    let requests = guard.apply(command, Utc::now());
    guard.state.in_flight += requests.len();
    drop(guard);

    forward_requests(requests, network_requests).await;
}

/// Hand store calls to the network worker in order. Returns how many were
/// delivered; a closed channel is logged and the rest are dropped.
pub async fn forward_requests(
    requests: Vec<NetworkRequest>,
    network_requests: &mpsc::Sender<NetworkRequest>,
) -> usize {
    let mut delivered = 0;
    for request in requests {
        if let Err(e) = network_requests.send(request).await {
            error!("network worker is gone: {e}");
            break;
        }
        delivered += 1;
    }
    delivered
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn live(phase: Phase, running: bool) -> KeyContext {
        KeyContext {
            tab: MenuItem::Live,
            phase: Some(phase),
            status: Some(match phase {
                Phase::NotStarted => MatchStatus::Pending,
                Phase::Finished => MatchStatus::Completed,
                _ => MatchStatus::Active,
            }),
            running,
            typing: false,
        }
    }

    #[test]
    fn counter_letters_follow_the_table() {
        let ctx = live(Phase::InPeriod, true);
        let cases = [
            ('q', Counter::Team1Score, Step::Up),
            ('W', Counter::Team1Score, Step::Down),
            ('o', Counter::Team2Score, Step::Up),
            ('p', Counter::Team2Score, Step::Down),
            ('A', Counter::Team1Fouls, Step::Up),
            ('s', Counter::Team1Fouls, Step::Down),
            ('k', Counter::Team2Fouls, Step::Up),
            ('l', Counter::Team2Fouls, Step::Down),
        ];
        for (c, counter, step) in cases {
            assert_eq!(
                command_for_key(key(Char(c)), ctx),
                Some(Command::Adjust(counter, step)),
                "key {c}"
            );
        }
    }

    #[test]
    fn counters_and_space_need_an_active_period() {
        for phase in [Phase::NotStarted, Phase::HalftimeBreak, Phase::OvertimePending, Phase::Finished] {
            let ctx = live(phase, false);
            assert_eq!(command_for_key(key(Char('q')), ctx), None, "{phase:?}");
            assert_eq!(command_for_key(key(Char(' ')), ctx), None, "{phase:?}");
        }
        assert_eq!(
            command_for_key(key(Char(' ')), live(Phase::InPeriod, false)),
            Some(Command::ToggleRunning)
        );
    }

    #[test]
    fn enter_starts_match_or_next_period() {
        assert_eq!(
            command_for_key(key(KeyCode::Enter), live(Phase::NotStarted, false)),
            Some(Command::StartMatch)
        );
        assert_eq!(
            command_for_key(key(KeyCode::Enter), live(Phase::HalftimeBreak, false)),
            Some(Command::StartNextPeriod)
        );
        assert_eq!(command_for_key(key(KeyCode::Enter), live(Phase::InPeriod, true)), None);
    }

    #[test]
    fn typing_suppresses_shortcuts() {
        let mut ctx = live(Phase::InPeriod, false);
        ctx.typing = true;
        assert_eq!(
            command_for_key(key(Char('q')), ctx),
            Some(Command::Input(InputKey::Char('q')))
        );
        assert_eq!(
            command_for_key(key(KeyCode::Enter), ctx),
            Some(Command::Input(InputKey::Submit))
        );
        assert_eq!(
            command_for_key(key(KeyCode::Esc), ctx),
            Some(Command::Input(InputKey::Cancel))
        );
        assert_eq!(
            command_for_key(KeyEvent::new(Char('c'), KeyModifiers::CONTROL), ctx),
            Some(Command::Quit)
        );
    }

    #[test]
    fn time_edit_only_offered_while_paused() {
        assert_eq!(command_for_key(key(Char('t')), live(Phase::InPeriod, true)), None);
        assert_eq!(
            command_for_key(key(Char('t')), live(Phase::InPeriod, false)),
            Some(Command::OpenInput(InputField::TimeRemaining))
        );
    }

    #[test]
    fn result_tab_reuses_counter_letters() {
        let ctx = KeyContext {
            tab: MenuItem::Result,
            phase: Some(Phase::Finished),
            status: Some(MatchStatus::Completed),
            running: false,
            typing: false,
        };
        assert_eq!(
            command_for_key(key(Char('o')), ctx),
            Some(Command::Adjust(Counter::Team2Score, Step::Up))
        );
        assert_eq!(command_for_key(key(KeyCode::Enter), ctx), Some(Command::SaveResult));
    }

    #[tokio::test]
    async fn forwarding_to_a_closed_worker_is_reported_not_panicked() {
        let (tx, mut rx) = mpsc::channel(4);
        let requests = vec![
            NetworkRequest::StartMatch { match_id: "1".into() },
            NetworkRequest::LoadMatch { match_id: "1".into() },
        ];
        assert_eq!(forward_requests(requests.clone(), &tx).await, 2);
        assert_eq!(rx.recv().await, Some(requests[0].clone()));

        drop(rx);
        assert_eq!(forward_requests(requests, &tx).await, 0);
    }
}
