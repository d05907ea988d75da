use crate::state::messages::UiEvent;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};

/// One-second tick for the match clock and the break timer.
///
/// The task only exists while something is counting down. Each start bumps
/// the generation; ticks from an earlier generation are stale and ignored.
/// A new period restarts the task so its first tick lands a full second in.
pub struct ClockTicker {
    ui_events: mpsc::Sender<UiEvent>,
    handle: Option<JoinHandle<()>>,
    generation: u64,
    period_starts: u64,
}

impl ClockTicker {
    pub fn new(ui_events: mpsc::Sender<UiEvent>) -> Self {
        Self { ui_events, handle: None, generation: 0, period_starts: 0 }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Accepts a tick only if it came from the live task.
    pub fn accepts(&self, generation: u64) -> bool {
        self.is_running() && generation == self.generation
    }

    /// Start or stop the task to match `should_run`, restarting it when
    /// `period_starts` moved since the last call.
    pub fn sync(&mut self, should_run: bool, period_starts: u64) {
        let new_period = period_starts != self.period_starts;
        self.period_starts = period_starts;
        match (should_run, self.is_running()) {
            (true, false) => self.start(),
            (true, true) if new_period => {
                self.stop();
                self.start();
            }
            (false, true) => self.stop(),
            _ => {}
        }
    }

    fn start(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        let generation = self.generation;
        let ui_events = self.ui_events.clone();

        self.handle = Some(tokio::spawn(async move {
            let mut ticks = interval(Duration::from_secs(1));
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately; a full second must pass first.
            ticks.tick().await;

            loop {
                ticks.tick().await;
                if ui_events.send(UiEvent::ClockTick { generation }).await.is_err() {
                    break;
                }
            }
        }));
    }

    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for ClockTicker {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::match_clock::{MatchClock, Phase};
    use chrono::Utc;
    use match_api::{Match, TeamRef};
    use tokio::time::{Instant, sleep};

    async fn next_accepted(ticker: &ClockTicker, rx: &mut mpsc::Receiver<UiEvent>) {
        loop {
            match rx.recv().await {
                Some(UiEvent::ClockTick { generation }) if ticker.accepts(generation) => return,
                Some(_) => continue,
                None => panic!("ticker channel closed"),
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_carry_the_current_generation() {
        let (tx, mut rx) = mpsc::channel(8);
        let mut ticker = ClockTicker::new(tx);
        ticker.sync(true, 0);
        assert!(ticker.is_running());

        let Some(UiEvent::ClockTick { generation }) = rx.recv().await else {
            panic!("expected a clock tick");
        };
        assert_eq!(generation, 1);
        assert!(ticker.accepts(generation));
    }

    #[tokio::test(start_paused = true)]
    async fn restart_invalidates_old_ticks() {
        let (tx, _rx) = mpsc::channel(8);
        let mut ticker = ClockTicker::new(tx);
        ticker.sync(true, 0);
        let first = ticker.generation();
        ticker.sync(false, 0);
        assert!(!ticker.is_running());
        assert!(!ticker.accepts(first));

        ticker.sync(true, 0);
        assert!(!ticker.accepts(first));
        assert!(ticker.accepts(ticker.generation()));
    }

    #[tokio::test(start_paused = true)]
    async fn sync_is_idempotent() {
        let (tx, _rx) = mpsc::channel(8);
        let mut ticker = ClockTicker::new(tx);
        ticker.sync(true, 0);
        ticker.sync(true, 0);
        assert_eq!(ticker.generation(), 1);
        ticker.sync(false, 0);
        ticker.sync(false, 0);
        assert!(!ticker.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn new_period_restarts_the_rhythm() {
        let (tx, _rx) = mpsc::channel(8);
        let mut ticker = ClockTicker::new(tx);
        ticker.sync(true, 1);
        let first = ticker.generation();

        ticker.sync(true, 2);
        assert!(ticker.is_running());
        assert!(!ticker.accepts(first));
        assert_eq!(ticker.generation(), first + 1);
    }

    #[tokio::test(start_paused = true)]
    async fn second_half_gets_a_full_first_second_while_break_timer_runs() {
        let now = Utc::now();
        let mut clock = MatchClock::from_match(
            Match {
                id: "m1".into(),
                regulation_duration: Some(1),
                team1: TeamRef { id: Some("A".into()), name: "Alpha".into() },
                team2: TeamRef { id: Some("B".into()), name: "Bravo".into() },
                ..Match::default()
            },
            now,
        );
        clock.start(now).unwrap();
        assert!(clock.end_period());
        assert!(clock.toggle_break_timer());

        let (tx, mut rx) = mpsc::channel(8);
        let mut ticker = ClockTicker::new(tx);
        ticker.sync(clock.needs_ticker(), clock.period_starts());

        sleep(Duration::from_millis(900)).await;
        assert!(clock.start_second_period());
        ticker.sync(clock.needs_ticker(), clock.period_starts());

        let resumed = Instant::now();
        next_accepted(&ticker, &mut rx).await;
        assert!(resumed.elapsed() >= Duration::from_secs(1));
        assert!(clock.tick());
        assert_eq!(clock.phase(), Phase::OvertimePending);
    }
}
