/// Operator-controlled countdown used for the halftime break.
///
/// Purely advisory: reaching zero only stops it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    pub length: u32,
    pub remaining: u32,
    pub running: bool,
}

impl Countdown {
    pub fn new(length: u32) -> Self {
        Self { length, remaining: length, running: false }
    }

    /// Start, pause or resume. A finished countdown cannot be restarted.
    pub fn toggle(&mut self) {
        if self.remaining > 0 {
            self.running = !self.running;
        }
    }

    pub fn tick(&mut self) {
        if !self.running {
            return;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.running = false;
        }
    }

    /// Replace the length and rewind. Refused while running.
    pub fn reset_to(&mut self, length: u32) -> bool {
        if self.running {
            return false;
        }
        *self = Self::new(length);
        true
    }

    pub fn is_done(&self) -> bool {
        self.remaining == 0
    }
}
