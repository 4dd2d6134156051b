use std::time::{Duration, Instant};

/// Fixed-interval scheduler driving the simulation. The caller feeds it the
/// current time; it says when a tick is due and how long to wait for one.
#[derive(Debug)]
pub struct Ticker {
    interval: Duration,
    next_due: Instant,
    state: TickerState,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum TickerState {
    Running,
    Paused,
    Cancelled,
}

impl Ticker {
    pub fn start(interval: Duration, now: Instant) -> Self {
        Ticker { interval, next_due: now + interval, state: TickerState::Running }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// True once per elapsed interval. A late poll fires once and schedules the
    /// next tick a full interval later, so missed ticks are not replayed.
    pub fn poll(&mut self, now: Instant) -> bool {
        if self.state != TickerState::Running || now < self.next_due {
            return false;
        }

        self.next_due += self.interval;
        if self.next_due <= now {
            self.next_due = now + self.interval;
        }
        true
    }

    /// Time left until the next tick, or `None` if the ticker won't fire.
    pub fn until_next(&self, now: Instant) -> Option<Duration> {
        match self.state {
            TickerState::Running => Some(self.next_due.saturating_duration_since(now)),
            _ => None,
        }
    }

    pub fn pause(&mut self) {
        if self.state == TickerState::Running {
            self.state = TickerState::Paused;
        }
    }

    pub fn resume(&mut self, now: Instant) {
        if self.state == TickerState::Paused {
            self.state = TickerState::Running;
            self.next_due = now + self.interval;
        }
    }

    pub fn is_paused(&self) -> bool {
        self.state == TickerState::Paused
    }

    pub fn cancel(&mut self) {
        self.state = TickerState::Cancelled;
    }

    pub fn is_cancelled(&self) -> bool {
        self.state == TickerState::Cancelled
    }
}
