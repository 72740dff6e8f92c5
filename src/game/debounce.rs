/// Timestamp-comparison rate limiter for one kind of player action. This is a
/// debouncing policy, not concurrency control; each action kind carries its
/// own gate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct Debounce {
    interval: f64,
    last: f64,
}

impl Debounce {
    #[inline]
    pub(super) fn new(interval: f64) -> Self {
        Self {
            interval,
            last: f64::NEG_INFINITY,
        }
    }

    /// Accept the action at `now` unless one was accepted less than the
    /// interval ago.
    pub(super) fn try_accept(&mut self, now: f64) -> bool {
        if now - self.last < self.interval {
            return false;
        }
        self.last = now;
        true
    }
}
