/// A leading + trailing edge throttle driven by adapter-supplied timestamps.
///
/// The first event fires immediately. Events arriving within `interval_ms` of the last fire
/// are coalesced into one trailing fire, which the adapter collects by calling
/// [`Throttle::poll`] from its timer/frame tick. The throttle never reads a clock.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Throttle {
    interval_ms: u64,
    last_fire_ms: Option<u64>,
    pending: bool,
}

impl Throttle {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            last_fire_ms: None,
            pending: false,
        }
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    /// Whether a trailing fire is waiting.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// When the pending trailing fire becomes due.
    pub fn next_deadline_ms(&self) -> Option<u64> {
        if !self.pending {
            return None;
        }
        self.last_fire_ms
            .map(|last| last.saturating_add(self.interval_ms))
    }

    /// Records an event. Returns `true` when the caller should fire now.
    pub fn on_event(&mut self, now_ms: u64) -> bool {
        match self.last_fire_ms {
            Some(last) if now_ms.saturating_sub(last) < self.interval_ms => {
                self.pending = true;
                false
            }
            _ => {
                self.last_fire_ms = Some(now_ms);
                self.pending = false;
                true
            }
        }
    }

    /// Returns `true` when a coalesced trailing fire is due.
    pub fn poll(&mut self, now_ms: u64) -> bool {
        match self.next_deadline_ms() {
            Some(deadline) if now_ms >= deadline => {
                self.last_fire_ms = Some(now_ms);
                self.pending = false;
                true
            }
            _ => false,
        }
    }

    /// Drops any pending fire and forgets the last fire time.
    pub fn cancel(&mut self) {
        self.last_fire_ms = None;
        self.pending = false;
    }
}
