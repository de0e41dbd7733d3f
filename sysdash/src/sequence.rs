//! Request numbering so a slow response never overwrites a newer one.

#[derive(Debug, Default)]
pub struct RequestSequencer {
    issued: u64,
    applied: u64,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number for a request about to be sent. Starts at 1.
    pub fn next(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    /// True when `seq` is newer than anything applied so far; records it as applied.
    pub fn accept(&mut self, seq: u64) -> bool {
        if seq > self.applied {
            self.applied = seq;
            true
        } else {
            false
        }
    }

    /// True when something at least as new as `seq` has already been applied.
    pub fn is_stale(&self, seq: u64) -> bool {
        seq <= self.applied
    }

    pub fn latest_applied(&self) -> u64 {
        self.applied
    }

    /// Requests sent but not yet known to be superseded.
    pub fn in_flight(&self) -> u64 {
        self.issued.saturating_sub(self.applied)
    }
}
