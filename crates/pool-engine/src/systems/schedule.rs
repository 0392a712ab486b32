/// Actions deferred to a later tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheduled {
    /// Bring the cue ball back to its spot.
    RespotCue,
}

/// Due-tick queue evaluated once per tick. Actions due on the same tick
/// run in the order they were scheduled.
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    pending: Vec<(u64, Scheduled)>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, due_tick: u64, action: Scheduled) {
        self.pending.push((due_tick, action));
    }

    /// Whether `action` is already waiting.
    pub fn is_pending(&self, action: Scheduled) -> bool {
        self.pending.iter().any(|(_, a)| *a == action)
    }

    /// Drop every pending copy of `action`.
    pub fn cancel(&mut self, action: Scheduled) {
        self.pending.retain(|(_, a)| *a != action);
    }

    /// Remove and return every action due at or before `now`.
    pub fn take_due(&mut self, now: u64) -> Vec<Scheduled> {
        let mut due = Vec::new();
        self.pending.retain(|&(tick, action)| {
            if tick <= now {
                due.push(action);
                false
            } else {
                true
            }
        });
        due
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
