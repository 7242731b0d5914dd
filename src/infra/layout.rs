use std::time::{Duration, Instant};

/// Debounce for layout-settled and refetch notifications: a burst of change
/// events collapses into one settle, but a steady stream cannot starve it
/// past `max_delay` from the first change.
#[derive(Debug)]
pub struct SettleDebounce {
    debounce: Duration,
    max_delay: Duration,
    first_change_at: Option<Instant>,
    deadline: Option<Instant>,
}

impl SettleDebounce {
    pub fn new(debounce: Duration, max_delay: Duration) -> Self {
        Self {
            debounce,
            max_delay,
            first_change_at: None,
            deadline: None,
        }
    }

    pub fn note_change(&mut self, now: Instant) {
        self.deadline = Some(now + self.debounce);
        if self.first_change_at.is_none() {
            self.first_change_at = Some(now);
        }
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Returns true once per settled burst and resets.
    pub fn take_settled(&mut self, now: Instant) -> bool {
        let Some(deadline) = self.deadline else {
            return false;
        };

        let overdue = self
            .first_change_at
            .is_some_and(|first| now >= first + self.max_delay);
        if now >= deadline || overdue {
            self.deadline = None;
            self.first_change_at = None;
            return true;
        }

        false
    }
}
