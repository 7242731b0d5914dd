use crate::domain::TrackingEvent;

/// Append-only interaction log. Recording happens after a navigation
/// transition commits and never blocks or gates it.
#[derive(Debug, Default)]
pub struct UserTracking {
    events: Vec<TrackingEvent>,
}

impl UserTracking {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn action(&mut self, event: TrackingEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[TrackingEvent] {
        &self.events
    }
}
