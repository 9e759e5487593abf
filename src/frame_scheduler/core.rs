use crate::config::SamplingIntervals;
use std::time::Instant;

/// Decides on each tick whether a new frame should be captured, and keeps at
/// most one detection in flight.
///
/// Pausing stops new submissions but leaves an in-flight call alone. A result
/// that completes while paused is reported as stale by [`FrameScheduler::complete`]
/// so the caller drops it.
#[derive(Debug, Clone)]
pub struct FrameScheduler {
    intervals: SamplingIntervals,
    paused: bool,
    in_flight: bool,
    last_submitted: Option<Instant>,
}

impl FrameScheduler {
    pub fn new(intervals: SamplingIntervals) -> Self {
        Self {
            intervals,
            paused: false,
            in_flight: false,
            last_submitted: None,
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Returns true when a frame should be submitted now, and marks it in flight.
    pub fn on_tick(&mut self, now: Instant, current_action: Option<&str>) -> bool {
        if self.paused || self.in_flight {
            return false;
        }

        let interval = self.intervals.for_action(current_action);
        let due = match self.last_submitted {
            Some(last) => now.saturating_duration_since(last) > interval,
            None => true,
        };

        if due {
            self.in_flight = true;
            self.last_submitted = Some(now);
        }
        due
    }

    /// Clears the in-flight mark. Returns whether the result should be applied.
    pub fn complete(&mut self) -> bool {
        self.in_flight = false;
        !self.paused
    }
}
