use crate::detection::interface::{Detection, Status};
use std::collections::{BTreeMap, VecDeque};
use std::time::{Duration, Instant};

/// Completion timestamps kept per action for the dedup guard.
pub const RECENT_COMPLETIONS_CAPACITY: usize = 5;
/// Most Complete observations (the current one included) allowed inside the
/// dedup window for a transition to still count as a new rep.
pub const MAX_COMPLETIONS_IN_WINDOW: usize = 2;

#[derive(Debug, Clone, PartialEq)]
pub struct ActionState {
    pub action: String,
    pub last_status: Status,
    pub total_active_ms: u64,
    pub last_frame_at: Instant,
    pub recent_completions: VecDeque<Instant>,
    pub reps: u64,
}

impl ActionState {
    fn new(action: &str, now: Instant) -> Self {
        Self {
            action: action.to_string(),
            last_status: Status::Incomplete,
            total_active_ms: 0,
            last_frame_at: now,
            recent_completions: VecDeque::with_capacity(RECENT_COMPLETIONS_CAPACITY),
            reps: 0,
        }
    }

    fn record_completion(&mut self, now: Instant) {
        if self.recent_completions.len() == RECENT_COMPLETIONS_CAPACITY {
            self.recent_completions.pop_front();
        }
        self.recent_completions.push_back(now);
    }

    fn completions_within(&self, window: Duration, now: Instant) -> usize {
        self.recent_completions
            .iter()
            .filter(|at| now.saturating_duration_since(**at) < window)
            .count()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RepCompletedEvent {
    pub action: String,
    pub at: Instant,
}

/// Active time credited to one action by a single `apply`.
#[derive(Debug, Clone, PartialEq)]
pub struct Accrual {
    pub action: String,
    pub elapsed: Duration,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Applied {
    pub events: Vec<RepCompletedEvent>,
    pub accrual: Option<Accrual>,
}

/// Turns per-frame detections into discrete reps.
///
/// Each call to [`RepStateMachine::apply`] picks one primary detection:
/// the most confident `Complete`, or failing that the most confident
/// `Incomplete`, with ties going to the earliest in the list. Other actions
/// seen in the same call are ignored for that call.
#[derive(Debug, Clone)]
pub struct RepStateMachine {
    dedup_window: Duration,
    inactivity_timeout: Duration,
    actions: BTreeMap<String, ActionState>,
    reps: u64,
    previous_tick: Option<Instant>,
    current_action: Option<String>,
}

impl RepStateMachine {
    pub fn new(dedup_window: Duration, inactivity_timeout: Duration) -> Self {
        Self {
            dedup_window,
            inactivity_timeout,
            actions: BTreeMap::new(),
            reps: 0,
            previous_tick: None,
            current_action: None,
        }
    }

    pub fn reps(&self) -> u64 {
        self.reps
    }

    pub fn actions(&self) -> impl Iterator<Item = &ActionState> {
        self.actions.values()
    }

    #[allow(dead_code)]
    pub fn action(&self, action: &str) -> Option<&ActionState> {
        self.actions.get(action)
    }

    /// The action seen most recently, unless it has been idle for longer
    /// than the inactivity timeout at `now`.
    pub fn current_action(&self, now: Instant) -> Option<&str> {
        let action = self.current_action.as_deref()?;
        let state = self.actions.get(action)?;
        if now.saturating_duration_since(state.last_frame_at) > self.inactivity_timeout {
            None
        } else {
            Some(action)
        }
    }

    pub fn apply(&mut self, detections: &[Detection], now: Instant) -> Applied {
        let gap = self
            .previous_tick
            .map(|previous| now.saturating_duration_since(previous))
            .unwrap_or_default();
        self.previous_tick = Some(now);

        let Some(primary) = primary_detection(detections) else {
            self.expire_current_action(now);
            return Applied::default();
        };

        let state = self
            .actions
            .entry(primary.action.clone())
            .or_insert_with(|| ActionState::new(&primary.action, now));

        // A gap longer than the inactivity timeout means nobody was exercising.
        let elapsed = if gap > self.inactivity_timeout {
            Duration::ZERO
        } else {
            gap
        };
        state.total_active_ms += elapsed.as_millis() as u64;
        state.last_frame_at = now;

        let mut events = Vec::new();
        if primary.status == Status::Complete {
            state.record_completion(now);

            let is_transition = state.last_status == Status::Incomplete;
            let is_new_rep =
                state.completions_within(self.dedup_window, now) <= MAX_COMPLETIONS_IN_WINDOW;

            if is_transition && is_new_rep {
                state.reps += 1;
                self.reps += 1;
                events.push(RepCompletedEvent {
                    action: primary.action.clone(),
                    at: now,
                });
            }
        }
        state.last_status = primary.status;

        self.current_action = Some(primary.action.clone());

        Applied {
            events,
            accrual: Some(Accrual {
                action: primary.action.clone(),
                elapsed,
            }),
        }
    }

    fn expire_current_action(&mut self, now: Instant) {
        if self.current_action(now).is_none() {
            self.current_action = None;
        }
    }
}

/// Most confident `Complete` detection, else most confident `Incomplete`.
/// Ties keep the earlier detection.
pub fn primary_detection(detections: &[Detection]) -> Option<&Detection> {
    most_confident(detections, Status::Complete)
        .or_else(|| most_confident(detections, Status::Incomplete))
}

fn most_confident(detections: &[Detection], status: Status) -> Option<&Detection> {
    detections
        .iter()
        .filter(|d| d.status == status)
        .fold(None, |best: Option<&Detection>, d| match best {
            Some(best) if best.confidence >= d.confidence => Some(best),
            _ => Some(d),
        })
}
