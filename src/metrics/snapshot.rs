use crate::detection::interface::Detection;
use std::time::Instant;

#[derive(Debug, Clone, PartialEq)]
pub struct ActionSummary {
    pub action: String,
    pub reps: u64,
    pub active_ms: u64,
    pub kcal: f64,
}

/// Point-in-time view handed to the presentation layer. Never mutated after
/// it is built; a newer snapshot replaces it.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsSnapshot {
    pub reps: u64,
    /// Rounded to one decimal.
    pub kcal: f64,
    pub current_action: Option<String>,
    pub last_updated: Instant,
    pub actions: Vec<ActionSummary>,
    /// Filtered detections from the last processed result, for overlays.
    pub last_detections: Vec<Detection>,
    pub detecting: bool,
    pub busy: bool,
}

impl MetricsSnapshot {
    pub fn empty(now: Instant) -> Self {
        Self {
            reps: 0,
            kcal: 0.0,
            current_action: None,
            last_updated: now,
            actions: vec![],
            last_detections: vec![],
            detecting: true,
            busy: false,
        }
    }
}
