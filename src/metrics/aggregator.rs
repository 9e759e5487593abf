use crate::calorie::estimator::{round_kcal, CalorieEstimator};
use crate::detection::interface::Detection;
use crate::metrics::snapshot::{ActionSummary, MetricsSnapshot};
use crate::rep_counter::core::RepStateMachine;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SchedulerStatus {
    pub detecting: bool,
    pub busy: bool,
}

#[derive(Debug, Clone, Default)]
pub struct MetricsAggregator {
    last_detections: Vec<Detection>,
}

impl MetricsAggregator {
    pub fn new() -> Self {
        Self {
            last_detections: vec![],
        }
    }

    pub fn record_detections(&mut self, detections: &[Detection]) {
        self.last_detections = detections.to_vec();
    }

    pub fn assemble(
        &self,
        counter: &RepStateMachine,
        calories: &CalorieEstimator,
        status: SchedulerStatus,
        now: Instant,
    ) -> MetricsSnapshot {
        let actions = counter
            .actions()
            .map(|state| ActionSummary {
                action: state.action.clone(),
                reps: state.reps,
                active_ms: state.total_active_ms,
                kcal: round_kcal(calories.total_for(&state.action)),
            })
            .collect();

        MetricsSnapshot {
            reps: counter.reps(),
            kcal: round_kcal(calories.total()),
            current_action: counter.current_action(now).map(str::to_string),
            last_updated: now,
            actions,
            last_detections: self.last_detections.clone(),
            detecting: status.detecting,
            busy: status.busy,
        }
    }
}
