use crate::calorie::estimator::CalorieEstimator;
use crate::config::Config;
use crate::detection::interface::Detection;
use crate::device_camera::interface::Frame;
use crate::frame_scheduler::core::FrameScheduler;
use crate::metrics::aggregator::{MetricsAggregator, SchedulerStatus};
use crate::metrics::snapshot::MetricsSnapshot;
use crate::rep_counter::core::{RepCompletedEvent, RepStateMachine};
use std::time::Instant;

#[derive(Clone, Debug)]
pub struct State {
    pub scheduler: FrameScheduler,
    pub counter: RepStateMachine,
    pub calories: CalorieEstimator,
    pub aggregator: MetricsAggregator,
    pub snapshot: MetricsSnapshot,
}

impl State {
    fn refresh_snapshot(&mut self, now: Instant) {
        let status = SchedulerStatus {
            detecting: !self.scheduler.is_paused(),
            busy: self.scheduler.is_in_flight(),
        };
        self.snapshot = self
            .aggregator
            .assemble(&self.counter, &self.calories, status, now);
    }
}

#[derive(Debug)]
pub enum Event {
    Tick(Instant),
    SetDetecting {
        detecting: bool,
        at: Instant,
    },
    FrameCaptureDone {
        frame: Result<Frame, Box<dyn std::error::Error + Send + Sync>>,
        at: Instant,
    },
    DetectDone {
        detections: Vec<Detection>,
        at: Instant,
    },
}

impl Event {
    pub fn to_display_string(&self) -> String {
        match self {
            Event::FrameCaptureDone { frame: Ok(frame), at } => format!(
                "FrameCaptureDone {{ frame: Ok({}x{}), at: {:?} }}",
                frame.width(),
                frame.height(),
                at
            ),
            event => format!("{:?}", event),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    SubscribeTick,
    CaptureFrame,
    Detect { frame: Frame },
    ReportReps { events: Vec<RepCompletedEvent> },
}

impl Effect {
    pub fn to_display_string(&self) -> String {
        match self {
            Effect::Detect { frame } => {
                format!("Detect {{ frame: {}x{} }}", frame.width(), frame.height())
            }
            effect => format!("{:?}", effect),
        }
    }
}

pub fn init(config: &Config, now: Instant) -> (State, Vec<Effect>) {
    let mut state = State {
        scheduler: FrameScheduler::new(config.sampling.clone()),
        counter: RepStateMachine::new(config.dedup_window, config.inactivity_timeout),
        calories: CalorieEstimator::new(config.met_table.clone(), config.weight_kg),
        aggregator: MetricsAggregator::new(),
        snapshot: MetricsSnapshot::empty(now),
    };
    state.refresh_snapshot(now);

    (state, vec![Effect::SubscribeTick])
}

pub fn transition(_config: &Config, mut state: State, event: Event) -> (State, Vec<Effect>) {
    match event {
        Event::Tick(now) => {
            let current_action = state.counter.current_action(now).map(str::to_string);
            let effects = if state.scheduler.on_tick(now, current_action.as_deref()) {
                vec![Effect::CaptureFrame]
            } else {
                vec![]
            };
            state.refresh_snapshot(now);
            (state, effects)
        }

        Event::SetDetecting { detecting, at } => {
            state.scheduler.set_paused(!detecting);
            state.refresh_snapshot(at);
            (state, vec![])
        }

        // Paused before the frame reached the detector: no call is started.
        Event::FrameCaptureDone { frame: Ok(frame), at } => {
            let effects = if state.scheduler.is_paused() {
                state.scheduler.complete();
                vec![]
            } else {
                vec![Effect::Detect { frame }]
            };
            state.refresh_snapshot(at);
            (state, effects)
        }

        Event::FrameCaptureDone { frame: Err(_), at } => {
            state.scheduler.complete();
            state.refresh_snapshot(at);
            (state, vec![])
        }

        Event::DetectDone { detections, at } => {
            if !state.scheduler.complete() {
                // Finished while paused: dropped, not counted.
                state.refresh_snapshot(at);
                return (state, vec![]);
            }

            let applied = state.counter.apply(&detections, at);
            if let Some(accrual) = &applied.accrual {
                state.calories.accumulate(&accrual.action, accrual.elapsed);
            }
            state.aggregator.record_detections(&detections);
            state.refresh_snapshot(at);

            let effects = if applied.events.is_empty() {
                vec![]
            } else {
                vec![Effect::ReportReps {
                    events: applied.events,
                }]
            };
            (state, effects)
        }
    }
}
