use crate::config::{Config, RetryPolicy, SamplingIntervals};
use crate::detection::client::DetectionClient;
use crate::detection::impl_fake::DetectionProviderFake;
use crate::detection::interface::{BoundingBox, Detection, Status};
use crate::device_camera::impl_fake::DeviceCameraFake;
use crate::device_camera::interface::Frame;
use crate::device_display::impl_fake::DeviceDisplayFake;
use crate::library::logger::impl_fake::LoggerFake;
use crate::workout::core::{transition, Effect, Event, State};
use crate::workout::main::Workout;
use image::DynamicImage;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

pub fn config() -> Config {
    Config {
        tick_rate: Duration::from_millis(5),
        sampling: SamplingIntervals {
            default: Duration::from_millis(100),
            per_action: vec![],
        },
        ..Config::default()
    }
}

pub fn at(start: Instant, ms: u64) -> Instant {
    start + Duration::from_millis(ms)
}

pub fn frame() -> Frame {
    Arc::new(DynamicImage::new_rgb8(4, 4))
}

pub fn detection(action: &str, status: Status, confidence: f32) -> Detection {
    Detection {
        action: action.to_string(),
        status,
        confidence,
        bounding_box: BoundingBox::default(),
    }
}

/// Drives one full sample at `now`: tick, capture, detect. Returns the
/// effects emitted by the final `DetectDone`.
pub fn sample(
    config: &Config,
    state: State,
    detections: Vec<Detection>,
    now: Instant,
) -> (State, Vec<Effect>) {
    let (state, effects) = transition(config, state, Event::Tick(now));
    assert_eq!(effects, vec![Effect::CaptureFrame]);

    let (state, effects) = transition(
        config,
        state,
        Event::FrameCaptureDone {
            frame: Ok(frame()),
            at: now,
        },
    );
    assert!(matches!(effects.as_slice(), [Effect::Detect { .. }]));

    transition(config, state, Event::DetectDone { detections, at: now })
}

#[allow(dead_code)]
pub struct Fixture {
    pub config: Config,
    pub logger: LoggerFake,
    pub device_display: Arc<Mutex<DeviceDisplayFake>>,
    pub workout: Arc<Workout>,
}

impl Fixture {
    pub fn new(primary: DetectionProviderFake) -> Self {
        let config = config();
        let logger = LoggerFake::new();
        let device_display = Arc::new(Mutex::new(DeviceDisplayFake::new()));
        let detection_client = DetectionClient::new(
            Arc::new(primary),
            None,
            RetryPolicy {
                max_attempts: 1,
                per_attempt_timeout: Duration::from_millis(500),
                backoff: Duration::ZERO,
            },
            config.detector.confidence_threshold,
            Arc::new(logger.clone()),
        );
        let workout = Workout::new(
            config.clone(),
            Arc::new(logger.clone()),
            Arc::new(DeviceCameraFake::new(Arc::new(logger.clone()))),
            device_display.clone(),
            detection_client,
        );

        Self {
            config,
            logger,
            device_display,
            workout: Arc::new(workout),
        }
    }
}
