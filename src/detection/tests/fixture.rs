use crate::config::RetryPolicy;
use crate::detection::client::DetectionClient;
use crate::detection::impl_fake::DetectionProviderFake;
use crate::detection::interface::{BoundingBox, DetectError, Detection, DetectionProvider, Status};
use crate::device_camera::interface::Frame;
use crate::library::logger::impl_fake::LoggerFake;
use image::DynamicImage;
use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use std::time::Duration;

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

pub fn fast_policy() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 3,
        per_attempt_timeout: Duration::from_millis(500),
        backoff: Duration::from_millis(1),
    }
}

pub fn failure() -> Result<Vec<Detection>, DetectError> {
    Err(DetectError::Transport("connection refused".to_string()))
}

pub struct Fixture {
    pub logger: LoggerFake,
    pub primary_calls: Arc<AtomicUsize>,
    pub fallback_calls: Option<Arc<AtomicUsize>>,
    pub client: DetectionClient,
}

impl Fixture {
    pub fn new(
        primary: DetectionProviderFake,
        fallback: Option<DetectionProviderFake>,
        policy: RetryPolicy,
    ) -> Self {
        let logger = LoggerFake::new();
        let primary_calls = primary.calls();
        let fallback_calls = fallback.as_ref().map(|f| f.calls());
        let client = DetectionClient::new(
            Arc::new(primary),
            fallback.map(|f| Arc::new(f) as Arc<dyn DetectionProvider>),
            policy,
            0.7,
            Arc::new(logger.clone()),
        );

        Self {
            logger,
            primary_calls,
            fallback_calls,
            client,
        }
    }
}
