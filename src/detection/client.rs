use crate::config::RetryPolicy;
use crate::detection::interface::{DetectError, Detection, DetectionProvider};
use crate::device_camera::interface::Frame;
use crate::library::logger::interface::Logger;
use std::sync::mpsc;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectSource {
    Primary,
    Fallback,
    /// Every provider failed; the detections are empty.
    Exhausted,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetectReport {
    pub detections: Vec<Detection>,
    pub source: DetectSource,
    /// Calls made to the primary provider.
    pub primary_attempts: u32,
    pub last_error: Option<DetectError>,
}

/// Runs detection against a primary provider with bounded retries, then an
/// optional fallback, and never fails: exhaustion yields an empty list.
///
/// Holds no per-call state, so it is safe to share between threads. Callers
/// are expected to keep at most one call in flight.
#[derive(Clone)]
pub struct DetectionClient {
    primary: Arc<dyn DetectionProvider>,
    fallback: Option<Arc<dyn DetectionProvider>>,
    policy: RetryPolicy,
    confidence_threshold: f32,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl DetectionClient {
    pub fn new(
        primary: Arc<dyn DetectionProvider>,
        fallback: Option<Arc<dyn DetectionProvider>>,
        policy: RetryPolicy,
        confidence_threshold: f32,
        logger: Arc<dyn Logger + Send + Sync>,
    ) -> Self {
        Self {
            primary,
            fallback,
            policy,
            confidence_threshold,
            logger: logger.with_namespace("detection_client"),
        }
    }

    pub fn detect(&self, frame: &Frame) -> Vec<Detection> {
        self.detect_with_report(frame).detections
    }

    pub fn detect_with_report(&self, frame: &Frame) -> DetectReport {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut last_error = None;

        for attempt in 1..=max_attempts {
            match self.attempt(&self.primary, frame) {
                Ok(detections) => {
                    return DetectReport {
                        detections: self.filter(detections),
                        source: DetectSource::Primary,
                        primary_attempts: attempt,
                        last_error,
                    };
                }
                Err(e) => {
                    let _ = self.logger.warn(&format!(
                        "{} attempt {}/{} failed: {}",
                        self.primary.name(),
                        attempt,
                        max_attempts,
                        e
                    ));
                    last_error = Some(e);
                    if attempt < max_attempts && !self.policy.backoff.is_zero() {
                        std::thread::sleep(self.policy.backoff);
                    }
                }
            }
        }

        if let Some(fallback) = &self.fallback {
            let _ = self
                .logger
                .info(&format!("falling back to {}", fallback.name()));
            match self.attempt(fallback, frame) {
                Ok(detections) => {
                    return DetectReport {
                        detections: self.filter(detections),
                        source: DetectSource::Fallback,
                        primary_attempts: max_attempts,
                        last_error,
                    };
                }
                Err(e) => {
                    let _ = self
                        .logger
                        .warn(&format!("{} failed: {}", fallback.name(), e));
                    last_error = Some(e);
                }
            }
        }

        let _ = self
            .logger
            .error("all detection providers failed, no detections this tick");

        DetectReport {
            detections: vec![],
            source: DetectSource::Exhausted,
            primary_attempts: max_attempts,
            last_error,
        }
    }

    /// One provider call raced against the per-attempt timeout. A call that
    /// loses the race keeps running on its own thread; its result is dropped.
    fn attempt(
        &self,
        provider: &Arc<dyn DetectionProvider>,
        frame: &Frame,
    ) -> Result<Vec<Detection>, DetectError> {
        let (result_sender, result_receiver) = mpsc::channel();
        let provider = Arc::clone(provider);
        let frame = Arc::clone(frame);

        std::thread::spawn(move || {
            let _ = result_sender.send(provider.detect(&frame));
        });

        match result_receiver.recv_timeout(self.policy.per_attempt_timeout) {
            Ok(result) => result,
            Err(mpsc::RecvTimeoutError::Timeout) => {
                Err(DetectError::Timeout(self.policy.per_attempt_timeout))
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(DetectError::Disconnected),
        }
    }

    fn filter(&self, detections: Vec<Detection>) -> Vec<Detection> {
        detections
            .into_iter()
            .filter(|d| d.confidence >= self.confidence_threshold)
            .collect()
    }
}
