use crate::detection::interface::{BoundingBox, DetectError, Detection, DetectionProvider};
use crate::detection::label::{to_detection, LOCAL_MODEL_LABELS};
use crate::device_camera::interface::Frame;
use rand::Rng;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

enum Mode {
    /// Replays queued results in order; an empty queue yields no detections.
    Scripted(Mutex<VecDeque<Result<Vec<Detection>, DetectError>>>),
    Random,
}

/// Test and demo provider. Counts calls so tests can assert retry behaviour.
pub struct DetectionProviderFake {
    name: String,
    mode: Mode,
    delay: Duration,
    calls: Arc<AtomicUsize>,
}

impl DetectionProviderFake {
    #[allow(dead_code)]
    pub fn scripted(
        name: &str,
        results: Vec<Result<Vec<Detection>, DetectError>>,
    ) -> Self {
        Self {
            name: name.to_string(),
            mode: Mode::Scripted(Mutex::new(results.into())),
            delay: Duration::ZERO,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn random() -> Self {
        Self {
            name: "fake".to_string(),
            mode: Mode::Random,
            delay: Duration::from_millis(80),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    #[allow(dead_code)]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Shared handle to the call counter, usable after the provider has been
    /// moved into a client.
    #[allow(dead_code)]
    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }

    fn random_detections() -> Result<Vec<Detection>, DetectError> {
        let mut rng = rand::rng();

        if rng.random::<f32>() < 0.3 {
            return Ok(vec![]);
        }

        let class = LOCAL_MODEL_LABELS[rng.random_range(0..LOCAL_MODEL_LABELS.len())];
        let detection = to_detection(
            class,
            rng.random_range(0.5..1.0),
            BoundingBox {
                x: rng.random_range(100.0..540.0),
                y: rng.random_range(100.0..380.0),
                width: 200.0,
                height: 300.0,
            },
        )?;

        Ok(vec![detection])
    }
}

impl DetectionProvider for DetectionProviderFake {
    fn detect(&self, _frame: &Frame) -> Result<Vec<Detection>, DetectError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }

        match &self.mode {
            Mode::Scripted(results) => results
                .lock()
                .map_err(|_| DetectError::Disconnected)?
                .pop_front()
                .unwrap_or_else(|| Ok(vec![])),
            Mode::Random => Self::random_detections(),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
