use crate::detection::interface::{DetectError, Detection, DetectionProvider};
use crate::device_camera::interface::Frame;
use crate::library::logger::interface::Logger;
use once_cell::sync::OnceCell;
use std::sync::Arc;
use std::time::Duration;

pub type ProviderInit =
    dyn Fn() -> Result<Arc<dyn DetectionProvider>, DetectError> + Send + Sync;

/// Defers building an expensive provider (model load, session setup) until
/// the first call, then reuses it for every later call.
///
/// Initialisation is tried up to `init_attempts` times with `init_backoff`
/// between tries. If every try fails the call reports `DetectError::Init` and
/// the next call starts over.
pub struct DetectionProviderLazy {
    name: String,
    init: Box<ProviderInit>,
    init_attempts: u32,
    init_backoff: Duration,
    provider: OnceCell<Arc<dyn DetectionProvider>>,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl DetectionProviderLazy {
    pub fn new<F>(name: &str, logger: Arc<dyn Logger + Send + Sync>, init: F) -> Self
    where
        F: Fn() -> Result<Arc<dyn DetectionProvider>, DetectError> + Send + Sync + 'static,
    {
        Self {
            name: name.to_string(),
            init: Box::new(init),
            init_attempts: 3,
            init_backoff: Duration::from_millis(500),
            provider: OnceCell::new(),
            logger: logger.with_namespace("lazy").with_namespace(name),
        }
    }

    pub fn with_init_retry(mut self, attempts: u32, backoff: Duration) -> Self {
        self.init_attempts = attempts.max(1);
        self.init_backoff = backoff;
        self
    }

    fn initialize(&self) -> Result<Arc<dyn DetectionProvider>, DetectError> {
        let mut last_error = DetectError::Init("no attempts made".to_string());

        for attempt in 1..=self.init_attempts {
            let _ = self.logger.info(&format!("initialising (attempt {attempt})"));
            match (self.init)() {
                Ok(provider) => {
                    let _ = self.logger.info("ready");
                    return Ok(provider);
                }
                Err(e) => {
                    let _ = self
                        .logger
                        .warn(&format!("initialisation attempt {attempt} failed: {e}"));
                    last_error = e;
                    if attempt < self.init_attempts {
                        std::thread::sleep(self.init_backoff);
                    }
                }
            }
        }

        Err(match last_error {
            DetectError::Init(message) => DetectError::Init(message),
            other => DetectError::Init(other.to_string()),
        })
    }
}

impl DetectionProvider for DetectionProviderLazy {
    fn detect(&self, frame: &Frame) -> Result<Vec<Detection>, DetectError> {
        let provider = self.provider.get_or_try_init(|| self.initialize())?;
        provider.detect(frame)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
