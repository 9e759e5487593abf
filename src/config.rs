use chrono::{Offset, Utc};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_ROBOFLOW_ENDPOINT: &str = "https://detect.roboflow.com/fitness-activity-all-woacc/1";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("ROBOFLOW_KEY is missing")]
    MissingApiKey,
    #[error("local model not found at {0}")]
    MissingModelPath(PathBuf),
    #[error("unknown detector backend: {0}")]
    UnknownBackend(String),
    #[error("invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub per_attempt_timeout: Duration,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            per_attempt_timeout: Duration::from_millis(15_000),
            backoff: Duration::from_millis(500),
        }
    }
}

/// Sampling cadence while a given action is the current one.
#[derive(Debug, Clone, PartialEq)]
pub struct SamplingIntervals {
    pub default: Duration,
    pub per_action: Vec<(String, Duration)>,
}

impl SamplingIntervals {
    pub fn for_action(&self, action: Option<&str>) -> Duration {
        action
            .and_then(|action| {
                self.per_action
                    .iter()
                    .find(|(name, _)| name == action)
                    .map(|(_, interval)| *interval)
            })
            .unwrap_or(self.default)
    }
}

impl Default for SamplingIntervals {
    fn default() -> Self {
        Self {
            default: Duration::from_millis(350),
            per_action: vec![
                ("pushup".to_string(), Duration::from_millis(300)),
                ("squat".to_string(), Duration::from_millis(400)),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetTable {
    pub default: f64,
    pub per_action: Vec<(String, f64)>,
}

impl MetTable {
    pub fn met(&self, action: &str) -> f64 {
        self.per_action
            .iter()
            .find(|(name, _)| name == action)
            .map(|(_, met)| *met)
            .unwrap_or(self.default)
    }
}

impl Default for MetTable {
    fn default() -> Self {
        Self {
            default: 5.0,
            per_action: vec![
                ("pushup".to_string(), 8.0),
                ("seated_row".to_string(), 4.5),
                ("seated_shoulder_press".to_string(), 5.0),
                ("squat".to_string(), 5.5),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoboflowConfig {
    pub endpoint: String,
    pub api_key: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LocalModelConfig {
    pub onnx_model_path: PathBuf,
    pub input_shape: (u32, u32),
}

#[derive(Debug, Clone, PartialEq)]
pub enum PrimaryDetector {
    Fake,
    Roboflow(RoboflowConfig),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetectorConfig {
    pub primary: PrimaryDetector,
    pub fallback: Option<LocalModelConfig>,
    pub retry_policy: RetryPolicy,
    pub confidence_threshold: f32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            primary: PrimaryDetector::Fake,
            fallback: None,
            retry_policy: RetryPolicy::default(),
            confidence_threshold: 0.7,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub tick_rate: Duration,
    pub weight_kg: f64,
    pub dedup_window: Duration,
    pub inactivity_timeout: Duration,
    pub sampling: SamplingIntervals,
    pub met_table: MetTable,
    pub detector: DetectorConfig,
    pub logger_timezone: chrono::FixedOffset,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_rate: Duration::from_millis(33),
            weight_kg: 70.0,
            dedup_window: Duration::from_millis(1000),
            inactivity_timeout: Duration::from_millis(5000),
            sampling: SamplingIntervals::default(),
            met_table: MetTable::default(),
            detector: DetectorConfig::default(),
            logger_timezone: Utc.fix(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Overlays the defaults with values from `lookup` and validates the
    /// detector credentials. Any error here is fatal at startup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(value) = lookup("WEIGHT_KG") {
            config.weight_kg = value
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|weight| weight.is_finite() && *weight > 0.0)
                .ok_or(ConfigError::InvalidValue {
                    name: "WEIGHT_KG",
                    value,
                })?;
        }

        if let Some(threshold) = parse_var(&lookup, "CONFIDENCE_THRESHOLD", |t: &f32| {
            (0.0..=1.0).contains(t)
        })? {
            config.detector.confidence_threshold = threshold;
        }
        if let Some(ms) = parse_var(&lookup, "DEDUP_WINDOW_MS", |_: &u64| true)? {
            config.dedup_window = Duration::from_millis(ms);
        }
        if let Some(ms) = parse_var(&lookup, "INACTIVITY_TIMEOUT_MS", |_: &u64| true)? {
            config.inactivity_timeout = Duration::from_millis(ms);
        }

        let policy = &mut config.detector.retry_policy;
        if let Some(attempts) = parse_var(&lookup, "MAX_ATTEMPTS", |n: &u32| *n > 0)? {
            policy.max_attempts = attempts;
        }
        if let Some(ms) = parse_var(&lookup, "PER_ATTEMPT_TIMEOUT_MS", |ms: &u64| *ms > 0)? {
            policy.per_attempt_timeout = Duration::from_millis(ms);
        }
        if let Some(ms) = parse_var(&lookup, "BACKOFF_MS", |_: &u64| true)? {
            policy.backoff = Duration::from_millis(ms);
        }

        let backend = lookup("DETECTOR_BACKEND").unwrap_or_else(|| "roboflow".to_string());
        config.detector.primary = match backend.trim() {
            "fake" => PrimaryDetector::Fake,
            "roboflow" => {
                let api_key = lookup("ROBOFLOW_KEY")
                    .filter(|key| !key.trim().is_empty())
                    .ok_or(ConfigError::MissingApiKey)?;
                let endpoint = lookup("ROBOFLOW_ENDPOINT")
                    .unwrap_or_else(|| DEFAULT_ROBOFLOW_ENDPOINT.to_string());
                PrimaryDetector::Roboflow(RoboflowConfig { endpoint, api_key })
            }
            other => return Err(ConfigError::UnknownBackend(other.to_string())),
        };

        if let Some(path) = lookup("LOCAL_MODEL_PATH") {
            let onnx_model_path = PathBuf::from(path);
            if !onnx_model_path.is_file() {
                return Err(ConfigError::MissingModelPath(onnx_model_path));
            }
            config.detector.fallback = Some(LocalModelConfig {
                onnx_model_path,
                input_shape: (640, 640),
            });
        }

        Ok(config)
    }
}

/// Parses an optional variable, rejecting values that fail to parse or `valid`.
fn parse_var<F, T>(
    lookup: &F,
    name: &'static str,
    valid: impl Fn(&T) -> bool,
) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    let Some(value) = lookup(name) else {
        return Ok(None);
    };
    match value.trim().parse::<T>() {
        Ok(parsed) if valid(&parsed) => Ok(Some(parsed)),
        _ => Err(ConfigError::InvalidValue { name, value }),
    }
}
