use crate::device_camera::interface::Frame;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Incomplete,
    Complete,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Incomplete => write!(f, "incomplete"),
            Status::Complete => write!(f, "complete"),
        }
    }
}

/// Box in source image pixels. `x`/`y` are the box center.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub action: String,
    pub status: Status,
    pub confidence: f32,
    pub bounding_box: BoundingBox,
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum DetectError {
    #[error("timed out after {0:?}")]
    Timeout(Duration),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("provider returned status {0}")]
    Status(u16),
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("encoding frame failed: {0}")]
    Encode(String),
    #[error("inference failed: {0}")]
    Inference(String),
    #[error("provider initialisation failed: {0}")]
    Init(String),
    #[error("provider call ended without a result")]
    Disconnected,
}

pub trait DetectionProvider: Send + Sync {
    fn detect(&self, frame: &Frame) -> Result<Vec<Detection>, DetectError>;
    /// Human-readable name for logs.
    fn name(&self) -> &str;
}
