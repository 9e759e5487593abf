use image::DynamicImage;
use std::sync::Arc;

/// A captured frame, shared between the capture thread and the detection call.
pub type Frame = Arc<DynamicImage>;

pub trait DeviceCamera {
    fn capture_frame(&self) -> Result<Frame, Box<dyn std::error::Error + Send + Sync>>;
}
