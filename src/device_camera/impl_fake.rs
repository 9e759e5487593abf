use crate::device_camera::interface::{DeviceCamera, Frame};
use crate::library::logger::interface::Logger;
use image::DynamicImage;
use std::sync::Arc;

pub struct DeviceCameraFake {
    logger: Arc<dyn Logger + Send + Sync>,
    width: u32,
    height: u32,
}

impl DeviceCameraFake {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            logger: logger.with_namespace("camera").with_namespace("fake"),
            width: 640,
            height: 480,
        }
    }
}

impl DeviceCamera for DeviceCameraFake {
    fn capture_frame(&self) -> Result<Frame, Box<dyn std::error::Error + Send + Sync>> {
        let _ = self.logger.info("Capturing frame...");
        Ok(Arc::new(DynamicImage::new_rgb8(self.width, self.height)))
    }
}
