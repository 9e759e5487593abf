use crate::config::Config;
use crate::detection::client::DetectionClient;
use crate::device_camera::interface::DeviceCamera;
use crate::library::logger::interface::Logger;
use crate::workout::core::{Effect, Event};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::time::Instant;

#[derive(Clone)]
pub struct RunEffect {
    config: Config,
    logger: Arc<dyn Logger + Send + Sync>,
    device_camera: Arc<dyn DeviceCamera + Send + Sync>,
    detection_client: DetectionClient,
}

impl RunEffect {
    pub fn new(
        config: Config,
        logger: Arc<dyn Logger + Send + Sync>,
        device_camera: Arc<dyn DeviceCamera + Send + Sync>,
        detection_client: DetectionClient,
    ) -> Self {
        Self {
            config,
            logger: logger.with_namespace("effect"),
            device_camera,
            detection_client,
        }
    }

    pub fn run_effect(&self, effect: Effect, event_sender: Sender<Event>) {
        let _ = self
            .logger
            .info(&format!("Running effect: {}", effect.to_display_string()));

        match effect {
            Effect::SubscribeTick => loop {
                std::thread::sleep(self.config.tick_rate);
                if event_sender.send(Event::Tick(Instant::now())).is_err() {
                    return;
                }
            },
            Effect::CaptureFrame => {
                let frame = self.device_camera.capture_frame();
                if let Err(e) = &frame {
                    let _ = self.logger.error(&format!("Frame capture failed: {}", e));
                }
                let _ = event_sender.send(Event::FrameCaptureDone {
                    frame,
                    at: Instant::now(),
                });
            }
            Effect::Detect { frame } => {
                let detections = self.detection_client.detect(&frame);
                let _ = event_sender.send(Event::DetectDone {
                    detections,
                    at: Instant::now(),
                });
            }
            Effect::ReportReps { events } => {
                for event in events {
                    let _ = self
                        .logger
                        .info(&format!("{} rep completed", event.action));
                }
            }
        }
    }
}
