use config::{Config, PrimaryDetector};
use detection::client::DetectionClient;
use detection::impl_fake::DetectionProviderFake;
use detection::impl_lazy::DetectionProviderLazy;
use detection::impl_roboflow::DetectionProviderRoboflow;
use detection::impl_tract_onnx::DetectionProviderTractOnnx;
use detection::interface::DetectionProvider;
use device_camera::impl_fake::DeviceCameraFake;
use device_display::impl_console::DeviceDisplayConsole;
use library::logger::{impl_console::LoggerConsole, interface::Logger};
use std::io::BufRead;
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use workout::core::Event;
use workout::main::Workout;

mod calorie;
mod config;
mod detection;
mod device_camera;
mod device_display;
mod frame_scheduler;
mod library;
mod metrics;
mod rep_counter;
mod workout;

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = Config::from_env()?;

    let logger: Arc<dyn Logger + Send + Sync> =
        Arc::new(LoggerConsole::new(config.logger_timezone));

    let detection_client = build_detection_client(&config, logger.clone());

    let device_camera = Arc::new(DeviceCameraFake::new(logger.clone()));

    let device_display = Arc::new(Mutex::new(DeviceDisplayConsole::new()));

    let workout = Workout::new(
        config,
        logger.clone(),
        device_camera,
        device_display,
        detection_client,
    );

    spawn_pause_toggle(workout.sender(), logger.with_namespace("stdin"));

    workout.run()
}

fn build_detection_client(
    config: &Config,
    logger: Arc<dyn Logger + Send + Sync>,
) -> DetectionClient {
    let policy = config.detector.retry_policy.clone();

    let primary: Arc<dyn DetectionProvider> = match &config.detector.primary {
        PrimaryDetector::Fake => Arc::new(DetectionProviderFake::random()),
        PrimaryDetector::Roboflow(roboflow) => Arc::new(DetectionProviderRoboflow::new(
            roboflow,
            policy.per_attempt_timeout,
            logger.clone(),
        )),
    };

    let fallback = config.detector.fallback.clone().map(|local| {
        let provider = DetectionProviderLazy::new("local_model", logger.clone(), move || {
            let model = DetectionProviderTractOnnx::new(local.clone())?;
            Ok(Arc::new(model) as Arc<dyn DetectionProvider>)
        });
        Arc::new(provider) as Arc<dyn DetectionProvider>
    });

    DetectionClient::new(
        primary,
        fallback,
        policy,
        config.detector.confidence_threshold,
        logger,
    )
}

/// Each line on stdin flips detection on or off.
fn spawn_pause_toggle(event_sender: Sender<Event>, logger: Arc<dyn Logger + Send + Sync>) {
    std::thread::spawn(move || {
        let mut detecting = true;
        for line in std::io::stdin().lock().lines() {
            if line.is_err() {
                break;
            }
            detecting = !detecting;
            let _ = logger.info(if detecting { "Resuming" } else { "Pausing" });
            let event = Event::SetDetecting {
                detecting,
                at: Instant::now(),
            };
            if event_sender.send(event).is_err() {
                break;
            }
        }
    });
}
