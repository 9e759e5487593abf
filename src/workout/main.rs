use crate::config::Config;
use crate::detection::client::DetectionClient;
use crate::device_camera::interface::DeviceCamera;
use crate::device_display::interface::DeviceDisplay;
use crate::library::logger::interface::Logger;
use crate::library::state_machine::StateMachine;
use crate::metrics::snapshot::MetricsSnapshot;
use crate::workout::core::{init, transition, Effect, Event, State};
use crate::workout::render::Render;
use crate::workout::run_effect::RunEffect;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::time::Instant;

pub struct Workout {
    config: Config,
    logger: Arc<dyn Logger + Send + Sync>,
    snapshot: Arc<Mutex<MetricsSnapshot>>,
    event_sender: Sender<Event>,
    event_receiver: Mutex<Option<Receiver<Event>>>,
    run_effect: RunEffect,
    render: Render,
}

impl Workout {
    pub fn new(
        config: Config,
        logger: Arc<dyn Logger + Send + Sync>,
        device_camera: Arc<dyn DeviceCamera + Send + Sync>,
        device_display: Arc<Mutex<dyn DeviceDisplay + Send + Sync>>,
        detection_client: DetectionClient,
    ) -> Self {
        let (event_sender, event_receiver) = channel();
        let snapshot = Arc::new(Mutex::new(MetricsSnapshot::empty(Instant::now())));
        let logger = logger.with_namespace("workout");

        Self {
            run_effect: RunEffect::new(
                config.clone(),
                logger.clone(),
                device_camera,
                detection_client,
            ),
            render: Render::new(device_display, Arc::clone(&snapshot)),
            config,
            logger,
            snapshot,
            event_sender,
            event_receiver: Mutex::new(Some(event_receiver)),
        }
    }

    /// For injecting events such as [`Event::SetDetecting`] from other threads.
    pub fn sender(&self) -> Sender<Event> {
        self.event_sender.clone()
    }

    /// Latest published snapshot.
    #[allow(dead_code)]
    pub fn snapshot(&self) -> MetricsSnapshot {
        match self.snapshot.lock() {
            Ok(snapshot) => snapshot.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Blocks running the event loop. May only be called once.
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let event_receiver = self
            .event_receiver
            .lock()
            .map_err(|e| e.to_string())?
            .take()
            .ok_or("workout is already running")?;

        let config = self.config.clone();
        let render = self.render.clone();
        let run_effect = self.run_effect.clone();
        let render_logger = self.logger.clone();

        let state_machine = StateMachine::new(
            move |state: State, event: Event| transition(&config, state, event),
            move |state: &State| {
                if let Err(e) = render.render(state) {
                    let _ = render_logger.error(&format!("Render failed: {}", e));
                }
            },
            move |effect: Effect, event_sender: Sender<Event>| {
                run_effect.run_effect(effect, event_sender)
            },
        );

        let _ = self.logger.info(&format!(
            "Starting, weight {}kg, confidence threshold {}",
            self.config.weight_kg, self.config.detector.confidence_threshold
        ));

        state_machine.run(
            init(&self.config, Instant::now()),
            self.event_sender.clone(),
            event_receiver,
        )
    }
}
