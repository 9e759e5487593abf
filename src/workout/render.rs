use crate::device_display::interface::DeviceDisplay;
use crate::metrics::snapshot::MetricsSnapshot;
use crate::workout::core::State;
use std::sync::{Arc, Mutex};

/// Text for the two display lines.
pub fn display_lines(snapshot: &MetricsSnapshot) -> [String; 2] {
    let first = format!("Reps {} {:.1}kcal", snapshot.reps, snapshot.kcal);

    let second = if !snapshot.detecting {
        "Paused".to_string()
    } else {
        let action = snapshot
            .current_action
            .as_deref()
            .unwrap_or("Ready")
            .replace('_', " ");
        if snapshot.busy {
            format!("{} *", action)
        } else {
            action
        }
    };

    [first, second]
}

/// Publishes each new snapshot and mirrors it on the display.
#[derive(Clone)]
pub struct Render {
    device_display: Arc<Mutex<dyn DeviceDisplay + Send + Sync>>,
    snapshot: Arc<Mutex<MetricsSnapshot>>,
    shown: Arc<Mutex<Option<[String; 2]>>>,
}

impl Render {
    pub fn new(
        device_display: Arc<Mutex<dyn DeviceDisplay + Send + Sync>>,
        snapshot: Arc<Mutex<MetricsSnapshot>>,
    ) -> Self {
        Self {
            device_display,
            snapshot,
            shown: Arc::new(Mutex::new(None)),
        }
    }

    pub fn render(&self, state: &State) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        *self.snapshot.lock().map_err(|e| e.to_string())? = state.snapshot.clone();

        let lines = display_lines(&state.snapshot);
        let mut shown = self.shown.lock().map_err(|e| e.to_string())?;
        if shown.as_ref() == Some(&lines) {
            return Ok(());
        }

        self.device_display
            .lock()
            .map_err(|e| e.to_string())?
            .show(&lines)?;
        *shown = Some(lines);

        Ok(())
    }
}
