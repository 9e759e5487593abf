use crate::device_display::impl_fake::DeviceDisplayFake;
use crate::metrics::snapshot::MetricsSnapshot;
use crate::workout::core::init;
use crate::workout::render::{display_lines, Render};
use crate::workout::tests::fixture::config;
use std::sync::{Arc, Mutex};
use std::time::Instant;

#[test]
fn test_display_lines_ready() {
    let snapshot = MetricsSnapshot::empty(Instant::now());

    assert_eq!(
        display_lines(&snapshot),
        ["Reps 0 0.0kcal".to_string(), "Ready".to_string()]
    );
}

#[test]
fn test_display_lines_busy_action() {
    let snapshot = MetricsSnapshot {
        reps: 12,
        kcal: 5.6,
        current_action: Some("seated_row".to_string()),
        busy: true,
        ..MetricsSnapshot::empty(Instant::now())
    };

    assert_eq!(
        display_lines(&snapshot),
        ["Reps 12 5.6kcal".to_string(), "seated row *".to_string()]
    );
}

#[test]
fn test_display_lines_paused() {
    let snapshot = MetricsSnapshot {
        current_action: Some("squat".to_string()),
        detecting: false,
        ..MetricsSnapshot::empty(Instant::now())
    };

    assert_eq!(display_lines(&snapshot)[1], "Paused");
}

#[test]
fn test_render_publishes_and_skips_unchanged_lines() {
    let config = config();
    let now = Instant::now();
    let (state, _) = init(&config, now);
    let device_display = Arc::new(Mutex::new(DeviceDisplayFake::new()));
    let published = Arc::new(Mutex::new(MetricsSnapshot {
        reps: 99,
        ..MetricsSnapshot::empty(now)
    }));
    let render = Render::new(device_display.clone(), published.clone());

    render.render(&state).unwrap();
    render.render(&state).unwrap();

    assert_eq!(*published.lock().unwrap(), state.snapshot);
    let device_display = device_display.lock().unwrap();
    assert_eq!(device_display.shows, 1);
    assert_eq!(device_display.lines[0], "Reps 0 0.0kcal");
    assert_eq!(device_display.lines[1], "Ready");
}
