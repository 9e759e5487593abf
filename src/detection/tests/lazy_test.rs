use super::fixture::{detection, frame};
use crate::detection::impl_fake::DetectionProviderFake;
use crate::detection::impl_lazy::DetectionProviderLazy;
use crate::detection::interface::{DetectError, DetectionProvider, Status};
use crate::library::logger::impl_fake::LoggerFake;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[test]
fn test_initialises_once() {
    let inits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&inits);
    let lazy = DetectionProviderLazy::new("local", Arc::new(LoggerFake::new()), move || {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(DetectionProviderFake::scripted(
            "inner",
            vec![
                Ok(vec![detection("squat", Status::Complete, 0.9)]),
                Ok(vec![]),
            ],
        )) as Arc<dyn DetectionProvider>)
    });

    assert_eq!(inits.load(Ordering::SeqCst), 0);
    assert_eq!(lazy.detect(&frame()).unwrap().len(), 1);
    assert_eq!(lazy.detect(&frame()).unwrap().len(), 0);
    assert_eq!(inits.load(Ordering::SeqCst), 1);
}

#[test]
fn test_init_retries_then_succeeds() {
    let inits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&inits);
    let lazy = DetectionProviderLazy::new("local", Arc::new(LoggerFake::new()), move || {
        if counter.fetch_add(1, Ordering::SeqCst) < 2 {
            return Err(DetectError::Init("model not ready".to_string()));
        }
        Ok(Arc::new(DetectionProviderFake::scripted("inner", vec![])) as Arc<dyn DetectionProvider>)
    })
    .with_init_retry(3, Duration::from_millis(1));

    assert_eq!(lazy.detect(&frame()), Ok(vec![]));
    assert_eq!(inits.load(Ordering::SeqCst), 3);
}

#[test]
fn test_failed_init_is_retried_on_next_call() {
    let inits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&inits);
    let lazy = DetectionProviderLazy::new("local", Arc::new(LoggerFake::new()), move || {
        counter.fetch_add(1, Ordering::SeqCst);
        Err(DetectError::Transport("download failed".to_string()))
    })
    .with_init_retry(2, Duration::from_millis(1));

    assert!(matches!(lazy.detect(&frame()), Err(DetectError::Init(_))));
    assert!(matches!(lazy.detect(&frame()), Err(DetectError::Init(_))));
    assert_eq!(inits.load(Ordering::SeqCst), 4);
}
