use crate::library::logger::interface::{join_namespace, LogResult, Logger};
use std::sync::{Arc, Mutex};

/// Records every line in memory. Namespaced children share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct LoggerFake {
    namespace: Option<String>,
    lines: Arc<Mutex<Vec<String>>>,
}

impl LoggerFake {
    pub fn new() -> Self {
        Self::default()
    }

    #[allow(dead_code)]
    pub fn lines(&self) -> Vec<String> {
        match self.lines.lock() {
            Ok(lines) => lines.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn write(&self, level: &str, message: &str) -> LogResult {
        let line = match &self.namespace {
            Some(namespace) => format!("{} {}: {}", level, namespace, message),
            None => format!("{} {}", level, message),
        };
        self.lines
            .lock()
            .map_err(|e| e.to_string())?
            .push(line);
        Ok(())
    }
}

impl Logger for LoggerFake {
    fn info(&self, message: &str) -> LogResult {
        self.write("INFO", message)
    }

    fn warn(&self, message: &str) -> LogResult {
        self.write("WARN", message)
    }

    fn error(&self, message: &str) -> LogResult {
        self.write("ERROR", message)
    }

    fn with_namespace(&self, namespace: &str) -> Arc<dyn Logger + Send + Sync> {
        Arc::new(LoggerFake {
            namespace: Some(join_namespace(&self.namespace, namespace)),
            lines: Arc::clone(&self.lines),
        })
    }
}
