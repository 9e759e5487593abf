use crate::library::logger::interface::{join_namespace, LogResult, Logger};
use chrono::Utc;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct LoggerConsole {
    namespace: Option<String>,
    timezone: chrono::FixedOffset,
}

impl LoggerConsole {
    pub fn new(timezone: chrono::FixedOffset) -> Self {
        Self {
            namespace: None,
            timezone,
        }
    }

    fn write(&self, level: &str, message: &str) -> LogResult {
        let utc_now = Utc::now();
        let local_time = utc_now.with_timezone(&self.timezone);
        let formatted = local_time.format("%Y-%m-%d %I:%M:%S%.3f %p");
        let line = match &self.namespace {
            Some(namespace) => format!("[{}] {} {}: {}", formatted, level, namespace, message),
            None => format!("[{}] {} {}", formatted, level, message),
        };
        if level == "ERROR" {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
        Ok(())
    }
}

impl Logger for LoggerConsole {
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
        Arc::new(LoggerConsole {
            namespace: Some(join_namespace(&self.namespace, namespace)),
            timezone: self.timezone,
        })
    }
}
