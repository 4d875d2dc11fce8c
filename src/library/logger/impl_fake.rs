use crate::library::logger::interface::{LogResult, Logger};
use std::sync::{Arc, Mutex};

/// Records every line in memory so tests can assert on diagnostics.
#[derive(Debug, Clone, Default)]
pub struct LoggerFake {
    namespace: Option<String>,
    lines: Arc<Mutex<Vec<String>>>,
}

impl LoggerFake {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().map(|lines| lines.clone()).unwrap_or_default()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines().iter().any(|line| line.contains(needle))
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
        let new_namespace = match &self.namespace {
            Some(current) => format!("{}:{}", current, namespace),
            None => namespace.to_string(),
        };

        Arc::new(LoggerFake {
            namespace: Some(new_namespace),
            lines: self.lines.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespaces_share_lines() {
        let logger = LoggerFake::new();
        let child = logger.with_namespace("image_identifier");

        logger.info("root").unwrap();
        child.warn("child").unwrap();

        assert_eq!(
            logger.lines(),
            vec!["INFO root".to_string(), "WARN image_identifier: child".to_string()]
        );
    }
}
