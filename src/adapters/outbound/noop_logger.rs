use crate::domains::logger::DomainLogger;
use std::sync::Arc;

struct NoopBridge;

impl DomainLogger for NoopBridge {
    fn info(&self, _msg: &str) {}
    fn warn(&self, _msg: &str) {}
    fn error(&self, _msg: &str) {}
}

/// A DomainLogger that drops everything; default for tests and benchmarks.
pub fn init_noop_logger() -> Arc<dyn DomainLogger> {
    Arc::new(NoopBridge {})
}
