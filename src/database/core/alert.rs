//! Failure alerting hook
//!
//! Query helpers swallow failures and fall back to defaults, so every such
//! failure is reported through an [`Alerter`] first. The hook is injected into
//! [`RdsDb`](super::RdsDb) rather than being process-wide.

use std::sync::{Arc, Mutex};

/// Receiver of failure reports
pub trait Alerter: Send + Sync {
    fn alert(&self, message: &str);
}

/// Default alerter: emits a `tracing` warning on the `rdskit::alert` target
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAlerter;

impl Alerter for TracingAlerter {
    fn alert(&self, message: &str) {
        tracing::warn!(target: "rdskit::alert", "{}", message);
    }
}

/// Alerter that keeps every report in memory
#[derive(Debug, Default, Clone)]
pub struct MemoryAlerter {
    messages: Arc<Mutex<Vec<String>>>,
}

impl MemoryAlerter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the reports received so far
    pub fn messages(&self) -> Vec<String> {
        match self.messages.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.messages().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        match self.messages.lock() {
            Ok(mut guard) => guard.clear(),
            Err(poisoned) => poisoned.into_inner().clear(),
        }
    }
}

impl Alerter for MemoryAlerter {
    fn alert(&self, message: &str) {
        match self.messages.lock() {
            Ok(mut guard) => guard.push(message.to_string()),
            Err(poisoned) => poisoned.into_inner().push(message.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_alerter_collects() {
        let alerter = MemoryAlerter::new();
        assert!(alerter.is_empty());

        alerter.alert("first");
        alerter.alert("second");
        assert_eq!(alerter.messages(), vec!["first", "second"]);

        alerter.clear();
        assert!(alerter.is_empty());
    }

    #[test]
    fn test_memory_alerter_clones_share_storage() {
        let alerter = MemoryAlerter::new();
        let shared: Arc<dyn Alerter> = Arc::new(alerter.clone());
        shared.alert("via trait object");
        assert_eq!(alerter.len(), 1);
    }
}
