//! Key-value lookups against the application tables
//!
//! - `controls`: per-host configuration values grouped by zone
//! - `runtime`: process-wide named values

mod controls;
mod runtime;

pub use controls::ControlsRepository;
pub use runtime::RuntimeRepository;

use super::core::RdsDb;

impl RdsDb {
    /// Control lookups scoped to this handle's host
    pub fn controls(&self) -> ControlsRepository<'_> {
        ControlsRepository::new(self)
    }

    /// Runtime value lookups
    pub fn runtime(&self) -> RuntimeRepository<'_> {
        RuntimeRepository::new(self)
    }
}
