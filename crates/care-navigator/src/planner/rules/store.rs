use std::path::Path;
use std::sync::{Arc, RwLock};

use tracing::{info, warn};

use super::{RuleSet, RuleSetError};

/// Holds the active rule snapshot. Readers get an `Arc` they can evaluate
/// against for as long as they like; a reload swaps the pointer, never the
/// tables behind it.
#[derive(Debug)]
pub struct RuleStore {
    current: RwLock<Arc<RuleSet>>,
}

impl RuleStore {
    pub fn new(rules: RuleSet) -> Self {
        Self {
            current: RwLock::new(Arc::new(rules)),
        }
    }

    pub fn snapshot(&self) -> Arc<RuleSet> {
        match self.current.read() {
            Ok(guard) => Arc::clone(&guard),
            // A writer only ever stores a complete `Arc`, so the value is intact.
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Install a new rule set and return the one it replaced.
    pub fn replace(&self, rules: RuleSet) -> Arc<RuleSet> {
        let next = Arc::new(rules);
        let mut guard = match self.current.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let previous = std::mem::replace(&mut *guard, Arc::clone(&next));
        info!(
            previous = previous.version(),
            current = next.version(),
            "rule set replaced"
        );
        previous
    }

    /// Load and validate documents from `dir`, then swap them in. On failure
    /// the active snapshot stays untouched.
    pub fn reload_from_dir(&self, dir: impl AsRef<Path>) -> Result<Arc<RuleSet>, RuleSetError> {
        let dir = dir.as_ref();
        match RuleSet::from_dir(dir) {
            Ok(rules) => {
                self.replace(rules);
                Ok(self.snapshot())
            }
            Err(err) => {
                warn!(dir = %dir.display(), error = %err, "rule reload rejected");
                Err(err)
            }
        }
    }

    /// Swap back to the reference documents compiled into the crate.
    pub fn reload_reference(&self) -> Result<Arc<RuleSet>, RuleSetError> {
        let rules = RuleSet::reference()?;
        self.replace(rules);
        Ok(self.snapshot())
    }
}
