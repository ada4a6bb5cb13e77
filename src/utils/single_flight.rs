use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{HarvestError, HarvestResult};

/// Lets at most one run of an operation be in flight; later triggers are
/// rejected with `Busy` until the running one drops its guard.
#[derive(Debug, Clone)]
pub struct SingleFlight {
    name: &'static str,
    running: Arc<AtomicBool>,
}

#[derive(Debug)]
pub struct FlightGuard {
    running: Arc<AtomicBool>,
}

impl SingleFlight {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn try_begin(&self) -> HarvestResult<FlightGuard> {
        self.running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| HarvestError::Busy(self.name))?;
        Ok(FlightGuard {
            running: self.running.clone(),
        })
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}

impl Drop for FlightGuard {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Release);
    }
}
