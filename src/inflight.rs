//! Single in-flight task per operation.
//!
//! Each operation owns an [`InFlight`] flag. A trigger that arrives while the
//! previous one is still running is rejected with [`ResumeError::Busy`]
//! instead of racing it for the shared text area.

use crate::error::ResumeError;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::warn;

#[derive(Debug)]
pub struct InFlight {
    operation: &'static str,
    busy: AtomicBool,
}

impl InFlight {
    pub const fn new(operation: &'static str) -> Self {
        Self {
            operation,
            busy: AtomicBool::new(false),
        }
    }

    /// Claim the flag until the returned guard is dropped.
    pub fn try_begin(&self) -> Result<InFlightGuard<'_>, ResumeError> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!("Rejected {}: already in progress", self.operation);
            return Err(ResumeError::Busy {
                operation: self.operation,
            });
        }
        Ok(InFlightGuard { owner: self })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Releases the flag on drop, including on early return and panic.
#[derive(Debug)]
pub struct InFlightGuard<'a> {
    owner: &'a InFlight,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.owner.busy.store(false, Ordering::Release);
    }
}
