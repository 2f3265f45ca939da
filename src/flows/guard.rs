//! Scope guards that release on every exit path.

use std::sync::atomic::{AtomicBool, Ordering};

use super::StatusSink;

/// Per-flow in-flight flag.
#[derive(Debug, Default)]
pub struct InFlight {
    running: AtomicBool,
}

impl InFlight {
    pub const fn new() -> Self {
        Self {
            running: AtomicBool::new(false),
        }
    }

    /// Marks the flow as running, or returns `None` if it already is.
    pub fn try_acquire(&self) -> Option<InFlightGuard<'_>> {
        self.running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlightGuard { flag: self })
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}

/// Clears the in-flight flag when dropped.
#[derive(Debug)]
pub struct InFlightGuard<'a> {
    flag: &'a InFlight,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.running.store(false, Ordering::Release);
    }
}

/// Disables a trigger control for as long as it is alive.
pub struct TriggerGuard<'a, U: StatusSink + ?Sized> {
    ui: &'a U,
}

impl<'a, U: StatusSink + ?Sized> TriggerGuard<'a, U> {
    pub fn disable(ui: &'a U) -> Self {
        ui.set_trigger_enabled(false);
        Self { ui }
    }
}

impl<U: StatusSink + ?Sized> Drop for TriggerGuard<'_, U> {
    fn drop(&mut self) {
        self.ui.set_trigger_enabled(true);
    }
}
