//! Cancellable periodic task used to drive overlap relaxation.
//!
//! A running task is represented by its handle; dropping the handle cancels
//! it. `RelaxationTimer` owns at most one handle, so stopping (or starting a
//! new task) always releases the previous one.

use gloo_timers::callback::Interval;
use log::debug;

/// Something that can run `tick` every `period_ms` until the returned handle
/// is dropped.
pub trait Scheduler {
    type Handle;

    fn every(&self, period_ms: u32, tick: Box<dyn FnMut()>) -> Self::Handle;
}

/// Browser scheduler backed by `setInterval`.
#[derive(Clone, Copy, Debug, Default)]
pub struct IntervalScheduler;

impl Scheduler for IntervalScheduler {
    type Handle = Interval;

    fn every(&self, period_ms: u32, mut tick: Box<dyn FnMut()>) -> Interval {
        Interval::new(period_ms, move || tick())
    }
}

pub struct RelaxationTimer<S: Scheduler> {
    scheduler: S,
    handle: Option<S::Handle>,
}

impl<S: Scheduler> RelaxationTimer<S> {
    pub fn new(scheduler: S) -> Self {
        Self { scheduler, handle: None }
    }

    /// Start ticking, replacing (and cancelling) any task already running.
    pub fn start(&mut self, period_ms: u32, tick: Box<dyn FnMut()>) {
        self.stop();
        self.handle = Some(self.scheduler.every(period_ms, tick));
        debug!("relaxation timer started ({period_ms} ms)");
    }

    /// Cancel the running task. Safe to call repeatedly; returns whether a
    /// task was actually cancelled.
    pub fn stop(&mut self) -> bool {
        match self.handle.take() {
            Some(handle) => {
                drop(handle);
                debug!("relaxation timer stopped");
                true
            }
            None => false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }
}

impl<S: Scheduler> Drop for RelaxationTimer<S> {
    fn drop(&mut self) {
        self.stop();
    }
}
