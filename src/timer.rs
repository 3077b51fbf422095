use gloo_timers::callback::Timeout;
use scene_core::Scheduler;

/// `setTimeout`-backed scheduler. Dropping the handle clears the timeout.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserTimers;

impl Scheduler for BrowserTimers {
    type Handle = Timeout;

    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> Timeout {
        Timeout::new(delay_ms, task)
    }
}
