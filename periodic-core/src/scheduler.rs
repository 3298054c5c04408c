//! Background execution for best-effort side effects.
//!
//! Tools call [`TaskScheduler::schedule`] unconditionally; the scheduler
//! decides whether the task runs on an ambient runtime or to completion
//! on the spot.

use std::future::Future;
use std::pin::Pin;

pub type BackgroundTask = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

pub trait TaskScheduler: Send + Sync {
    fn schedule(&self, task: BackgroundTask);
}

/// Spawns onto the current Tokio runtime when there is one, otherwise runs the
/// task to completion on a throwaway current-thread runtime.
#[derive(Debug, Default, Clone, Copy)]
pub struct RuntimeScheduler;

impl TaskScheduler for RuntimeScheduler {
    fn schedule(&self, task: BackgroundTask) {
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(task);
            }
            Err(_) => match tokio::runtime::Builder::new_current_thread().enable_all().build() {
                Ok(runtime) => runtime.block_on(task),
                Err(e) => {
                    tracing::error!(error = %e, "failed to start runtime for background task");
                }
            },
        }
    }
}
