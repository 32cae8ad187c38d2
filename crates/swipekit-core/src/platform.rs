//! Platform abstraction for runtime scheduling.
//!
//! The host owns the real frame loop. The runtime only tells it when another
//! frame (or a main-context drain) is needed.

/// Schedules work for the swipekit runtime.
///
/// Implementations must be safe to call from any thread because the
/// [`MainDispatcher`](crate::MainDispatcher) can post tasks from outside the
/// runtime thread.
pub trait RuntimeScheduler: Send + Sync {
    /// Request that the host schedule a new frame.
    fn schedule_frame(&self);
}

/// Scheduler that ignores frame requests.
///
/// Useful for hosts that pump frames unconditionally.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopScheduler;

impl RuntimeScheduler for NoopScheduler {
    fn schedule_frame(&self) {}
}
