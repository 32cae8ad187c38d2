use std::cell::Cell;
use std::sync::Arc;

use swipekit_core::{FrameClock, Runtime, RuntimeHandle, RuntimeScheduler};

/// One 60fps frame.
pub const FRAME_NANOS: u64 = 16_666_667;

/// Upper bound for [`TestRuntime::run_until_idle`]; ten seconds of frames.
const MAX_IDLE_FRAMES: usize = 600;

/// Frames are pumped explicitly by the harness, so requests are ignored.
struct ManualScheduler;

impl RuntimeScheduler for ManualScheduler {
    fn schedule_frame(&self) {}
}

/// Runtime wrapper that plays the host: it owns a virtual clock and pumps
/// frames and main-context tasks on demand.
pub struct TestRuntime {
    runtime: Runtime,
    frame_time_nanos: Cell<u64>,
}

impl TestRuntime {
    pub fn new() -> Self {
        Self {
            runtime: Runtime::new(Arc::new(ManualScheduler)),
            frame_time_nanos: Cell::new(0),
        }
    }

    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    pub fn handle(&self) -> RuntimeHandle {
        self.runtime.handle()
    }

    pub fn frame_clock(&self) -> FrameClock {
        self.runtime.frame_clock()
    }

    pub fn frame_time_nanos(&self) -> u64 {
        self.frame_time_nanos.get()
    }

    /// Advances the virtual clock by one frame and runs that frame's
    /// callbacks. Main-context tasks are left queued.
    pub fn advance_frame(&self) {
        let time = self.frame_time_nanos.get() + FRAME_NANOS;
        self.frame_time_nanos.set(time);
        self.runtime.drain_frame_callbacks(time);
    }

    /// Advances whole frames until at least `millis` of virtual time passed.
    pub fn advance_millis(&self, millis: u64) {
        let deadline = self.frame_time_nanos.get() + millis * 1_000_000;
        while self.frame_time_nanos.get() < deadline {
            self.advance_frame();
        }
    }

    pub fn drain_main(&self) -> usize {
        self.runtime.drain_main_tasks()
    }

    /// Pumps frames until no frame callback is pending, then drains the main
    /// context. Returns the number of frames pumped.
    ///
    /// Panics if the runtime is still busy after ten seconds of frames.
    pub fn run_until_idle(&self) -> usize {
        let mut frames = 0;
        while self.runtime.has_frame_callbacks() {
            assert!(
                frames < MAX_IDLE_FRAMES,
                "animations still running after {MAX_IDLE_FRAMES} frames"
            );
            self.advance_frame();
            frames += 1;
        }
        self.drain_main();
        log::trace!("runtime idle after {frames} frames");
        frames
    }
}

impl Default for TestRuntime {
    fn default() -> Self {
        Self::new()
    }
}
