//! Core runtime for swipekit.
//!
//! Two execution contexts are modelled explicitly:
//!
//! - the **animation context**, where frame callbacks run when the host calls
//!   [`Runtime::drain_frame_callbacks`];
//! - the **main context**, where application callbacks run when the host calls
//!   [`Runtime::drain_main_tasks`].
//!
//! Engines never call application code from a frame callback; they post it
//! with [`RuntimeHandle::post_main`] instead.

mod frame_clock;
mod platform;
mod runtime;

pub use frame_clock::{FrameCallbackRegistration, FrameClock};
pub use platform::{NoopScheduler, RuntimeScheduler};
pub use runtime::{MainDispatcher, Runtime, RuntimeHandle};

pub type FrameCallbackId = u64;

pub mod prelude {
    pub use crate::frame_clock::FrameClock;
    pub use crate::runtime::{Runtime, RuntimeHandle};
}
