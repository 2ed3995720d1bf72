//! Deferral scheduling for single-threaded event loops
//!
//! Defers a zero-argument callback to "the next appropriate point" on the
//! current event loop and hands back an idempotent cancellation handle.
//! Three mechanisms are supported, tried in a fixed fallback order:
//!
//! - **Idle**: run the callback when the loop is expected to be quiet
//!   (requested via `use_idle`, honored only if the host configuration
//!   provides an idle period)
//! - **Frame**: run the callback on the next paint-frame boundary
//! - **Task**: run the callback as an immediate task on the next loop turn
//!
//! Exactly one mechanism is chosen per call and scheduling always succeeds;
//! there are no retries and no error surface.
//!
//! All scheduling goes through `tokio::task::spawn_local`, so callers must
//! be running inside a [`tokio::task::LocalSet`] on a current-thread
//! runtime.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use loopkit_defer::{DeferOptions, Scheduler};
//!
//! let scheduler = Scheduler::new();
//!
//! // Defer to the next frame (use_idle defaults to false).
//! let cancel = scheduler.defer(DeferOptions::default(), || {
//!     println!("ran on a later loop turn");
//! });
//!
//! // Cancellation is idempotent and safe after the callback fired.
//! cancel.cancel();
//! cancel.cancel();
//! ```

mod scheduler;

pub use scheduler::{
    CancelHandle, DeferOptions, Scheduler, Tier, DEFAULT_FRAME_PERIOD, DEFAULT_IDLE_PERIOD,
};
