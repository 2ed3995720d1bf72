//! Idle/Frame-Driven Batch Queue Scheduling
//!
//! A generic queue scheduler for single-threaded event loops: items are
//! enqueued synchronously and drained in batches on later loop turns, with
//! optional blocking backpressure.
//!
//! # Features
//!
//! - **Deferred Draining**: batches are taken on idle or frame boundaries,
//!   never on the enqueueing turn
//! - **Single Pending Drain**: enqueueing while a drain is booked never
//!   books a second one
//! - **FIFO or Unique Storage**: ordered with duplicates, or an
//!   insertion-ordered set where re-adding is a position-preserving no-op
//! - **Backpressure**: blocking mode serializes batches on hook completion;
//!   non-blocking mode fires and forgets
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use loopkit_queue::{IdleQueue, IdleQueueOptions};
//!
//! // Inside a tokio LocalSet on a current-thread runtime:
//! let queue = IdleQueue::fifo(IdleQueueOptions {
//!     batch_size: 8,
//!     block: true,
//!     ..IdleQueueOptions::default()
//! });
//!
//! queue.on_take(|batch: Vec<u32>| {
//!     println!("processing {} items", batch.len());
//! });
//!
//! for item in 0..20 {
//!     queue.enqueue(item);
//! }
//! ```

// Modules
pub mod backlog;
pub mod idle_queue;

// Re-exports - Public API
pub use backlog::{Backlog, FifoBacklog, UniqueBacklog};
pub use idle_queue::{IdleQueue, IdleQueueOptions, DEFAULT_BATCH_SIZE};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::backlog::{Backlog, FifoBacklog, UniqueBacklog};
    pub use crate::idle_queue::{IdleQueue, IdleQueueOptions};
}
