//! Asynchronous, Mutation-Batching State Container
//!
//! A state store for single-threaded event loops that accumulates partial
//! patches and applies them in one batched flush on a later loop turn.
//!
//! # Features
//!
//! - **Typed Properties**: state is a bag of strongly-typed property values
//! - **Batched Flushes**: patches queued on one turn merge into a single
//!   flush, in arrival order, later writes winning per key
//! - **Fresh Snapshots**: every flush produces a new immutable snapshot,
//!   even when no value changed
//! - **Key-Scoped Subscriptions**: subscribers can gate on a set of keys
//!   and only fire when one of them actually changed
//! - **Safe Mutation During Notification**: unsubscribing from inside a
//!   callback never disturbs the in-progress notification pass
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use loopkit_state::{Patch, Property, Store};
//!
//! #[derive(Clone, PartialEq, Debug)]
//! struct Volume(u8);
//!
//! impl Property for Volume {
//!     const KEY: &'static str = "volume";
//! }
//!
//! // Inside a tokio LocalSet on a current-thread runtime:
//! let store = Store::new(Patch::of(Volume(50)));
//!
//! let sub = store.subscribe_keys(&["volume"], |next, prev| {
//!     println!("{:?} -> {:?}", prev.get::<Volume>(), next.get::<Volume>());
//! });
//!
//! // Queue a patch and await the flush that applies it.
//! let snapshot = store.update(Patch::of(Volume(75))).await?;
//! assert_eq!(snapshot.get::<Volume>(), Some(Volume(75)));
//!
//! sub.unsubscribe();
//! ```
//!
//! # Architecture
//!
//! ```text
//! Store
//!     │
//!     ├── current: Snapshot            (immutable, replaced wholesale)
//!     │
//!     ├── pending: Vec<Patch>          (drained atomically at flush)
//!     │
//!     ├── dirty flag ──► Scheduler     (edge-triggered: one flush in flight)
//!     │
//!     └── subscribers + tombstones     (lazy removal, stable passes)
//! ```

// Modules
pub mod error;
pub mod patch;
pub mod property;
pub mod snapshot;
pub mod store;

// Re-exports - Public API
pub use error::{Result, StoreError};
pub use patch::Patch;
pub use property::Property;
pub use snapshot::Snapshot;
pub use store::{NextFlush, Store, StoreOptions, Subscription, DEFAULT_FLUSH_TIMEOUT};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::error::StoreError;
    pub use crate::patch::Patch;
    pub use crate::property::Property;
    pub use crate::snapshot::Snapshot;
    pub use crate::store::{Store, StoreOptions, Subscription};
}
