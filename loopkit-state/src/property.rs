//! Property trait for typed state fields
//!
//! A store's value is a bag of typed properties. The Property trait defines
//! the contract for values that can be written through a [`Patch`] and
//! watched through key-scoped subscriptions.
//!
//! [`Patch`]: crate::Patch
//!
//! # Example
//!
//! ```rust
//! use loopkit_state::Property;
//!
//! #[derive(Clone, PartialEq, Debug)]
//! pub struct Volume(pub u8);
//!
//! impl Property for Volume {
//!     const KEY: &'static str = "volume";
//! }
//! ```

/// Marker trait for properties that can be stored and watched
///
/// Properties must be:
/// - Clone: values are handed out by value from snapshots
/// - PartialEq: for key-change detection between consecutive snapshots
/// - 'static: for type-erased storage
///
/// The KEY constant is the field name used by key-scoped subscriptions and
/// by patch merging. Keys must be unique within one store: one property
/// type per key.
pub trait Property: Clone + PartialEq + 'static {
    /// Key identifying this property within a store
    ///
    /// Used for patch merging, key-scoped subscription gating, and logging.
    ///
    /// # Examples
    ///
    /// - `"volume"` for an audio level
    /// - `"theme"` for a UI theme selection
    /// - `"connection_state"` for network status
    const KEY: &'static str;
}
