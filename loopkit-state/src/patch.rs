//! Partial state writes
//!
//! A [`Patch`] is an ordered set of property writes. Patches queued against
//! a store merge left-to-right at flush time: later patches overwrite
//! earlier ones per key, and within one patch later writes to the same key
//! win. Merging is shallow; a property value is replaced as a whole.

use std::rc::Rc;

use crate::property::Property;
use crate::snapshot::{AnyProperty, PropertyBag};

/// An ordered, partial write set over a store's properties
///
/// # Example
///
/// ```rust,ignore
/// use loopkit_state::Patch;
///
/// store.update(Patch::new().set(Volume(30)).set(Mute(false)));
/// ```
#[derive(Clone, Default)]
pub struct Patch {
    writes: Vec<Rc<dyn AnyProperty>>,
}

impl Patch {
    /// Create an empty patch
    pub fn new() -> Self {
        Self::default()
    }

    /// A patch carrying a single property write
    pub fn of<P: Property>(value: P) -> Self {
        Self::new().set(value)
    }

    /// Append a property write, consuming and returning the patch
    pub fn set<P: Property>(mut self, value: P) -> Self {
        self.writes.push(Rc::new(value));
        self
    }

    /// Number of writes in this patch
    pub fn len(&self) -> usize {
        self.writes.len()
    }

    /// Whether the patch carries no writes
    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    /// Keys written by this patch, in write order
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.writes.iter().map(|write| write.key())
    }

    /// Apply every write in order onto `bag`
    pub(crate) fn apply_to(&self, bag: &mut PropertyBag) {
        for write in &self.writes {
            bag.insert(Rc::clone(write));
        }
    }
}

impl std::fmt::Debug for Patch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Patch")
            .field("keys", &self.keys().collect::<Vec<_>>())
            .finish()
    }
}
