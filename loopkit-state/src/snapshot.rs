//! Immutable state snapshots over type-erased property storage
//!
//! A [`Snapshot`] is the value a store holds between flushes. Snapshots are
//! never mutated in place: a flush always produces a snapshot with a fresh
//! identity, and the previous snapshot stays valid for anyone still holding
//! it.

use std::any::Any;
use std::collections::HashMap;
use std::rc::Rc;

use crate::property::Property;

/// Object-safe view over a stored property value
///
/// Bridges typed [`Property`] values into the type-erased bag while keeping
/// equality comparison available for key-change detection. Values of
/// different concrete types never compare equal.
pub(crate) trait AnyProperty: Any {
    fn key(&self) -> &'static str;
    fn eq_dyn(&self, other: &dyn AnyProperty) -> bool;
    fn as_any(&self) -> &dyn Any;
}

impl<P: Property> AnyProperty for P {
    fn key(&self) -> &'static str {
        P::KEY
    }

    fn eq_dyn(&self, other: &dyn AnyProperty) -> bool {
        other
            .as_any()
            .downcast_ref::<P>()
            .is_some_and(|other| self == other)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Type-erased property storage keyed by `Property::KEY`
#[derive(Default)]
pub(crate) struct PropertyBag {
    values: HashMap<&'static str, Rc<dyn AnyProperty>>,
}

impl PropertyBag {
    /// Insert or overwrite the value at the property's key
    pub(crate) fn insert(&mut self, value: Rc<dyn AnyProperty>) {
        self.values.insert(value.key(), value);
    }
}

/// Immutable snapshot of a store's state
///
/// Cheap to clone (shared storage). Two snapshots produced by different
/// flushes always have different identities, observable through
/// [`Snapshot::ptr_eq`], even when every property value is unchanged.
///
/// # Example
///
/// ```rust,ignore
/// let snapshot = store.get();
/// if let Some(Volume(level)) = snapshot.get::<Volume>() {
///     println!("volume is {level}");
/// }
/// ```
#[derive(Clone)]
pub struct Snapshot {
    bag: Rc<PropertyBag>,
}

impl Snapshot {
    /// An empty snapshot with no properties
    pub(crate) fn empty() -> Self {
        Self {
            bag: Rc::new(PropertyBag::default()),
        }
    }

    pub(crate) fn from_bag(bag: PropertyBag) -> Self {
        Self { bag: Rc::new(bag) }
    }

    /// Shallow copy of the underlying storage, for building the next
    /// snapshot during a flush
    pub(crate) fn to_bag(&self) -> PropertyBag {
        PropertyBag {
            values: self.bag.values.clone(),
        }
    }

    /// Get a property value by type
    ///
    /// Returns `None` if the property has never been written.
    pub fn get<P: Property>(&self) -> Option<P> {
        self.bag
            .values
            .get(P::KEY)
            .and_then(|value| value.as_any().downcast_ref::<P>())
            .cloned()
    }

    /// Whether a value exists at `key`
    pub fn contains(&self, key: &str) -> bool {
        self.bag.values.contains_key(key)
    }

    /// Number of properties present
    pub fn len(&self) -> usize {
        self.bag.values.len()
    }

    /// Whether the snapshot holds no properties
    pub fn is_empty(&self) -> bool {
        self.bag.values.is_empty()
    }

    /// Keys present in this snapshot, in no particular order
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.bag.values.keys().copied()
    }

    /// Whether two snapshots are the same underlying allocation
    ///
    /// Every flush produces a snapshot for which this returns `false`
    /// against the pre-flush snapshot.
    pub fn ptr_eq(a: &Snapshot, b: &Snapshot) -> bool {
        Rc::ptr_eq(&a.bag, &b.bag)
    }

    /// Whether the value at `key` differs between `prev` and `self`
    ///
    /// Present-vs-absent counts as a change. Comparison is typed equality;
    /// values of different concrete types at the same key are a change.
    pub(crate) fn key_changed(&self, prev: &Snapshot, key: &str) -> bool {
        match (prev.bag.values.get(key), self.bag.values.get(key)) {
            (None, None) => false,
            (Some(before), Some(after)) => !before.eq_dyn(after.as_ref()),
            _ => true,
        }
    }
}

impl std::fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut keys: Vec<_> = self.bag.values.keys().collect();
        keys.sort();
        f.debug_struct("Snapshot").field("keys", &keys).finish()
    }
}
