//! Interning arena for node and weight values.
//!
//! Every distinct value (by `Ord`) lives in exactly one slot. Containers refer to it through a
//! [`Handle`], a `u32` index, or through an [`Interned`] key when they need to order entries by
//! value. The store keeps its live keys in a value-ordered set, which is what the node registry
//! exposes as `Graph::nodes()`.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::sync::Arc;

pub(crate) struct Handle<T> {
    index: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    fn new(index: usize) -> Self {
        let index = u32::try_from(index)
            .expect("value store should hold at most u32::MAX distinct values");
        Self::from_raw(index)
    }

    pub(crate) fn from_raw(index: u32) -> Self {
        Self {
            index,
            _marker: PhantomData,
        }
    }

    pub(crate) fn raw(self) -> u32 {
        self.index
    }

    fn slot(self) -> usize {
        self.index as usize
    }
}

// Manual impls: derives would require `T: Copy`/`T: Eq` even though only the index is compared.
impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl<T> Eq for Handle<T> {}

impl<T> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({})", self.index)
    }
}

/// A handle paired with shared read access to its value.
///
/// Ordered by value, so `BTreeMap`/`BTreeSet` levels keyed by it sort and search without going
/// back to the store. The value itself is allocated once, by the store that issued the handle.
pub(crate) struct Interned<T> {
    value: Arc<T>,
    handle: Handle<T>,
}

impl<T> Interned<T> {
    pub(crate) fn handle(&self) -> Handle<T> {
        self.handle
    }

    pub(crate) fn value(&self) -> &T {
        &self.value
    }
}

impl<T> Clone for Interned<T> {
    fn clone(&self) -> Self {
        Self {
            value: Arc::clone(&self.value),
            handle: self.handle,
        }
    }
}

impl<T: Ord> PartialEq for Interned<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T: Ord> Eq for Interned<T> {}

impl<T: Ord> PartialOrd for Interned<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: Ord> Ord for Interned<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

impl<T: fmt::Debug> fmt::Debug for Interned<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Interned")
            .field(&self.handle)
            .field(&self.value)
            .finish()
    }
}

/// Anything that can present a `Q` to compare against.
///
/// `Interned<T>` borrows as `dyn KeyView<Q>` for every `Q` that `T` borrows as, which lets the
/// registry be searched with `&str` when it holds `String`s.
pub(crate) trait KeyView<Q: ?Sized> {
    fn view(&self) -> &Q;
}

impl<T: Borrow<Q>, Q: ?Sized> KeyView<Q> for Interned<T> {
    fn view(&self) -> &Q {
        (*self.value).borrow()
    }
}

struct BorrowedKey<'q, Q: ?Sized>(&'q Q);

impl<Q: ?Sized> KeyView<Q> for BorrowedKey<'_, Q> {
    fn view(&self) -> &Q {
        self.0
    }
}

impl<'a, T, Q> Borrow<dyn KeyView<Q> + 'a> for Interned<T>
where
    T: Borrow<Q> + 'a,
    Q: ?Sized + 'a,
{
    fn borrow(&self) -> &(dyn KeyView<Q> + 'a) {
        self
    }
}

impl<'a, Q: Ord + ?Sized> PartialEq for dyn KeyView<Q> + 'a {
    fn eq(&self, other: &Self) -> bool {
        self.view() == other.view()
    }
}

impl<'a, Q: Ord + ?Sized> Eq for dyn KeyView<Q> + 'a {}

impl<'a, Q: Ord + ?Sized> PartialOrd for dyn KeyView<Q> + 'a {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<'a, Q: Ord + ?Sized> Ord for dyn KeyView<Q> + 'a {
    fn cmp(&self, other: &Self) -> Ordering {
        self.view().cmp(other.view())
    }
}

#[derive(Debug)]
struct Slot<T> {
    key: Interned<T>,
    refs: usize,
}

#[derive(Debug)]
pub(crate) struct ValueStore<T> {
    slots: Vec<Option<Slot<T>>>,
    free: Vec<u32>,
    // Live keys, ascending by value.
    index: BTreeSet<Interned<T>>,
}

impl<T> ValueStore<T> {
    pub(crate) fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            index: BTreeSet::new(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.index.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.index.clear();
    }

    /// The key behind a live handle, or `None` if the slot is free or out of range.
    pub(crate) fn try_key(&self, handle: Handle<T>) -> Option<&Interned<T>> {
        self.slots.get(handle.slot())?.as_ref().map(|slot| &slot.key)
    }

    pub(crate) fn key(&self, handle: Handle<T>) -> &Interned<T> {
        self.try_key(handle)
            .expect("value store handle should refer to a live slot")
    }

    pub(crate) fn get(&self, handle: Handle<T>) -> &T {
        self.key(handle).value()
    }

    /// Live values in ascending order.
    pub(crate) fn values(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator + '_ {
        self.index.iter().map(Interned::value)
    }

    #[cfg(test)]
    fn refs(&self, handle: Handle<T>) -> usize {
        self.slots[handle.slot()].as_ref().map_or(0, |s| s.refs)
    }
}

impl<T: Ord> ValueStore<T> {
    pub(crate) fn lookup<Q>(&self, key: &Q) -> Option<Handle<T>>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let view: &dyn KeyView<Q> = &BorrowedKey(key);
        self.index.get(view).map(Interned::handle)
    }

    pub(crate) fn contains<Q>(&self, key: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.lookup(key).is_some()
    }

    /// Interns `value`, taking one reference on its slot.
    ///
    /// Returns the handle and whether the value was newly stored.
    pub(crate) fn intern(&mut self, value: T) -> (Handle<T>, bool) {
        if let Some(handle) = self.lookup(&value) {
            self.retain(handle);
            return (handle, false);
        }
        let index = match self.free.pop() {
            Some(index) => index as usize,
            None => {
                self.slots.push(None);
                self.slots.len() - 1
            }
        };
        let key = Interned {
            value: Arc::new(value),
            handle: Handle::new(index),
        };
        self.slots[index] = Some(Slot {
            key: key.clone(),
            refs: 1,
        });
        let handle = key.handle;
        self.index.insert(key);
        (handle, true)
    }

    pub(crate) fn retain(&mut self, handle: Handle<T>) {
        if let Some(slot) = self.slots[handle.slot()].as_mut() {
            slot.refs += 1;
        } else {
            debug_assert!(false, "retain on a released handle");
        }
    }

    /// Drops one reference. The value is removed once no references remain.
    ///
    /// Returns `true` if the value was removed.
    pub(crate) fn release(&mut self, handle: Handle<T>) -> bool {
        let Some(slot) = self.slots[handle.slot()].as_mut() else {
            debug_assert!(false, "release on a released handle");
            return false;
        };
        slot.refs -= 1;
        if slot.refs > 0 {
            return false;
        }
        if let Some(slot) = self.slots[handle.slot()].take() {
            self.index.remove(&slot.key);
        }
        self.free.push(handle.index);
        true
    }

    /// Replaces the value behind `handle`, keeping the handle and its references.
    ///
    /// Returns the key that held the previous value, or `None` (changing nothing) if `value` is
    /// already stored.
    pub(crate) fn relabel(&mut self, handle: Handle<T>, value: T) -> Option<Interned<T>> {
        if self.contains(&value) {
            return None;
        }
        let Some(slot) = self.slots[handle.slot()].as_mut() else {
            debug_assert!(false, "relabel on a released handle");
            return None;
        };
        let key = Interned {
            value: Arc::new(value),
            handle,
        };
        let previous = std::mem::replace(&mut slot.key, key.clone());
        self.index.remove(&previous);
        self.index.insert(key);
        Some(previous)
    }
}

/// Deep copy: the clone allocates its own values, under the same handles.
impl<T: Ord + Clone> Clone for ValueStore<T> {
    fn clone(&self) -> Self {
        let slots: Vec<Option<Slot<T>>> = self
            .slots
            .iter()
            .map(|slot| {
                slot.as_ref().map(|s| Slot {
                    key: Interned {
                        value: Arc::new(s.key.value().clone()),
                        handle: s.key.handle,
                    },
                    refs: s.refs,
                })
            })
            .collect();
        let index = slots.iter().flatten().map(|s| s.key.clone()).collect();
        Self {
            slots,
            free: self.free.clone(),
            index,
        }
    }
}

impl<T> Default for ValueStore<T> {
    fn default() -> Self {
        Self::new()
    }
}
