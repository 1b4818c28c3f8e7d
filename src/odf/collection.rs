//! Ordered collection with identity-tracked entries and change notification.
//!
//! A paragraph keeps its runs and nested content in [`ObservableSequence`]s.
//! Every insert and remove is reported synchronously to a
//! [`SequenceObserver`] passed with the call, which is how the paragraph keeps
//! its backing markup in step with the collections.

use crate::common::{Error, Result};
use std::fmt;

/// Stable identity of an entry in an [`ObservableSequence`].
///
/// Ids are never reused within one sequence, so two equal items inserted
/// separately are still distinguishable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(u64);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Receiver of change notifications from an [`ObservableSequence`]
pub trait SequenceObserver<T> {
    /// Called after `item` was inserted at `index`
    fn inserted(&mut self, index: usize, id: EntryId, item: &T);

    /// Called after `item` was removed from `index`
    fn removed(&mut self, index: usize, id: EntryId, item: &T);
}

/// No-op observer for unowned sequences
impl<T> SequenceObserver<T> for () {
    fn inserted(&mut self, _index: usize, _id: EntryId, _item: &T) {}

    fn removed(&mut self, _index: usize, _id: EntryId, _item: &T) {}
}

/// Ordered sequence whose mutations notify an observer before returning
#[derive(Debug, Clone)]
pub struct ObservableSequence<T> {
    entries: Vec<(EntryId, T)>,
    next_id: u64,
}

impl<T> Default for ObservableSequence<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
        }
    }
}

impl<T> ObservableSequence<T> {
    /// Create an empty sequence
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the sequence is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert `item` at `index` and notify `observer`.
    ///
    /// `index == len` appends. Larger indices fail and leave the sequence
    /// and the observer untouched.
    pub fn insert(
        &mut self,
        index: usize,
        item: T,
        observer: &mut impl SequenceObserver<T>,
    ) -> Result<EntryId> {
        if index > self.entries.len() {
            return Err(Error::IndexOutOfRange {
                index,
                len: self.entries.len(),
            });
        }
        let id = EntryId(self.next_id);
        self.next_id += 1;
        self.entries.insert(index, (id, item));
        observer.inserted(index, id, &self.entries[index].1);
        Ok(id)
    }

    /// Append `item` and notify `observer`
    pub fn push(&mut self, item: T, observer: &mut impl SequenceObserver<T>) -> EntryId {
        let id = EntryId(self.next_id);
        self.next_id += 1;
        let index = self.entries.len();
        self.entries.push((id, item));
        observer.inserted(index, id, &self.entries[index].1);
        id
    }

    /// Remove the entry with identity `id` and notify `observer`
    pub fn remove(&mut self, id: EntryId, observer: &mut impl SequenceObserver<T>) -> Result<T> {
        let index = self
            .position(id)
            .ok_or_else(|| Error::NotFound(format!("entry {}", id)))?;
        Ok(self.detach(index, observer))
    }

    /// Remove the entry at `index` and notify `observer`
    pub fn remove_at(&mut self, index: usize, observer: &mut impl SequenceObserver<T>) -> Result<T> {
        if index >= self.entries.len() {
            return Err(Error::IndexOutOfRange {
                index,
                len: self.entries.len(),
            });
        }
        Ok(self.detach(index, observer))
    }

    fn detach(&mut self, index: usize, observer: &mut impl SequenceObserver<T>) -> T {
        let (id, item) = self.entries.remove(index);
        observer.removed(index, id, &item);
        item
    }

    /// Item at `index`
    pub fn get(&self, index: usize) -> Option<&T> {
        self.entries.get(index).map(|(_, item)| item)
    }

    /// Item with identity `id`
    pub fn get_by_id(&self, id: EntryId) -> Option<&T> {
        self.entries
            .iter()
            .find(|(entry_id, _)| *entry_id == id)
            .map(|(_, item)| item)
    }

    /// Mutable access to the item with identity `id`.
    ///
    /// Not observed; owners that mirror items elsewhere must resync after
    /// mutating through this.
    pub(crate) fn get_by_id_mut(&mut self, id: EntryId) -> Option<&mut T> {
        self.entries
            .iter_mut()
            .find(|(entry_id, _)| *entry_id == id)
            .map(|(_, item)| item)
    }

    /// Current index of the entry with identity `id`
    pub fn position(&self, id: EntryId) -> Option<usize> {
        self.entries.iter().position(|(entry_id, _)| *entry_id == id)
    }

    /// Identity of the entry at `index`
    pub fn id_at(&self, index: usize) -> Option<EntryId> {
        self.entries.get(index).map(|(id, _)| *id)
    }

    /// Iterate over items in order
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|(_, item)| item)
    }

    /// Iterate over entry identities in order
    pub fn ids(&self) -> impl Iterator<Item = EntryId> + '_ {
        self.entries.iter().map(|(id, _)| *id)
    }

    /// Iterate over `(id, item)` pairs in order
    pub fn entries(&self) -> impl Iterator<Item = (EntryId, &T)> {
        self.entries.iter().map(|(id, item)| (*id, item))
    }
}
