//! LRU Table Module
//!
//! Key index plus recency order for cache entries.
//!
//! Entries live in a slot arena addressed by `usize` handles. The recency
//! order is a doubly linked list threaded through the entries' `prev`/`next`
//! handles:
//! - Front (`head`) = least recently used, next eviction candidate
//! - Back (`tail`) = most recently used
//!
//! Vacated slots are recycled through a free list, so handles stay stable for
//! the lifetime of an entry and every relink is O(1).

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::time::Instant;

use crate::cache::CacheEntry;

// == LRU Table ==
#[derive(Debug)]
pub struct LruTable<K, V> {
    /// Key to arena handle
    index: HashMap<K, usize>,
    /// Entry storage; `None` marks a free slot
    slots: Vec<Option<CacheEntry<K, V>>>,
    /// Handles of vacated slots
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    /// Number of stored entries that carry a deadline
    with_deadline: usize,
}

impl<K, V> LruTable<K, V>
where
    K: Hash + Eq + Clone,
{
    // == Constructor ==
    /// Creates an empty table with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            index: HashMap::with_capacity(capacity),
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            head: None,
            tail: None,
            with_deadline: 0,
        }
    }

    // == Locate ==
    /// Returns the handle of the entry stored under `key`.
    pub fn locate<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.get(key).copied()
    }

    /// Returns the entry behind a live handle.
    pub fn entry(&self, handle: usize) -> Option<&CacheEntry<K, V>> {
        self.slots.get(handle).and_then(Option::as_ref)
    }

    // == Replace ==
    /// Overwrites value and deadline of a live entry in place.
    ///
    /// Returns false if the handle is not live.
    pub fn replace(&mut self, handle: usize, value: V, expires_at: Option<Instant>) -> bool {
        let Some(entry) = self.slots.get_mut(handle).and_then(Option::as_mut) else {
            return false;
        };
        let had_deadline = entry.expires_at.is_some();
        entry.replace(value, expires_at);

        match (had_deadline, expires_at.is_some()) {
            (false, true) => self.with_deadline += 1,
            (true, false) => self.with_deadline -= 1,
            _ => {}
        }
        true
    }

    // == Push Back ==
    /// Inserts a new entry as most recently used and returns its handle.
    ///
    /// If the key is already present the old entry is removed first, so the
    /// index never holds two entries for one key.
    pub fn push_back(&mut self, mut entry: CacheEntry<K, V>) -> usize {
        if let Some(existing) = self.locate(&entry.key) {
            self.remove(existing);
        }

        entry.prev = self.tail;
        entry.next = None;
        let key = entry.key.clone();
        if entry.expires_at.is_some() {
            self.with_deadline += 1;
        }

        let handle = match self.free.pop() {
            Some(handle) => {
                self.slots[handle] = Some(entry);
                handle
            }
            None => {
                self.slots.push(Some(entry));
                self.slots.len() - 1
            }
        };

        match self.tail {
            Some(tail) => self.link_mut(tail).next = Some(handle),
            None => self.head = Some(handle),
        }
        self.tail = Some(handle);
        self.index.insert(key, handle);
        handle
    }

    // == Move To Back ==
    /// Marks the entry as most recently used.
    pub fn move_to_back(&mut self, handle: usize) {
        if self.tail == Some(handle) || self.entry(handle).is_none() {
            return;
        }
        self.unlink(handle);

        let old_tail = self.tail;
        {
            let entry = self.link_mut(handle);
            entry.prev = old_tail;
            entry.next = None;
        }
        match old_tail {
            Some(tail) => self.link_mut(tail).next = Some(handle),
            None => self.head = Some(handle),
        }
        self.tail = Some(handle);
    }

    // == Remove ==
    /// Removes the entry from both the order and the index.
    ///
    /// Returns None if the handle is not live.
    pub fn remove(&mut self, handle: usize) -> Option<CacheEntry<K, V>> {
        self.entry(handle)?;
        self.unlink(handle);

        let mut entry = self.slots[handle].take()?;
        entry.prev = None;
        entry.next = None;
        self.index.remove(&entry.key);
        self.free.push(handle);
        if entry.expires_at.is_some() {
            self.with_deadline -= 1;
        }
        Some(entry)
    }

    // == Evict Front ==
    /// Removes and returns the least recently used entry.
    ///
    /// Returns None if the table is empty.
    pub fn evict_front(&mut self) -> Option<CacheEntry<K, V>> {
        let head = self.head?;
        self.remove(head)
    }

    // == Handles ==
    /// Iterates live handles from least to most recently used.
    pub fn handles(&self) -> Handles<'_, K, V> {
        Handles {
            table: self,
            cursor: self.head,
        }
    }

    // == Length ==
    /// Returns the number of stored entries, expired or not.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns the number of entries still live at `now`.
    ///
    /// O(1) while no stored entry has a deadline, O(n) otherwise.
    pub fn live_len(&self, now: Instant) -> usize {
        if self.with_deadline == 0 {
            return self.len();
        }
        let expired = self
            .handles()
            .filter_map(|handle| self.entry(handle))
            .filter(|entry| entry.is_expired_at(now))
            .count();
        self.len() - expired
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    // == Clear ==
    /// Drops every entry and releases the arena.
    pub fn clear(&mut self) {
        self.index.clear();
        self.slots.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
        self.with_deadline = 0;
    }

    /// Detaches a live entry from its neighbours, fixing head/tail.
    fn unlink(&mut self, handle: usize) {
        let (prev, next) = {
            let entry = self.link_mut(handle);
            (entry.prev.take(), entry.next.take())
        };

        match prev {
            Some(prev) => self.link_mut(prev).next = next,
            None => self.head = next,
        }
        match next {
            Some(next) => self.link_mut(next).prev = prev,
            None => self.tail = prev,
        }
    }

    /// Mutable access to a handle reachable from the list.
    ///
    /// Panics if the handle is vacant, which would mean the links are corrupt.
    fn link_mut(&mut self, handle: usize) -> &mut CacheEntry<K, V> {
        self.slots[handle]
            .as_mut()
            .expect("recency list links to a vacant slot")
    }
}

// == Handle Iterator ==
/// Iterator over live handles in LRU to MRU order.
pub struct Handles<'a, K, V> {
    table: &'a LruTable<K, V>,
    cursor: Option<usize>,
}

impl<K, V> Iterator for Handles<'_, K, V> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let handle = self.cursor?;
        self.cursor = self
            .table
            .slots
            .get(handle)
            .and_then(Option::as_ref)
            .and_then(|entry| entry.next);
        Some(handle)
    }
}
