use crate::config::Limits;
use crate::errors::ContainerError;
use crate::AHashBuilder;
use log::{debug, warn};
use std::hash::BuildHasher;

const INITIAL_BUCKETS: usize = 16;
const GROWTH_FACTOR: usize = 2;
// Resize once len / buckets exceeds 3/4.
const LOAD_FACTOR_NUM: usize = 3;
const LOAD_FACTOR_DEN: usize = 4;

#[derive(Debug)]
struct Entry {
    key: String,
    value: i32,
    hash: u64,
    chain_next: Option<usize>,
    order_prev: Option<usize>,
    order_next: Option<usize>,
}

#[derive(Debug)]
enum Slot {
    Occupied(Entry),
    Vacant { next_free: Option<usize> },
}

/// String-keyed, `i32`-valued hash map that iterates in insertion order.
///
/// Entries live in a slab and are threaded through two sets of links: a bucket chain
/// (`hash mod bucket_count`) for lookup, and a doubly linked order list for iteration.
/// Resizing relinks the chains only, so iteration order is independent of bucket placement.
pub struct OrderedMap {
    buckets: Vec<Option<usize>>,
    slots: Vec<Slot>,
    free_head: Option<usize>,
    len: usize,
    order_head: Option<usize>,
    order_tail: Option<usize>,
    initial_buckets: usize,
    hasher: AHashBuilder,
    limits: Limits,
}

impl Default for OrderedMap {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderedMap {
    pub fn new() -> Self {
        OrderedMap {
            buckets: vec![None; INITIAL_BUCKETS],
            slots: Vec::new(),
            free_head: None,
            len: 0,
            order_head: None,
            order_tail: None,
            initial_buckets: INITIAL_BUCKETS,
            hasher: AHashBuilder::default(),
            limits: Limits::default(),
        }
    }

    /// Create an empty map whose growth is bounded by `limits`.
    ///
    /// A bucket ceiling below 16 starts the map at the largest power of two under it.
    /// Fails if the ceiling is 0 or the initial bucket array cannot be allocated.
    pub fn with_limits(limits: Limits) -> Result<Self, ContainerError> {
        let initial_buckets = match limits.max_buckets {
            Some(0) => return Err(ContainerError::AllocationFailed),
            Some(max) if max < INITIAL_BUCKETS => {
                if max.is_power_of_two() {
                    max
                } else {
                    max.next_power_of_two() / 2
                }
            }
            _ => INITIAL_BUCKETS,
        };
        let mut buckets = Vec::new();
        buckets.try_reserve_exact(initial_buckets)?;
        buckets.resize(initial_buckets, None);
        Ok(OrderedMap {
            buckets,
            initial_buckets,
            limits,
            ..Self::new()
        })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.find(key).is_some()
    }

    pub fn get(&self, key: &str) -> Option<i32> {
        self.find(key)
            .and_then(|idx| self.entry(idx))
            .map(|entry| entry.value)
    }

    /// Insert `key` only if it is not present yet. Returns `false` and leaves the map
    /// untouched on a duplicate key or when the entry cannot be allocated.
    pub fn insert(&mut self, key: &str, value: i32) -> bool {
        self.try_insert(key, value).is_ok()
    }

    pub fn try_insert(&mut self, key: &str, value: i32) -> Result<(), ContainerError> {
        let hash = self.hasher.hash_one(key);
        if self.find_hashed(key, hash).is_some() {
            return Err(ContainerError::DuplicateKey);
        }
        self.append_entry(key, value, hash)?;
        self.grow_if_loaded();
        Ok(())
    }

    /// Upsert. An existing key keeps its position in iteration order.
    pub fn set(&mut self, key: &str, value: i32) -> bool {
        self.try_set(key, value).is_ok()
    }

    pub fn try_set(&mut self, key: &str, value: i32) -> Result<(), ContainerError> {
        let hash = self.hasher.hash_one(key);
        if let Some(entry) = self
            .find_hashed(key, hash)
            .and_then(|idx| self.entry_mut(idx))
        {
            entry.value = value;
            return Ok(());
        }
        self.append_entry(key, value, hash)?;
        self.grow_if_loaded();
        Ok(())
    }

    /// Remove `key`, returning its value. Missing keys are a no-op.
    /// The bucket array is never shrunk.
    pub fn remove(&mut self, key: &str) -> Option<i32> {
        let hash = self.hasher.hash_one(key);
        let bucket = self.bucket_of(hash);

        let mut chain_prev = None;
        let mut cursor = self.buckets[bucket];
        while let Some(idx) = cursor {
            let entry = self.entry(idx)?;
            if entry.hash == hash && entry.key == key {
                break;
            }
            chain_prev = Some(idx);
            cursor = entry.chain_next;
        }
        let idx = cursor?;

        let entry = match std::mem::replace(
            &mut self.slots[idx],
            Slot::Vacant {
                next_free: self.free_head,
            },
        ) {
            Slot::Occupied(entry) => entry,
            vacant @ Slot::Vacant { .. } => {
                self.slots[idx] = vacant;
                return None;
            }
        };
        self.free_head = Some(idx);

        match chain_prev.and_then(|prev| self.entry_mut(prev)) {
            Some(prev) => prev.chain_next = entry.chain_next,
            None => self.buckets[bucket] = entry.chain_next,
        }
        match entry.order_prev.and_then(|prev| self.entry_mut(prev)) {
            Some(prev) => prev.order_next = entry.order_next,
            None => self.order_head = entry.order_next,
        }
        match entry.order_next.and_then(|next| self.entry_mut(next)) {
            Some(next) => next.order_prev = entry.order_prev,
            None => self.order_tail = entry.order_prev,
        }

        self.len -= 1;
        Some(entry.value)
    }

    /// Drop every entry and return to the initial bucket count.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free_head = None;
        self.buckets.truncate(self.initial_buckets);
        self.buckets.iter_mut().for_each(|head| *head = None);
        self.order_head = None;
        self.order_tail = None;
        self.len = 0;
    }

    /// Snapshot of the keys in insertion order.
    pub fn keys(&self) -> Vec<String> {
        self.iter().map(|pair| pair.key.to_string()).collect()
    }

    /// Snapshot of the values in insertion order, index-aligned with [`keys`](Self::keys).
    pub fn values(&self) -> Vec<i32> {
        self.iter().map(|pair| pair.value).collect()
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter {
            map: self,
            cursor: self.order_head,
            remaining: self.len,
        }
    }

    /// A restartable cursor over the map. `None` for an empty map.
    pub fn cursor(&self) -> Option<Iter<'_>> {
        if self.is_empty() {
            None
        } else {
            Some(self.iter())
        }
    }

    /// Equality where either side may be absent. Absent maps are never equal to anything,
    /// including another absent map.
    pub fn equals(a: Option<&OrderedMap>, b: Option<&OrderedMap>) -> bool {
        match (a, b) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    fn entry(&self, idx: usize) -> Option<&Entry> {
        match self.slots.get(idx) {
            Some(Slot::Occupied(entry)) => Some(entry),
            _ => None,
        }
    }

    fn entry_mut(&mut self, idx: usize) -> Option<&mut Entry> {
        match self.slots.get_mut(idx) {
            Some(Slot::Occupied(entry)) => Some(entry),
            _ => None,
        }
    }

    fn bucket_of(&self, hash: u64) -> usize {
        (hash as usize) & (self.buckets.len() - 1)
    }

    fn find(&self, key: &str) -> Option<usize> {
        self.find_hashed(key, self.hasher.hash_one(key))
    }

    fn find_hashed(&self, key: &str, hash: u64) -> Option<usize> {
        let mut cursor = self.buckets[self.bucket_of(hash)];
        while let Some(idx) = cursor {
            let entry = self.entry(idx)?;
            if entry.hash == hash && entry.key == key {
                return Some(idx);
            }
            cursor = entry.chain_next;
        }
        None
    }

    // Every allocation happens before the first link is touched, so a failure here
    // leaves the map exactly as it was.
    fn append_entry(&mut self, key: &str, value: i32, hash: u64) -> Result<(), ContainerError> {
        if !self.limits.allows_elements(self.len + 1) {
            return Err(ContainerError::AllocationFailed);
        }
        let mut owned_key = String::new();
        owned_key.try_reserve_exact(key.len())?;
        owned_key.push_str(key);
        if self.free_head.is_none() {
            self.slots.try_reserve(1)?;
        }

        let bucket = self.bucket_of(hash);
        let entry = Entry {
            key: owned_key,
            value,
            hash,
            chain_next: self.buckets[bucket],
            order_prev: self.order_tail,
            order_next: None,
        };
        let idx = match self.free_head {
            Some(idx) => {
                if let Slot::Vacant { next_free } = self.slots[idx] {
                    self.free_head = next_free;
                }
                self.slots[idx] = Slot::Occupied(entry);
                idx
            }
            None => {
                self.slots.push(Slot::Occupied(entry));
                self.slots.len() - 1
            }
        };

        self.buckets[bucket] = Some(idx);
        match self.order_tail.and_then(|tail| self.entry_mut(tail)) {
            Some(tail) => tail.order_next = Some(idx),
            None => self.order_head = Some(idx),
        }
        self.order_tail = Some(idx);
        self.len += 1;
        Ok(())
    }

    /// Whether doubling the bucket array would exceed `Limits::max_buckets`.
    pub fn at_bucket_ceiling(&self) -> bool {
        self.buckets
            .len()
            .checked_mul(GROWTH_FACTOR)
            .map_or(true, |count| !self.limits.allows_buckets(count))
    }

    fn grow_if_loaded(&mut self) {
        if self.len * LOAD_FACTOR_DEN <= self.buckets.len() * LOAD_FACTOR_NUM {
            return;
        }
        if self.at_bucket_ceiling() {
            // Repeats on every insert once the ceiling is reached.
            debug!(
                "Bucket ceiling reached at {} buckets, {} entries share them",
                self.buckets.len(),
                self.len
            );
            return;
        }
        if let Err(err) = self.grow() {
            // The entry is already linked into the old array; lookups stay correct,
            // only the chains get longer.
            warn!(
                "Skipping resize at {} entries / {} buckets: {}",
                self.len,
                self.buckets.len(),
                err
            );
        }
    }

    fn grow(&mut self) -> Result<(), ContainerError> {
        let new_count = self
            .buckets
            .len()
            .checked_mul(GROWTH_FACTOR)
            .ok_or(ContainerError::AllocationFailed)?;
        let mut buckets: Vec<Option<usize>> = Vec::new();
        buckets.try_reserve_exact(new_count)?;
        buckets.resize(new_count, None);

        let mask = new_count - 1;
        let mut cursor = self.order_head;
        while let Some(idx) = cursor {
            let Some(entry) = self.entry_mut(idx) else {
                break;
            };
            let bucket = (entry.hash as usize) & mask;
            entry.chain_next = buckets[bucket];
            buckets[bucket] = Some(idx);
            cursor = entry.order_next;
        }

        debug!(
            "Resized map from {} to {} buckets ({} entries)",
            self.buckets.len(),
            new_count,
            self.len
        );
        self.buckets = buckets;
        Ok(())
    }
}

impl PartialEq for OrderedMap {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len
            && self
                .iter()
                .all(|pair| other.get(pair.key) == Some(pair.value))
    }
}

impl Eq for OrderedMap {}

impl std::fmt::Debug for OrderedMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|pair| (pair.key, pair.value)))
            .finish()
    }
}

impl<'a> IntoIterator for &'a OrderedMap {
    type Item = KeyValuePair<'a>;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyValuePair<'a> {
    pub key: &'a str,
    pub value: i32,
}

/// Cursor over the order list. The borrow on the map keeps it from being mutated
/// while the cursor is alive.
#[derive(Clone)]
pub struct Iter<'a> {
    map: &'a OrderedMap,
    cursor: Option<usize>,
    remaining: usize,
}

impl Iter<'_> {
    /// Rewind to the first entry. Valid at any point, including after exhaustion.
    pub fn reset(&mut self) {
        self.cursor = self.map.order_head;
        self.remaining = self.map.len;
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = KeyValuePair<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.map.entry(self.cursor?)?;
        self.cursor = entry.order_next;
        self.remaining = self.remaining.saturating_sub(1);
        Some(KeyValuePair {
            key: &entry.key,
            value: entry.value,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

#[cfg(test)]
#[path = "ordered_map_tests.rs"]
mod ordered_map_tests;
