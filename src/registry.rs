//! The ownership ledger shared by every container type.
//!
//! Containers are created through a [`Registry`] and addressed by typed, generational
//! [`Handle`]s. The ledger records, in creation order, which handles are live and which
//! teardown routine ([`ContainerKind`]) each one needs. Multi-step operations register
//! the object they are building first and call [`Registry::rollback`] if a later step
//! fails, which tears down exactly the most recent registration.
//!
//! A registry is single-threaded and not reentrant. [`with_default_registry`] provides
//! one lazily created registry per thread.

use crate::config::{Limits, RegistryConfig};
use crate::errors::ContainerError;
use crate::list::IntList;
use crate::ordered_map::OrderedMap;
use crate::queue::IntQueue;
use crate::stack::IntStack;
use log::{debug, info, warn};
use std::cell::RefCell;
use std::fmt;
use std::marker::PhantomData;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    Stack,
    Queue,
    List,
    Map,
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ContainerKind::Stack => "stack",
            ContainerKind::Queue => "queue",
            ContainerKind::List => "list",
            ContainerKind::Map => "map",
        };
        f.write_str(name)
    }
}

/// A live object owned through the registry.
#[derive(Debug)]
pub enum Container {
    Stack(IntStack),
    Queue(IntQueue),
    List(IntList),
    Map(OrderedMap),
}

impl Container {
    pub fn kind(&self) -> ContainerKind {
        match self {
            Container::Stack(_) => ContainerKind::Stack,
            Container::Queue(_) => ContainerKind::Queue,
            Container::List(_) => ContainerKind::List,
            Container::Map(_) => ContainerKind::Map,
        }
    }

    fn destroy(self) {
        match self {
            Container::Stack(mut stack) => stack.clear(),
            Container::Queue(mut queue) => queue.clear(),
            Container::List(mut list) => list.clear(),
            Container::Map(mut map) => map.clear(),
        }
    }
}

/// A container type that can live in a [`Registry`].
pub trait Tracked: Sized {
    const KIND: ContainerKind;

    /// Build an empty instance bounded by `limits`.
    fn allocate(limits: Limits) -> Result<Self, ContainerError>;

    fn into_container(self) -> Container;

    fn from_container(container: &Container) -> Option<&Self>;

    fn from_container_mut(container: &mut Container) -> Option<&mut Self>;
}

macro_rules! impl_tracked {
    ($ty:ty, $variant:ident, $limits:ident => $allocate:expr) => {
        impl Tracked for $ty {
            const KIND: ContainerKind = ContainerKind::$variant;

            fn allocate($limits: Limits) -> Result<Self, ContainerError> {
                $allocate
            }

            fn into_container(self) -> Container {
                Container::$variant(self)
            }

            fn from_container(container: &Container) -> Option<&Self> {
                match container {
                    Container::$variant(inner) => Some(inner),
                    _ => None,
                }
            }

            fn from_container_mut(container: &mut Container) -> Option<&mut Self> {
                match container {
                    Container::$variant(inner) => Some(inner),
                    _ => None,
                }
            }
        }
    };
}

impl_tracked!(IntStack, Stack, limits => Ok(IntStack::with_limits(limits)));
impl_tracked!(IntQueue, Queue, limits => Ok(IntQueue::with_limits(limits)));
impl_tracked!(IntList, List, limits => Ok(IntList::with_limits(limits)));
impl_tracked!(OrderedMap, Map, limits => OrderedMap::with_limits(limits));

/// Integer containers that can be converted into one another.
pub trait IntContainer {
    /// Insert one value at the container's natural insertion point.
    fn try_push(&mut self, value: i32) -> Result<(), ContainerError>;

    /// All values in traversal order.
    fn snapshot(&self) -> Result<Vec<i32>, ContainerError>;
}

/// Untyped identity of a registry slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RawHandle {
    index: u32,
    generation: u32,
}

impl RawHandle {
    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

/// Typed handle to an object in a [`Registry`]. Stale once the object is destroyed or
/// rolled back; a stale handle never resolves again, even after its slot is reused.
pub struct Handle<T> {
    raw: RawHandle,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    fn new(raw: RawHandle) -> Self {
        Handle {
            raw,
            _marker: PhantomData,
        }
    }

    pub fn raw(&self) -> RawHandle {
        self.raw
    }
}

// Manual impls keep `T` unbounded.

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<T> Eq for Handle<T> {}

impl<T> std::hash::Hash for Handle<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("index", &self.raw.index)
            .field("generation", &self.raw.generation)
            .finish()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LedgerEntry {
    pub handle: RawHandle,
    pub kind: ContainerKind,
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    container: Option<Container>,
}

#[derive(Debug, Default)]
pub struct Registry {
    config: RegistryConfig,
    slots: Vec<Slot>,
    free_slots: Vec<u32>,
    ledger: Vec<LedgerEntry>,
}

impl Registry {
    pub fn new() -> Self {
        Registry::default()
    }

    pub fn with_config(config: RegistryConfig) -> Self {
        Registry {
            config,
            ..Registry::default()
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Number of live, tracked objects.
    pub fn len(&self) -> usize {
        self.ledger.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ledger.is_empty()
    }

    /// Ledger entries, oldest first.
    pub fn entries(&self) -> &[LedgerEntry] {
        &self.ledger
    }

    /// Allocate an empty `T` with the configured limits and register it.
    pub fn create<T: Tracked>(&mut self) -> Result<Handle<T>, ContainerError> {
        let value = T::allocate(self.config.limits)?;
        self.register(value)
    }

    /// Take `value` under the ledger's tracking. On failure nothing is recorded and
    /// `value` is dropped here.
    pub fn register<T: Tracked>(&mut self, value: T) -> Result<Handle<T>, ContainerError> {
        if let Some(max_tracked) = self.config.max_tracked {
            if self.ledger.len() >= max_tracked {
                warn!(
                    "Refusing to register {}: {} objects already tracked",
                    T::KIND,
                    max_tracked
                );
                return Err(ContainerError::CapacityExhausted);
            }
        }
        self.ledger.try_reserve(1)?;

        let index = match self.free_slots.pop() {
            Some(index) => index,
            None => {
                let index = u32::try_from(self.slots.len())
                    .map_err(|_| ContainerError::CapacityExhausted)?;
                self.slots.try_reserve(1)?;
                // Reserve the matching free-list capacity now so destroy never allocates.
                self.free_slots.try_reserve(self.slots.len() + 1)?;
                self.slots.push(Slot {
                    generation: 0,
                    container: None,
                });
                index
            }
        };

        let slot = &mut self.slots[index as usize];
        slot.container = Some(value.into_container());
        let handle = RawHandle {
            index,
            generation: slot.generation,
        };
        self.ledger.push(LedgerEntry {
            handle,
            kind: T::KIND,
        });
        debug!("Registered {} at slot {}", T::KIND, index);
        Ok(Handle::new(handle))
    }

    /// Undo the most recent registration, tearing its object down. No-op on an empty ledger.
    pub fn rollback(&mut self) {
        let Some(entry) = self.ledger.pop() else {
            return;
        };
        if let Some(container) = self.release(entry.handle) {
            info!(
                "Rolled back {} at slot {}",
                container.kind(),
                entry.handle.index
            );
            container.destroy();
        }
    }

    /// Destroy the object behind `handle`. Returns `false` if the handle is stale,
    /// so an object is never torn down twice.
    pub fn destroy<T: Tracked>(&mut self, handle: Handle<T>) -> bool {
        if self.get(handle).is_none() {
            return false;
        }
        let raw = handle.raw;
        if let Some(pos) = self.ledger.iter().rposition(|entry| entry.handle == raw) {
            self.ledger.remove(pos);
        }
        match self.release(raw) {
            Some(container) => {
                debug!("Destroyed {} at slot {}", container.kind(), raw.index);
                container.destroy();
                true
            }
            None => false,
        }
    }

    pub fn is_live<T: Tracked>(&self, handle: Handle<T>) -> bool {
        self.get(handle).is_some()
    }

    pub fn get<T: Tracked>(&self, handle: Handle<T>) -> Option<&T> {
        let slot = self.slots.get(handle.raw.index as usize)?;
        if slot.generation != handle.raw.generation {
            return None;
        }
        slot.container.as_ref().and_then(T::from_container)
    }

    pub fn get_mut<T: Tracked>(&mut self, handle: Handle<T>) -> Option<&mut T> {
        let slot = self.slots.get_mut(handle.raw.index as usize)?;
        if slot.generation != handle.raw.generation {
            return None;
        }
        slot.container.as_mut().and_then(T::from_container_mut)
    }

    /// Build a new `D` holding every value of `source` in the source's traversal order.
    ///
    /// The destination is registered before it is filled; if any insertion fails the
    /// destination is rolled back and `source` is left untouched.
    pub fn convert<S, D>(&mut self, source: Handle<S>) -> Result<Handle<D>, ContainerError>
    where
        S: Tracked + IntContainer,
        D: Tracked + IntContainer,
    {
        let values = self
            .get(source)
            .ok_or(ContainerError::InvalidHandle)?
            .snapshot()?;
        let target = self.create::<D>()?;

        for value in values {
            let pushed = match self.get_mut(target) {
                Some(container) => container.try_push(value),
                None => Err(ContainerError::InvalidHandle),
            };
            if let Err(err) = pushed {
                warn!("Converting {} into {} failed: {}", S::KIND, D::KIND, err);
                self.rollback();
                return Err(err);
            }
        }
        Ok(target)
    }

    // Detach the container from its slot and retire the generation.
    fn release(&mut self, handle: RawHandle) -> Option<Container> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        let container = slot.container.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free_slots.push(handle.index);
        Some(container)
    }
}

thread_local! {
    static DEFAULT_REGISTRY: RefCell<Registry> = RefCell::new(Registry::new());
}

/// Run `f` against this thread's default registry.
///
/// Calling this again from inside `f` returns [`ContainerError::RegistryBusy`].
pub fn with_default_registry<R>(f: impl FnOnce(&mut Registry) -> R) -> Result<R, ContainerError> {
    DEFAULT_REGISTRY.with(|registry| {
        let mut registry = registry
            .try_borrow_mut()
            .map_err(|_| ContainerError::RegistryBusy)?;
        Ok(f(&mut registry))
    })
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod registry_tests;
