//! Integer containers tracked by an ownership ledger.
//!
//! The crate provides a stack, a queue and a singly linked list of `i32`, plus an
//! [`OrderedMap`]: a string-keyed, `i32`-valued hash table that iterates in insertion order,
//! resizes itself past a 0.75 load factor and compares order-independently.
//!
//! Every container is created through a [`Registry`], which records each live object and
//! the teardown it needs. Operations that build a new container out of an existing one
//! register the new container first and, when a later step fails, ask the registry to
//! [`rollback`](Registry::rollback) that single registration, so a half-built object is
//! never leaked and never handed to the caller.
//!
//! Allocation failure is modelled with fallible reservations plus the optional [`Limits`]
//! of a [`RegistryConfig`], which makes exhaustion reproducible in tests.
//!
//! Example usage:
//!
//! ```rust
//! use ledger_containers::{ContainerError, IntStack, Limits, OrderedMap, Registry, RegistryConfig};
//!
//! let mut registry = Registry::new();
//!
//! // Create a map and fill it
//! let map = registry.create::<OrderedMap>().unwrap();
//! let m = registry.get_mut(map).unwrap();
//! assert!(m.insert("one", 1));
//! assert!(m.insert("two", 2));
//! assert!(!m.insert("one", 10)); // duplicate keys are refused
//! assert!(m.set("one", 10)); // ...but can be overwritten
//! assert_eq!(m.keys(), vec!["one", "two"]);
//!
//! // Iterate with a restartable cursor
//! let mut cursor = m.cursor().unwrap();
//! assert_eq!(cursor.next().map(|pair| pair.value), Some(10));
//! cursor.reset();
//! assert_eq!(cursor.count(), 2);
//!
//! // A conversion that runs out of room is rolled back
//! let mut registry = Registry::with_config(
//!     RegistryConfig::new().with_limits(Limits::unbounded().with_max_elements(2)),
//! );
//! let mut source = IntStack::new();
//! for value in 0..3 {
//!     assert!(source.push(value));
//! }
//! let stack = registry.register(source).unwrap();
//! assert_eq!(registry.stack_to_list(stack), Err(ContainerError::AllocationFailed));
//! assert_eq!(registry.len(), 1); // only the stack is still tracked
//! assert_eq!(registry.get(stack).unwrap().len(), 3);
//!
//! assert!(registry.destroy(stack));
//! assert!(registry.is_empty());
//! ```

// Core modules
mod config;
mod errors;
pub mod list;
pub mod ordered_map;
pub mod queue;
pub mod registry;
pub mod stack;

// Re-exports
pub use config::{Limits, RegistryConfig};
pub use errors::ContainerError;
pub use list::IntList;
pub use ordered_map::{Iter, KeyValuePair, OrderedMap};
pub use queue::IntQueue;
pub use registry::{
    with_default_registry, Container, ContainerKind, Handle, IntContainer, LedgerEntry,
    RawHandle, Registry, Tracked,
};
pub use stack::IntStack;

// Type aliases
use std::hash::BuildHasherDefault;
pub(crate) type AHashBuilder = BuildHasherDefault<ahash::AHasher>;
