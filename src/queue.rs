use crate::config::Limits;
use crate::errors::ContainerError;
use crate::list::IntList;
use crate::registry::{Handle, IntContainer, Registry};
use crate::stack::IntStack;
use std::collections::VecDeque;

/// FIFO queue of `i32`.
#[derive(Debug, Default, Clone)]
pub struct IntQueue {
    values: VecDeque<i32>,
    limits: Limits,
}

impl IntQueue {
    pub fn new() -> Self {
        IntQueue::default()
    }

    pub fn with_limits(limits: Limits) -> Self {
        IntQueue {
            values: VecDeque::new(),
            limits,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn enqueue(&mut self, value: i32) -> bool {
        self.try_push(value).is_ok()
    }

    pub fn dequeue(&mut self) -> Option<i32> {
        self.values.pop_front()
    }

    pub fn peek(&self) -> Option<i32> {
        self.values.front().copied()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Values from front to back.
    pub fn iter(&self) -> impl Iterator<Item = i32> + '_ {
        self.values.iter().copied()
    }
}

// Limits are configuration, not contents.
impl PartialEq for IntQueue {
    fn eq(&self, other: &Self) -> bool {
        self.values == other.values
    }
}

impl Eq for IntQueue {}

impl IntContainer for IntQueue {
    fn try_push(&mut self, value: i32) -> Result<(), ContainerError> {
        if !self.limits.allows_elements(self.values.len() + 1) {
            return Err(ContainerError::AllocationFailed);
        }
        self.values.try_reserve(1)?;
        self.values.push_back(value);
        Ok(())
    }

    fn snapshot(&self) -> Result<Vec<i32>, ContainerError> {
        let mut values = Vec::new();
        values.try_reserve_exact(self.values.len())?;
        values.extend(self.iter());
        Ok(values)
    }
}

impl Registry {
    /// New stack with the queue's back on top.
    pub fn queue_to_stack(
        &mut self,
        queue: Handle<IntQueue>,
    ) -> Result<Handle<IntStack>, ContainerError> {
        self.convert(queue)
    }

    pub fn queue_to_list(
        &mut self,
        queue: Handle<IntQueue>,
    ) -> Result<Handle<IntList>, ContainerError> {
        self.convert(queue)
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod queue_tests;
