use crate::config::Limits;
use crate::errors::ContainerError;
use crate::list::IntList;
use crate::queue::IntQueue;
use crate::registry::{Handle, IntContainer, Registry};

/// LIFO stack of `i32`.
#[derive(Debug, Default, Clone)]
pub struct IntStack {
    values: Vec<i32>,
    limits: Limits,
}

impl IntStack {
    pub fn new() -> Self {
        IntStack::default()
    }

    pub fn with_limits(limits: Limits) -> Self {
        IntStack {
            values: Vec::new(),
            limits,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn push(&mut self, value: i32) -> bool {
        self.try_push(value).is_ok()
    }

    pub fn pop(&mut self) -> Option<i32> {
        self.values.pop()
    }

    pub fn peek(&self) -> Option<i32> {
        self.values.last().copied()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Values from top to bottom.
    pub fn iter(&self) -> impl Iterator<Item = i32> + '_ {
        self.values.iter().rev().copied()
    }
}

// Limits are configuration, not contents.
impl PartialEq for IntStack {
    fn eq(&self, other: &Self) -> bool {
        self.values == other.values
    }
}

impl Eq for IntStack {}

impl IntContainer for IntStack {
    fn try_push(&mut self, value: i32) -> Result<(), ContainerError> {
        if !self.limits.allows_elements(self.values.len() + 1) {
            return Err(ContainerError::AllocationFailed);
        }
        self.values.try_reserve(1)?;
        self.values.push(value);
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
    /// New list holding the stack's values, top first.
    pub fn stack_to_list(
        &mut self,
        stack: Handle<IntStack>,
    ) -> Result<Handle<IntList>, ContainerError> {
        self.convert(stack)
    }

    /// New queue whose front is the stack's top.
    pub fn stack_to_queue(
        &mut self,
        stack: Handle<IntStack>,
    ) -> Result<Handle<IntQueue>, ContainerError> {
        self.convert(stack)
    }
}

#[cfg(test)]
#[path = "stack_tests.rs"]
mod stack_tests;
