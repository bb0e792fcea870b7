use crate::config::Limits;
use crate::errors::ContainerError;
use crate::queue::IntQueue;
use crate::registry::{Handle, IntContainer, Registry};
use crate::stack::IntStack;

#[derive(Debug, Clone)]
enum Node {
    Linked { value: i32, next: Option<usize> },
    Free { next_free: Option<usize> },
}

/// Singly linked list of `i32` with O(1) append.
///
/// Nodes are kept in a slab; links are slab indices and freed nodes are recycled.
#[derive(Debug, Default, Clone)]
pub struct IntList {
    nodes: Vec<Node>,
    head: Option<usize>,
    tail: Option<usize>,
    free_head: Option<usize>,
    len: usize,
    limits: Limits,
}

impl IntList {
    pub fn new() -> Self {
        IntList::default()
    }

    pub fn with_limits(limits: Limits) -> Self {
        IntList {
            limits,
            ..IntList::default()
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Append at the tail.
    pub fn push(&mut self, value: i32) -> bool {
        self.try_push(value).is_ok()
    }

    pub fn push_front(&mut self, value: i32) -> bool {
        match self.alloc_node(value, self.head) {
            Ok(idx) => {
                if self.tail.is_none() {
                    self.tail = Some(idx);
                }
                self.head = Some(idx);
                true
            }
            Err(_) => false,
        }
    }

    pub fn pop_front(&mut self) -> Option<i32> {
        let idx = self.head?;
        let freed = Node::Free {
            next_free: self.free_head,
        };
        let (value, next) = match std::mem::replace(&mut self.nodes[idx], freed) {
            Node::Linked { value, next } => (value, next),
            free @ Node::Free { .. } => {
                self.nodes[idx] = free;
                return None;
            }
        };
        self.free_head = Some(idx);
        self.head = next;
        if next.is_none() {
            self.tail = None;
        }
        self.len -= 1;
        Some(value)
    }

    pub fn get(&self, index: usize) -> Option<i32> {
        self.iter().nth(index)
    }

    pub fn contains(&self, value: i32) -> bool {
        self.iter().any(|v| v == value)
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.head = None;
        self.tail = None;
        self.free_head = None;
        self.len = 0;
    }

    /// Values from head to tail.
    pub fn iter(&self) -> ListIter<'_> {
        ListIter {
            list: self,
            cursor: self.head,
        }
    }

    fn alloc_node(&mut self, value: i32, next: Option<usize>) -> Result<usize, ContainerError> {
        if !self.limits.allows_elements(self.len + 1) {
            return Err(ContainerError::AllocationFailed);
        }
        let node = Node::Linked { value, next };
        let idx = match self.free_head {
            Some(idx) => {
                if let Node::Free { next_free } = self.nodes[idx] {
                    self.free_head = next_free;
                }
                self.nodes[idx] = node;
                idx
            }
            None => {
                self.nodes.try_reserve(1)?;
                self.nodes.push(node);
                self.nodes.len() - 1
            }
        };
        self.len += 1;
        Ok(idx)
    }
}

impl PartialEq for IntList {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl Eq for IntList {}

impl IntContainer for IntList {
    fn try_push(&mut self, value: i32) -> Result<(), ContainerError> {
        let idx = self.alloc_node(value, None)?;
        match self.tail.map(|tail| &mut self.nodes[tail]) {
            Some(Node::Linked { next, .. }) => *next = Some(idx),
            _ => self.head = Some(idx),
        }
        self.tail = Some(idx);
        Ok(())
    }

    fn snapshot(&self) -> Result<Vec<i32>, ContainerError> {
        let mut values = Vec::new();
        values.try_reserve_exact(self.len)?;
        values.extend(self.iter());
        Ok(values)
    }
}

pub struct ListIter<'a> {
    list: &'a IntList,
    cursor: Option<usize>,
}

impl Iterator for ListIter<'_> {
    type Item = i32;

    fn next(&mut self) -> Option<i32> {
        match self.list.nodes.get(self.cursor?) {
            Some(Node::Linked { value, next }) => {
                self.cursor = *next;
                Some(*value)
            }
            _ => None,
        }
    }
}

impl Registry {
    /// New stack with the list's tail on top.
    pub fn list_to_stack(
        &mut self,
        list: Handle<IntList>,
    ) -> Result<Handle<IntStack>, ContainerError> {
        self.convert(list)
    }

    pub fn list_to_queue(
        &mut self,
        list: Handle<IntList>,
    ) -> Result<Handle<IntQueue>, ContainerError> {
        self.convert(list)
    }
}

#[cfg(test)]
#[path = "list_tests.rs"]
mod list_tests;
