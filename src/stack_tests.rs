#[cfg(test)]
mod tests {
    use crate::registry::IntContainer;
    use crate::{ContainerError, IntStack, Limits};

    #[test]
    fn test_push_pop_peek() {
        let mut stack = IntStack::new();
        assert_eq!(stack.pop(), None);
        assert_eq!(stack.peek(), None);
        assert!(stack.push(1) && stack.push(2));
        assert_eq!(stack.peek(), Some(2));
        assert_eq!(stack.len(), 2);
        assert_eq!(stack.iter().collect::<Vec<_>>(), vec![2, 1]);

        assert_eq!(stack.pop(), Some(2));
        assert_eq!(stack.pop(), Some(1));
        assert_eq!(stack.pop(), None);
        assert!(stack.is_empty());
    }

    #[test]
    fn test_limit_and_clear() {
        let mut stack = IntStack::with_limits(Limits::unbounded().with_max_elements(2));
        assert!(stack.push(1) && stack.push(2));
        assert!(!stack.push(3));
        assert_eq!(stack.try_push(3), Err(ContainerError::AllocationFailed));
        assert_eq!(stack.peek(), Some(2));

        stack.clear();
        assert!(stack.is_empty());
        assert!(stack.push(4));
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn test_snapshot_is_top_first() {
        let mut stack = IntStack::new();
        for value in [1, 2, 3] {
            assert!(stack.push(value));
        }
        assert_eq!(stack.snapshot(), Ok(vec![3, 2, 1]));
        assert_eq!(stack.len(), 3);
    }

    #[test]
    fn test_equality_ignores_limits() {
        let mut bounded = IntStack::with_limits(Limits::unbounded().with_max_elements(4));
        let mut unbounded = IntStack::new();
        assert!(bounded.push(7) && unbounded.push(7));
        assert_eq!(bounded, unbounded);
        assert!(unbounded.push(8));
        assert_ne!(bounded, unbounded);
    }
}
