#[cfg(test)]
mod tests {
    use crate::{IntList, Limits};

    #[test]
    fn test_push_appends_at_tail() {
        let mut list = IntList::new();
        assert!(list.is_empty());
        for value in [1, 2, 3] {
            assert!(list.push(value));
        }
        assert_eq!(list.len(), 3);
        assert_eq!(list.iter().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(list.get(2), Some(3));
        assert_eq!(list.get(3), None);
        assert!(list.contains(2));
        assert!(!list.contains(4));
    }

    #[test]
    fn test_push_front_and_pop_front() {
        let mut list = IntList::new();
        assert!(list.push_front(2));
        assert!(list.push_front(1));
        assert!(list.push(3));
        assert_eq!(list.iter().collect::<Vec<_>>(), vec![1, 2, 3]);

        assert_eq!(list.pop_front(), Some(1));
        assert_eq!(list.pop_front(), Some(2));
        assert_eq!(list.pop_front(), Some(3));
        assert_eq!(list.pop_front(), None);
        assert!(list.is_empty());

        // Tail was reset along with the head
        assert!(list.push(4));
        assert!(list.push(5));
        assert_eq!(list.iter().collect::<Vec<_>>(), vec![4, 5]);
    }

    #[test]
    fn test_freed_nodes_are_reused() {
        let mut list = IntList::new();
        for value in 0..4 {
            assert!(list.push(value));
        }
        list.pop_front();
        list.pop_front();
        assert!(list.push(10));
        assert!(list.push(11));
        assert_eq!(list.nodes.len(), 4);
        assert_eq!(list.iter().collect::<Vec<_>>(), vec![2, 3, 10, 11]);
    }

    #[test]
    fn test_limit_and_clear() {
        let mut list = IntList::with_limits(Limits::unbounded().with_max_elements(2));
        assert!(list.push(1));
        assert!(list.push_front(0));
        assert!(!list.push(2));
        assert!(!list.push_front(-1));
        assert_eq!(list.iter().collect::<Vec<_>>(), vec![0, 1]);

        list.clear();
        assert!(list.is_empty());
        assert_eq!(list.iter().next(), None);
        assert!(list.push(5));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_equality_ignores_slab_layout() {
        let mut a = IntList::new();
        let mut b = IntList::new();
        assert!(a.push(9));
        a.pop_front();
        for value in [1, 2] {
            assert!(a.push(value));
            assert!(b.push(value));
        }
        assert_eq!(a, b);
        assert!(b.push(3));
        assert_ne!(a, b);
    }
}
