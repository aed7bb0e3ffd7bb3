//! Round-robin load balancing strategy.

use std::sync::atomic::{AtomicUsize, Ordering};
use crate::load_balancer::LoadBalancer;

/// Round-robin selector.
/// Stores an internal counter to rotate through backends.
#[derive(Debug, Default)]
pub struct RoundRobin {
    counter: AtomicUsize,
}

impl RoundRobin {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LoadBalancer for RoundRobin {
    fn next_index(&self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }

        // fetch_add wraps on overflow, so the rotation continues past usize::MAX.
        let count = self.counter.fetch_add(1, Ordering::Relaxed);
        Some(count % len)
    }

    fn dispatched(&self) -> usize {
        self.counter.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[test]
    fn test_round_robin() {
        let lb = RoundRobin::new();
        let picks: Vec<_> = (0..5).map(|_| lb.next_index(2).unwrap()).collect();
        assert_eq!(picks, [0, 1, 0, 1, 0]);
        assert_eq!(lb.dispatched(), 5);
    }

    #[test]
    fn single_backend_always_selected() {
        let lb = RoundRobin::new();
        for _ in 0..10 {
            assert_eq!(lb.next_index(1), Some(0));
        }
    }

    #[test]
    fn empty_list_selects_nothing() {
        let lb = RoundRobin::new();
        assert_eq!(lb.next_index(0), None);
        assert_eq!(lb.dispatched(), 0);
    }

    #[test]
    fn every_window_visits_each_index_once() {
        let lb = RoundRobin::new();
        let n = 3;
        for _ in 0..4 {
            let window: Vec<_> = (0..n).map(|_| lb.next_index(n).unwrap()).collect();
            assert_eq!(window, [0, 1, 2]);
        }
    }

    #[test]
    fn wraps_at_counter_overflow() {
        let lb = RoundRobin { counter: AtomicUsize::new(usize::MAX) };
        assert_eq!(lb.next_index(2), Some(usize::MAX % 2));
        assert_eq!(lb.next_index(2), Some(0));
    }

    #[test]
    fn concurrent_selections_get_distinct_counts() {
        let lb = Arc::new(RoundRobin::new());
        let threads = 8;
        let per_thread = 1000;
        let handles: Vec<_> = (0..threads)
            .map(|_| {
                let lb = lb.clone();
                std::thread::spawn(move || {
                    (0..per_thread).map(|_| lb.next_index(usize::MAX).unwrap()).collect::<Vec<_>>()
                })
            })
            .collect();

        let mut seen = HashSet::new();
        for h in handles {
            for idx in h.join().unwrap() {
                assert!(seen.insert(idx), "index {} handed out twice", idx);
            }
        }
        assert_eq!(seen.len(), threads * per_thread);
    }
}
