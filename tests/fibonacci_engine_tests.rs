//! End-to-end behavior of the Fibonacci heap through its inherent API

use fib_heap_engine::fibonacci::{Entry, FibHandle, FibonacciHeap};
use fib_heap_engine::{HeapError, MergeableHeap};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

#[test]
fn test_insert_extract_decrease_delete_walkthrough() {
    let mut heap = FibonacciHeap::new();
    let seven = heap.insert(7, 'a');
    heap.insert(3, 'b');
    let seventeen = heap.insert(17, 'c');
    assert_eq!(heap.minimum(), Some((&3, &'b')));

    assert_eq!(heap.extract_min(), Some(Entry { key: 3, payload: 'b' }));
    assert_eq!(heap.minimum(), Some((&7, &'a')));

    heap.decrease_key(&seventeen, 1).unwrap();
    assert_eq!(heap.minimum(), Some((&1, &'c')));

    assert_eq!(heap.delete(&seventeen).map(Entry::into_pair), Ok((1, 'c')));
    assert_eq!(heap.len(), 1);
    assert_eq!(heap.minimum(), Some((&7, &'a')));

    assert_eq!(heap.extract_min().map(|e| e.key), Some(7));
    assert!(heap.is_empty());
    assert_eq!(heap.minimum(), None);
    assert!(!heap.contains(&seven));
    heap.check_invariants().unwrap();
}

#[test]
fn test_rejected_decrease_leaves_heap_untouched() {
    let mut heap = FibonacciHeap::new();
    let handles: Vec<_> = (0..32).map(|i| heap.insert(i * 10, i)).collect();
    heap.extract_min();
    let before = heap.stats();

    assert_eq!(
        heap.decrease_key(&handles[20], 201),
        Err(HeapError::InvalidArgument)
    );
    assert_eq!(heap.key_of(&handles[20]), Ok(&200));
    assert_eq!(heap.len(), 31);
    assert_eq!(heap.stats(), before);
    assert_eq!(heap.minimum(), Some((&10, &1)));
    heap.check_invariants().unwrap();
}

#[test]
fn test_handles_go_stale_after_removal() {
    let mut heap = FibonacciHeap::new();
    let a = heap.insert(1, "a");
    let b = heap.insert(2, "b");
    let c = heap.insert(3, "c");

    heap.extract_min();
    heap.delete(&b).unwrap();

    for handle in [a, b] {
        assert_eq!(heap.decrease_key(&handle, 0), Err(HeapError::StaleHandle));
        assert_eq!(heap.delete(&handle), Err(HeapError::StaleHandle));
        assert_eq!(heap.key_of(&handle), Err(HeapError::StaleHandle));
    }
    assert_eq!(heap.payload_of(&c), Ok(&"c"));
    assert_eq!(heap.len(), 1);
}

#[test]
fn test_slot_reuse_does_not_revive_handles() {
    let mut heap = FibonacciHeap::new();
    let old = heap.insert(5, "old");
    heap.extract_min();
    let new = heap.insert(5, "new");

    assert_ne!(old, new);
    assert!(!heap.contains(&old));
    assert!(heap.contains(&new));
}

#[test]
fn test_union_keeps_handles_from_both_sides() {
    let mut big = FibonacciHeap::new();
    let big_handles: Vec<_> = (0..10).map(|i| big.insert(i * 2, i)).collect();
    let mut small = FibonacciHeap::new();
    let small_handle = small.insert(-1, 99);

    let mut heap = FibonacciHeap::union(small, big);
    assert_eq!(heap.len(), 11);
    assert_eq!(heap.minimum(), Some((&-1, &99)));
    assert!(big_handles.iter().all(|h| heap.contains(h)));
    assert!(heap.contains(&small_handle));

    heap.decrease_key(&big_handles[9], -2).unwrap();
    heap.decrease_key(&small_handle, -5).unwrap();
    assert_eq!(heap.extract_min().map(|e| e.payload), Some(99));
    assert_eq!(heap.extract_min().map(|e| e.payload), Some(9));
    assert_eq!(heap.delete(&small_handle), Err(HeapError::StaleHandle));
    heap.check_invariants().unwrap();
}

#[test]
fn test_merge_into_smaller_receiver_keeps_its_handles() {
    let mut small = FibonacciHeap::new();
    let mine = small.insert(5, 'm');
    let mut big = FibonacciHeap::new();
    for k in 10..1000 {
        big.insert(k, 'b');
    }

    MergeableHeap::merge(&mut small, big);
    assert!(small.contains(&mine));
    assert_eq!(small.decrease_key(&mine, 1), Ok(()));
    assert_eq!(small.minimum(), Some((&1, &'m')));
    assert_eq!(small.len(), 991);
}

#[test]
fn test_union_of_empty_heaps() {
    let heap: FibonacciHeap<(), i32> = FibonacciHeap::union(FibonacciHeap::new(), FibonacciHeap::new());
    assert!(heap.is_empty());
    assert_eq!(heap.len(), 0);
    heap.check_invariants().unwrap();
}

#[test]
fn test_delete_removes_exactly_one_duplicate() {
    let mut heap = FibonacciHeap::new();
    let handles: Vec<_> = (0..8).map(|i| heap.insert(4, i)).collect();
    heap.insert(0, 100);
    heap.extract_min();

    let removed = heap.delete(&handles[5]).unwrap();
    assert_eq!(removed, Entry { key: 4, payload: 5 });
    assert_eq!(heap.len(), 7);
    heap.check_invariants().unwrap();

    let mut payloads: Vec<_> = std::iter::from_fn(|| heap.extract_min().map(|e| e.payload)).collect();
    payloads.sort();
    assert_eq!(payloads, vec![0, 1, 2, 3, 4, 6, 7]);
}

#[test]
fn test_delete_of_minimum_and_of_root() {
    let mut heap = FibonacciHeap::new();
    let lo = heap.insert(1, ());
    let hi = heap.insert(9, ());
    heap.insert(5, ());

    heap.delete(&lo).unwrap();
    assert_eq!(heap.minimum().map(|(k, _)| *k), Some(5));
    heap.delete(&hi).unwrap();
    assert_eq!(heap.len(), 1);
    heap.check_invariants().unwrap();
}

#[test]
fn test_extract_order_is_sorted() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut keys: Vec<u32> = (0..2000).map(|_| rng.gen_range(0..500)).collect();
    let mut heap: FibonacciHeap<(), u32> = keys.iter().map(|&k| (k, ())).collect();

    let extracted: Vec<_> = std::iter::from_fn(|| heap.extract_min().map(|e| e.key)).collect();
    keys.sort_unstable();
    assert_eq!(extracted, keys);
}

#[derive(Clone, Copy)]
enum Step {
    Insert,
    Decrease,
    Extract,
}

/// Seeded random interleaving of exactly N inserts, N decrease-keys and
/// N extract-mins
fn interleaved_workload(n: usize, seed: u64) -> FibonacciHeap<usize, u64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut heap = FibonacciHeap::new();
    let mut live: Vec<FibHandle> = Vec::new();
    let (mut inserts, mut decreases, mut extracts) = (0, 0, 0);
    let mut steps = 0usize;

    while inserts < n || decreases < n || extracts < n {
        let mut choices = Vec::with_capacity(3);
        if inserts < n {
            choices.push(Step::Insert);
        }
        if decreases < n && !live.is_empty() {
            choices.push(Step::Decrease);
        }
        // Keep one element back while decreases are still owed
        let last_one = live.len() == 1 && inserts == n && decreases < n;
        if extracts < n && !live.is_empty() && !last_one {
            choices.push(Step::Extract);
        }

        match choices[rng.gen_range(0..choices.len())] {
            Step::Insert => {
                live.push(heap.insert(rng.gen_range(1_000_000..2_000_000), inserts));
                inserts += 1;
            }
            Step::Decrease => {
                let handle = live[rng.gen_range(0..live.len())];
                let key = *heap.key_of(&handle).unwrap();
                let new_key = key - rng.gen_range(0..=key.min(1000));
                heap.decrease_key(&handle, new_key).unwrap();
                decreases += 1;
            }
            Step::Extract => {
                let min = heap.min_handle().unwrap();
                let position = live.iter().position(|h| *h == min).unwrap();
                live.swap_remove(position);
                heap.extract_min().unwrap();
                extracts += 1;
            }
        }

        steps += 1;
        if steps % 64 == 0 {
            heap.check_invariants().unwrap();
        }
    }

    assert_eq!((inserts, decreases, extracts), (n, n, n));
    assert!(heap.is_empty());
    heap
}

#[test]
fn test_consolidation_work_stays_within_amortized_bound() {
    let n = 4096usize;
    let stats = interleaved_workload(n, 42).stats();

    let n = n as u64;
    let log_n = u64::from(n.ilog2());
    // The final extraction empties the heap and skips consolidation
    assert!(stats.consolidations < n);
    assert!(
        stats.roots_scanned <= 4 * n * log_n,
        "consolidation walked {} roots, above 4·n·log₂n for n = {}",
        stats.roots_scanned,
        n
    );
    assert!(stats.links <= 2 * n * log_n);
    // Each cascading cut consumes a mark, and each decrease sets at most one
    assert!(stats.cascading_cuts <= n);
    assert!(stats.cuts <= 2 * n);
}

#[test]
fn test_links_stay_within_amortized_bound_after_bulk_phase() {
    let n: u64 = 1 << 14;
    let mut rng = StdRng::seed_from_u64(42);
    let mut heap = FibonacciHeap::with_capacity(n as usize);

    let mut handles: Vec<_> = (0..n).map(|i| heap.insert(i * 8 + 4, i)).collect();
    heap.insert(0, u64::MAX);
    heap.extract_min();

    handles.shuffle(&mut rng);
    for handle in &handles {
        let key = *heap.key_of(handle).unwrap();
        heap.decrease_key(handle, key - rng.gen_range(1..=4)).unwrap();
    }
    while heap.extract_min().is_some() {}

    let stats = heap.stats();
    let log_n = u64::from(n.ilog2());
    assert!(stats.links <= 2 * n * log_n);
    assert!(stats.roots_scanned <= 4 * n * log_n);
}

#[test]
fn test_reset_stats() {
    let mut heap: FibonacciHeap<(), i32> = (0..10).map(|k| (k, ())).collect();
    heap.extract_min();
    assert!(heap.stats().links > 0);
    heap.reset_stats();
    assert_eq!(heap.stats().links, 0);
    assert_eq!(heap.stats().consolidations, 0);
}

#[test]
fn test_min_handle_tracks_minimum() {
    let mut heap = FibonacciHeap::new();
    assert_eq!(heap.min_handle(), None);
    heap.insert(3, "x");
    let y = heap.insert(2, "y");
    assert_eq!(heap.min_handle(), Some(y));

    let min = heap.min_handle().unwrap();
    assert_eq!(heap.delete(&min).map(|e| e.payload), Ok("y"));
    assert_eq!(heap.minimum(), Some((&3, &"x")));
}
