//! Append-only arena shared between one writer at a time and any number of
//! lock-free readers.
//!
//! Storage is split into segments whose sizes double (`32`, `64`, `128`, ...).
//! A segment is allocated once, on first use, and never moves afterwards, so
//! a reference handed to a reader stays valid while later appends proceed.
//! Each slot is written exactly once, before the length covering it is
//! published with release ordering. Readers load the published length with
//! acquire ordering and only touch slots below it.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, OnceLock, PoisonError};

const FIRST_SEGMENT_BITS: u32 = 5;
const FIRST_SEGMENT_LEN: usize = 1 << FIRST_SEGMENT_BITS;
const SEGMENT_COUNT: usize = (usize::BITS - FIRST_SEGMENT_BITS) as usize;

type Segment<T> = Box<[OnceLock<T>]>;

pub(crate) struct AppendArena<T> {
    segments: [OnceLock<Segment<T>>; SEGMENT_COUNT],
    published: AtomicUsize,
    writer: Mutex<()>,
}

impl<T> AppendArena<T> {
    pub(crate) fn new() -> Self {
        Self {
            segments: std::array::from_fn(|_| OnceLock::new()),
            published: AtomicUsize::new(0),
            writer: Mutex::new(()),
        }
    }

    /// Append `value` and publish it. Returns its position.
    ///
    /// Writers serialize on an exclusive lock; readers are never blocked.
    pub(crate) fn push(&self, value: T) -> usize {
        // The guarded section cannot leave the arena half-updated, so a
        // poisoned lock is still safe to reuse.
        let _guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);

        let position = self.published.load(Ordering::Relaxed);
        let (segment, offset) = locate(position);
        let slots = self.segments[segment].get_or_init(|| allocate(FIRST_SEGMENT_LEN << segment));

        if slots[offset].set(value).is_err() {
            panic!("arena slot {position} was written twice");
        }

        self.published.store(position + 1, Ordering::Release);
        position
    }

    /// Number of published values.
    pub(crate) fn len(&self) -> usize {
        self.published.load(Ordering::Acquire)
    }

    /// Value at `position`, if it has been published.
    pub(crate) fn get(&self, position: usize) -> Option<&T> {
        let (segment, offset) = locate(position);
        self.segments.get(segment)?.get()?.get(offset)?.get()
    }
}

impl<T> Default for AppendArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Map a position to `(segment, offset)`.
fn locate(position: usize) -> (usize, usize) {
    let biased = position + FIRST_SEGMENT_LEN;
    let segment = (usize::BITS - 1 - biased.leading_zeros() - FIRST_SEGMENT_BITS) as usize;
    let offset = biased - (FIRST_SEGMENT_LEN << segment);
    (segment, offset)
}

fn allocate<T>(len: usize) -> Segment<T> {
    (0..len).map(|_| OnceLock::new()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_locate_segment_boundaries() {
        assert_eq!(locate(0), (0, 0));
        assert_eq!(locate(31), (0, 31));
        assert_eq!(locate(32), (1, 0));
        assert_eq!(locate(95), (1, 63));
        assert_eq!(locate(96), (2, 0));
        assert_eq!(locate(223), (2, 127));
        assert_eq!(locate(224), (3, 0));
    }

    #[test]
    fn test_locate_covers_positions_once() {
        let mut expected = (0, 0);
        for position in 0..10_000 {
            let got = locate(position);
            assert_eq!(got, expected, "position {position}");
            let segment_len = FIRST_SEGMENT_LEN << expected.0;
            expected = if expected.1 + 1 == segment_len {
                (expected.0 + 1, 0)
            } else {
                (expected.0, expected.1 + 1)
            };
        }
    }

    #[test]
    fn test_push_and_get() {
        let arena = AppendArena::new();
        assert_eq!(arena.len(), 0);
        assert!(arena.get(0).is_none());

        for i in 0..500u64 {
            assert_eq!(arena.push(i * 10), i as usize);
        }

        assert_eq!(arena.len(), 500);
        for i in 0..500usize {
            assert_eq!(arena.get(i), Some(&(i as u64 * 10)));
        }
        assert!(arena.get(500).is_none());
    }

    #[test]
    fn test_references_survive_growth() {
        let arena = AppendArena::new();
        arena.push(String::from("first"));
        let first = arena.get(0).unwrap();

        for i in 0..1_000 {
            arena.push(i.to_string());
        }

        assert_eq!(first, "first");
    }

    #[test]
    fn test_concurrent_pushes_are_all_published() {
        let arena = Arc::new(AppendArena::new());
        let handles: Vec<_> = (0..8u64)
            .map(|t| {
                let arena = Arc::clone(&arena);
                thread::spawn(move || {
                    for i in 0..250u64 {
                        arena.push(t * 1_000 + i);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(arena.len(), 2_000);
        let mut values: Vec<u64> = (0..2_000).map(|i| *arena.get(i).unwrap()).collect();
        values.sort_unstable();
        values.dedup();
        assert_eq!(values.len(), 2_000);
    }
}
