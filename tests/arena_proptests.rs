//! Property-based tests for the arena.
//!
//! These tests verify invariants that should hold for any sequence of
//! allocation requests, in both layout modes.

use proptest::prelude::*;
use rarena::{Arena, ArenaConfig, ArenaError, CorruptionPolicy, Mode};

// ============================================================================
//  Strategies
// ============================================================================

fn mode() -> impl Strategy<Value = Mode> {
  prop_oneof![Just(Mode::Plain), Just(Mode::Checked)]
}

/// A single request: size up to 200 bytes, alignment 1..=256.
fn request() -> impl Strategy<Value = (usize, usize)> {
  (0usize..200, 0u32..=8).prop_map(|(size, shift)| (size, 1usize << shift))
}

fn requests() -> impl Strategy<Value = Vec<(usize, usize)>> {
  prop::collection::vec(request(), 1..64)
}

fn arena(
  capacity: usize,
  mode: Mode,
) -> Arena {
  Arena::with_config(
    ArenaConfig::new(capacity)
      .mode(mode)
      .on_corruption(CorruptionPolicy::Report),
  )
  .expect("arena")
}

// ============================================================================
//  Allocation Properties
// ============================================================================

proptest! {
  /// Every block is aligned, lies inside the buffer, and the offset never
  /// moves backwards or past the capacity.
  #[test]
  fn blocks_are_aligned_and_in_bounds(
    mode in mode(),
    capacity in 64usize..4096,
    requests in requests()
  ) {
    let mut arena = arena(capacity, mode);
    let base = arena.as_ptr() as usize;

    for (size, align) in requests {
      let before = arena.used();

      match arena.try_allocate(size, align) {
        Ok(block) => {
          let start = block.cast::<u8>().as_ptr() as usize;
          prop_assert_eq!(start % align, 0);
          prop_assert!(start >= base);
          prop_assert!(start < base + arena.capacity());
          prop_assert!(start + size <= base + arena.used());
          prop_assert!(arena.used() >= before);
        }
        Err(ArenaError::Exhausted { remaining, .. }) => {
          prop_assert_eq!(arena.used(), before);
          prop_assert_eq!(remaining, capacity - before);
        }
        Err(other) => prop_assert!(false, "unexpected error {:?}", other),
      }

      prop_assert!(arena.used() <= arena.capacity());
    }
  }

  /// Successful blocks never overlap each other.
  #[test]
  fn blocks_do_not_overlap(mode in mode(), requests in requests()) {
    let mut arena = arena(2048, mode);
    let mut ranges: Vec<(usize, usize)> = Vec::new();

    for (size, align) in requests {
      if let Ok(block) = arena.try_allocate(size, align) {
        let start = block.cast::<u8>().as_ptr() as usize;
        let end = start + size;

        for &(s, e) in &ranges {
          prop_assert!(end <= s || start >= e || size == 0);
        }

        ranges.push((start, end));
      }
    }
  }

  /// The offset is exactly the sum of what the layout strategy says each
  /// successful request consumed.
  #[test]
  fn offset_matches_layout(mode in mode(), requests in requests()) {
    let mut arena = arena(2048, mode);
    let base = arena.as_ptr() as usize;
    let mut expected = 0;

    for (size, align) in requests {
      let placement = mode.strategy().place(base, expected, size, align).unwrap();

      match arena.try_allocate(size, align) {
        Ok(_) => expected = placement.end,
        Err(_) => prop_assert!(placement.end > arena.capacity() || placement.user >= arena.capacity()),
      }

      prop_assert_eq!(arena.used(), expected);
    }
  }

  /// Filling blocks within their bounds never trips the integrity walk, and
  /// the walk visits exactly one record per allocation.
  #[test]
  fn in_bounds_writes_validate(requests in requests()) {
    let mut arena = arena(4096, Mode::Checked);

    for (size, align) in requests {
      if let Ok(block) = arena.try_allocate(size, align) {
        unsafe { block.cast::<u8>().as_ptr().write_bytes(0xA5, size) };
      }
    }

    prop_assert_eq!(arena.validate(), Ok(arena.allocations()));
    prop_assert_eq!(arena.reset(), Ok(()));
    prop_assert_eq!(arena.used(), 0);
  }

  /// After a reset, the same request sequence lands on the same addresses.
  #[test]
  fn reset_replays_addresses(mode in mode(), requests in requests()) {
    let mut arena = arena(2048, mode);

    let first: Vec<_> = requests
      .iter()
      .map(|&(size, align)| arena.try_allocate(size, align).ok().map(|b| b.cast::<u8>()))
      .collect();

    arena.reset().unwrap();

    let second: Vec<_> = requests
      .iter()
      .map(|&(size, align)| arena.try_allocate(size, align).ok().map(|b| b.cast::<u8>()))
      .collect();

    prop_assert_eq!(first, second);
  }
}
