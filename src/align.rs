/// Rounds `value` up to the next multiple of `align`.
///
/// `align` must be a power of two; the rounding is done with a bit mask and
/// silently produces garbage otherwise. Use [`align_up`] when the inputs are
/// not already known to be valid.
///
/// # Examples
///
/// ```rust
/// use rarena::align_to;
///
/// assert_eq!(align_to!(13, 8), 16);
/// assert_eq!(align_to!(16, 16), 16);
/// assert_eq!(align_to!(0, 4096), 0);
/// ```
#[macro_export]
macro_rules! align_to {
  ($value:expr, $align:expr) => {
    ($value + $align - 1) & !($align - 1)
  };
}

/// Returns `true` if `align` can be used as an alignment.
pub fn is_valid_alignment(align: usize) -> bool {
  align.is_power_of_two()
}

/// Checked version of [`align_to!`].
///
/// Returns `None` if `align` is not a power of two or if rounding up would
/// overflow `usize`.
pub fn align_up(
  value: usize,
  align: usize,
) -> Option<usize> {
  if !is_valid_alignment(align) {
    return None;
  }

  Some(value.checked_add(align - 1)? & !(align - 1))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_align_to() {
    for align in [1usize, 2, 4, 8, 16, 64, 4096] {
      for i in 0..10 {
        let sizes = (align * i + 1)..=(align * (i + 1));

        for size in sizes {
          assert_eq!(align * (i + 1), align_to!(size, align));
        }
      }
    }
  }

  #[test]
  fn test_align_up_matches_macro() {
    for align in [1usize, 2, 8, 32] {
      for value in 0..200 {
        assert_eq!(align_up(value, align), Some(align_to!(value, align)));
      }
    }
  }

  #[test]
  fn test_align_up_rejects_bad_alignment() {
    assert_eq!(align_up(10, 0), None);
    assert_eq!(align_up(10, 3), None);
    assert_eq!(align_up(10, 24), None);
    assert!(!is_valid_alignment(0));
    assert!(is_valid_alignment(1));
  }

  #[test]
  fn test_align_up_overflow() {
    assert_eq!(align_up(usize::MAX, 16), None);
    assert_eq!(align_up(usize::MAX, 1), Some(usize::MAX));
  }
}
