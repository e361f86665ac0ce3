use std::mem;

/// Marker written at both ends of every checked allocation.
pub const CANARY: u64 = 0xDEAD_BEEF_CAFE_BABE;

/// Size in bytes of the end sentinel.
pub const SENTINEL_SIZE: usize = mem::size_of::<u64>();

/// Alignment of the end sentinel.
pub const SENTINEL_ALIGN: usize = mem::align_of::<u64>();

/// Metadata placed in front of every user block in checked mode.
///
/// ```text
///   ┌────────┬──────────────────┬─────────┬──────────────┬─────────┬──────────┐
///   │  pad   │ size|align|canary│   pad   │  user bytes  │   pad   │  CANARY  │
///   └────────┴──────────────────┴─────────┴──────────────┴─────────┴──────────┘
///            ▲                            ▲
///            header                       pointer returned to the caller
/// ```
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
  pub size: usize,
  pub align: usize,
  pub canary: u64,
}

impl Header {
  pub const SIZE: usize = mem::size_of::<Header>();
  pub const ALIGN: usize = mem::align_of::<Header>();

  pub fn new(
    size: usize,
    align: usize,
  ) -> Self {
    Self {
      size,
      align,
      canary: CANARY,
    }
  }

  pub fn is_intact(&self) -> bool {
    self.canary == CANARY
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_header_layout() {
    assert_eq!(Header::SIZE, 2 * mem::size_of::<usize>() + 8);
    assert_eq!(Header::ALIGN, mem::align_of::<usize>().max(mem::align_of::<u64>()));
    assert_eq!(Header::SIZE % SENTINEL_ALIGN, 0);
  }

  #[test]
  fn test_header_canary() {
    let mut header = Header::new(24, 8);
    assert!(header.is_intact());

    header.canary ^= 1;
    assert!(!header.is_intact());
  }
}
