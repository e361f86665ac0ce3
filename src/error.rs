use std::fmt;

use thiserror::Error;

use crate::block::Block;

pub type Result<T, E = ArenaError> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArenaError {
  #[error("arena capacity must be greater than zero")]
  ZeroCapacity,

  #[error("host allocator could not provide {capacity} bytes")]
  OutOfMemory { capacity: usize },

  #[error("alignment {align} is not a power of two")]
  InvalidAlignment { align: usize },

  #[error("arena capacity full: requested {requested} bytes, {remaining} remaining")]
  Exhausted { requested: usize, remaining: usize },

  #[error("arena corruption detected: {0}")]
  Corrupted(Corruption),

  #[error("block from generation {} used in generation {current}", .block.generation())]
  StaleBlock { block: Block, current: u64 },

  /// Only the live region is checked; a handle from another arena that
  /// happens to fall inside it is not detected.
  #[error("block lies outside the arena's live region")]
  OutOfBounds { block: Block },
}

/// A record that failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Corruption {
  /// Position of the record in allocation order, starting at 0.
  pub index: usize,
  /// Offset of the record's header.
  pub offset: usize,
  pub kind: CorruptionKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorruptionKind {
  /// The canary inside the header was overwritten.
  StartSentinel { found: u64 },
  /// The canary after the user bytes was overwritten.
  EndSentinel { found: u64 },
  /// The header holds an alignment that is not a power of two.
  BadAlignment { align: usize },
  /// The record would end at `end`, past the arena's offset.
  Truncated { end: usize },
}

impl fmt::Display for Corruption {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    write!(f, "record #{} at offset {}: ", self.index, self.offset)?;

    match self.kind {
      CorruptionKind::StartSentinel { found } => write!(f, "start sentinel overwritten ({found:#018x})"),
      CorruptionKind::EndSentinel { found } => write!(f, "end sentinel overwritten ({found:#018x})"),
      CorruptionKind::BadAlignment { align } => write!(f, "header holds invalid alignment {align}"),
      CorruptionKind::Truncated { end } => write!(f, "record runs past the arena offset to {end}"),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_display() {
    let err = ArenaError::Exhausted {
      requested: 2048,
      remaining: 1024,
    };
    assert_eq!(err.to_string(), "arena capacity full: requested 2048 bytes, 1024 remaining");

    let err = ArenaError::Corrupted(Corruption {
      index: 2,
      offset: 96,
      kind: CorruptionKind::EndSentinel { found: 0 },
    });
    assert_eq!(
      err.to_string(),
      "arena corruption detected: record #2 at offset 96: end sentinel overwritten (0x0000000000000000)"
    );
  }
}
