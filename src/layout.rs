//! Placement rules shared by allocation and the integrity walk.
//!
//! Every offset produced here is relative to the start of the backing buffer,
//! but alignment is always computed on the absolute address so the pointer
//! handed out satisfies the caller's alignment whatever the buffer's own
//! alignment is.

use std::fmt;

use crate::{
  align::align_up,
  header::{Header, SENTINEL_ALIGN, SENTINEL_SIZE},
};

/// Where the pieces of one allocation record land in the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
  /// Offset of the [`Header`], checked mode only.
  pub header: Option<usize>,
  /// Offset of the first user byte.
  pub user: usize,
  /// Offset of the end sentinel, checked mode only.
  pub sentinel: Option<usize>,
  /// First offset past the record; the next record starts its search here.
  pub end: usize,
}

impl Placement {
  /// Bytes consumed by the record when the cursor was at `cursor`.
  pub fn consumed(
    &self,
    cursor: usize,
  ) -> usize {
    self.end - cursor
  }
}

/// Computes the placement of a record starting the search at `cursor`.
///
/// Implementations must be pure: the checked arena replays `place` on reset
/// and relies on getting exactly the placement it got at allocation time.
pub trait LayoutStrategy: Sync {
  fn mode(&self) -> Mode;

  /// Returns `None` if `align` is not a power of two or the arithmetic
  /// overflows. Capacity is not checked here.
  fn place(
    &self,
    base: usize,
    cursor: usize,
    size: usize,
    align: usize,
  ) -> Option<Placement>;
}

/// Aligns the absolute address `base + offset` and converts it back to an offset.
fn align_offset(
  base: usize,
  offset: usize,
  align: usize,
) -> Option<usize> {
  let addr = base.checked_add(offset)?;
  Some(align_up(addr, align)? - base)
}

/// Padding plus user bytes, nothing else.
#[derive(Debug, Clone, Copy, Default)]
pub struct Plain;

impl LayoutStrategy for Plain {
  fn mode(&self) -> Mode {
    Mode::Plain
  }

  fn place(
    &self,
    base: usize,
    cursor: usize,
    size: usize,
    align: usize,
  ) -> Option<Placement> {
    let user = align_offset(base, cursor, align)?;
    let end = user.checked_add(size)?;

    Some(Placement {
      header: None,
      user,
      sentinel: None,
      end,
    })
  }
}

/// Header, user bytes and a trailing sentinel.
#[derive(Debug, Clone, Copy, Default)]
pub struct Checked;

impl Checked {
  /// Offset of the header of the record whose search starts at `cursor`.
  ///
  /// Depends only on the cursor, which is what lets the walk find a header
  /// before it knows anything about the record.
  pub fn header_offset(
    base: usize,
    cursor: usize,
  ) -> Option<usize> {
    align_offset(base, cursor, Header::ALIGN)
  }
}

impl LayoutStrategy for Checked {
  fn mode(&self) -> Mode {
    Mode::Checked
  }

  fn place(
    &self,
    base: usize,
    cursor: usize,
    size: usize,
    align: usize,
  ) -> Option<Placement> {
    let header = Self::header_offset(base, cursor)?;
    let user = align_offset(base, header.checked_add(Header::SIZE)?, align)?;
    let sentinel = align_offset(base, user.checked_add(size)?, SENTINEL_ALIGN)?;
    let end = sentinel.checked_add(SENTINEL_SIZE)?;

    Some(Placement {
      header: Some(header),
      user,
      sentinel: Some(sentinel),
      end,
    })
  }
}

/// Selects the record layout of an arena. Fixed for the arena's lifetime
/// since it changes the layout of every allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
  /// Release layout: no metadata, reset is O(1).
  Plain,
  /// Integrity-checked layout: every record carries a header and an end
  /// sentinel which are verified on reset.
  Checked,
}

impl Mode {
  pub fn strategy(self) -> &'static dyn LayoutStrategy {
    match self {
      Mode::Plain => &Plain,
      Mode::Checked => &Checked,
    }
  }

  pub fn is_checked(self) -> bool {
    self == Mode::Checked
  }
}

impl Default for Mode {
  /// `Checked` in debug builds, `Plain` in release builds.
  fn default() -> Self {
    if cfg!(debug_assertions) {
      Mode::Checked
    } else {
      Mode::Plain
    }
  }
}

impl fmt::Display for Mode {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    match self {
      Mode::Plain => f.write_str("plain"),
      Mode::Checked => f.write_str("checked"),
    }
  }
}
