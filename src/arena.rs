use std::{
  alloc::{self, Layout},
  fmt, process,
  ptr::{self, NonNull},
  slice,
};

use libc::{c_void, calloc, free};
use tracing::{debug, error, trace};

use crate::{
  align::is_valid_alignment,
  block::Block,
  config::{ArenaConfig, CorruptionPolicy},
  error::{ArenaError, Corruption, CorruptionKind, Result},
  header::{CANARY, Header},
  layout::{Checked, LayoutStrategy, Mode, Placement},
};

/// Fixed-capacity bump arena over one zeroed `calloc` buffer.
///
/// Not `Send` nor `Sync`: the arena has a single writer.
pub struct Arena {
  base: *mut u8,
  offset: usize,
  capacity: usize,
  strategy: &'static dyn LayoutStrategy,
  on_corruption: CorruptionPolicy,
  allocations: usize,
  generation: u64,
}

impl Arena {
  /// Creates an arena of `capacity` bytes with the default [`ArenaConfig`].
  ///
  /// # Panics
  ///
  /// Panics if `capacity` is zero. If the host allocator cannot provide the
  /// buffer the process is terminated through [`alloc::handle_alloc_error`].
  pub fn new(capacity: usize) -> Self {
    assert!(capacity > 0, "arena capacity must be greater than zero");

    match Self::with_config(ArenaConfig::new(capacity)) {
      Ok(arena) => arena,
      Err(err) => {
        error!(%err, capacity, "cannot create arena");
        match Layout::array::<u8>(capacity) {
          Ok(layout) => alloc::handle_alloc_error(layout),
          Err(_) => process::abort(),
        }
      }
    }
  }

  /// Creates an arena, reporting allocation failure instead of aborting.
  pub fn with_config(config: ArenaConfig) -> Result<Self> {
    let capacity = config.capacity;

    if capacity == 0 {
      return Err(ArenaError::ZeroCapacity);
    }

    if capacity > isize::MAX as usize {
      return Err(ArenaError::OutOfMemory { capacity });
    }

    // Zeroed so every byte handed out through `bytes` is initialized.
    let base = unsafe { calloc(capacity, 1) } as *mut u8;

    if base.is_null() {
      return Err(ArenaError::OutOfMemory { capacity });
    }

    debug!(capacity, mode = %config.mode, base = ?base, "arena created");

    Ok(Self {
      base,
      offset: 0,
      capacity,
      strategy: config.mode.strategy(),
      on_corruption: config.on_corruption,
      allocations: 0,
      generation: 0,
    })
  }

  pub fn capacity(&self) -> usize {
    self.capacity
  }

  /// Bytes consumed so far, layout overhead included.
  pub fn used(&self) -> usize {
    self.offset
  }

  pub fn remaining(&self) -> usize {
    self.capacity - self.offset
  }

  pub fn mode(&self) -> Mode {
    self.strategy.mode()
  }

  /// Allocations made since the last reset.
  pub fn allocations(&self) -> usize {
    self.allocations
  }

  /// Incremented by every reset and by [`destroy`](Self::destroy).
  pub fn generation(&self) -> u64 {
    self.generation
  }

  pub fn is_destroyed(&self) -> bool {
    self.base.is_null()
  }

  /// Start of the backing buffer, null once destroyed.
  pub fn as_ptr(&self) -> *const u8 {
    self.base
  }

  /// Bumps the cursor past a record for `size` bytes aligned to `align`.
  ///
  /// Leaves the arena untouched on failure.
  fn bump(
    &mut self,
    size: usize,
    align: usize,
  ) -> Result<Placement> {
    if !is_valid_alignment(align) {
      return Err(ArenaError::InvalidAlignment { align });
    }

    let remaining = self.remaining();
    let placement = if self.base.is_null() {
      None
    } else {
      self.strategy.place(self.base as usize, self.offset, size, align)
    };

    let placement = match placement {
      Some(placement) if placement.end <= self.capacity && placement.user < self.capacity => {
        placement
      }
      other => {
        let requested = other.map_or(size, |p| p.consumed(self.offset));
        debug!(requested, remaining, "arena capacity full");
        return Err(ArenaError::Exhausted { requested, remaining });
      }
    };

    unsafe {
      if let Some(header) = placement.header {
        self.base.add(header).cast::<Header>().write(Header::new(size, align));
      }

      if let Some(sentinel) = placement.sentinel {
        self.base.add(sentinel).cast::<u64>().write(CANARY);
      }
    }

    trace!(
      size,
      align,
      offset = placement.user,
      consumed = placement.consumed(self.offset),
      "allocated"
    );

    self.offset = placement.end;
    self.allocations += 1;

    Ok(placement)
  }

  fn user_slice(
    &self,
    placement: &Placement,
    size: usize,
  ) -> Option<NonNull<[u8]>> {
    let start = unsafe { self.base.add(placement.user) };
    NonNull::new(ptr::slice_from_raw_parts_mut(start, size))
  }

  /// Allocates a block for `layout`.
  ///
  /// Returns `None` when the arena cannot fit the block; the arena is left
  /// unchanged in that case. A zero-sized block still needs an address inside
  /// the buffer, so it fails once the arena is full.
  ///
  /// The block holds zeroes or whatever an earlier generation left there, and
  /// stays valid until the next [`reset`](Self::reset) or
  /// [`destroy`](Self::destroy).
  pub fn allocate(
    &mut self,
    layout: Layout,
  ) -> Option<NonNull<[u8]>> {
    let placement = self.bump(layout.size(), layout.align()).ok()?;
    self.user_slice(&placement, layout.size())
  }

  /// Like [`allocate`](Self::allocate) but takes a raw alignment and says why
  /// it failed.
  pub fn try_allocate(
    &mut self,
    size: usize,
    align: usize,
  ) -> Result<NonNull<[u8]>> {
    let placement = self.bump(size, align)?;
    self.user_slice(&placement, size).ok_or(ArenaError::Exhausted {
      requested: size,
      remaining: self.remaining(),
    })
  }

  /// Allocates a block addressed through a generation-checked [`Block`].
  pub fn alloc_block(
    &mut self,
    size: usize,
    align: usize,
  ) -> Result<Block> {
    let placement = self.bump(size, align)?;
    Ok(Block::new(placement.user, size, self.generation))
  }

  /// Allocates a byte-aligned block holding a copy of `bytes`.
  pub fn alloc_copy(
    &mut self,
    bytes: &[u8],
  ) -> Result<Block> {
    let block = self.alloc_block(bytes.len(), 1)?;
    self.bytes_mut(&block)?.copy_from_slice(bytes);
    Ok(block)
  }

  fn check_block(
    &self,
    block: &Block,
  ) -> Result<()> {
    if block.generation() != self.generation {
      return Err(ArenaError::StaleBlock {
        block: *block,
        current: self.generation,
      });
    }

    match block.end() {
      Some(end) if end <= self.offset && !self.base.is_null() => Ok(()),
      _ => Err(ArenaError::OutOfBounds { block: *block }),
    }
  }

  pub fn bytes(
    &self,
    block: &Block,
  ) -> Result<&[u8]> {
    self.check_block(block)?;
    Ok(unsafe { slice::from_raw_parts(self.base.add(block.offset()), block.len()) })
  }

  pub fn bytes_mut(
    &mut self,
    block: &Block,
  ) -> Result<&mut [u8]> {
    self.check_block(block)?;
    Ok(unsafe { slice::from_raw_parts_mut(self.base.add(block.offset()), block.len()) })
  }

  /// Walks every record written since the last reset and checks both
  /// sentinels, returning how many records were verified.
  ///
  /// Plain arenas carry no metadata and always verify zero records.
  pub fn validate(&self) -> Result<usize> {
    if !self.mode().is_checked() || self.base.is_null() {
      return Ok(0);
    }

    let base = self.base as usize;
    let mut cursor = 0;
    let mut index = 0;

    while cursor < self.offset {
      let corrupted = |offset: usize, kind: CorruptionKind| {
        ArenaError::Corrupted(Corruption { index, offset, kind })
      };

      let header_offset = Checked::header_offset(base, cursor).unwrap_or(usize::MAX);
      let header_end = header_offset.saturating_add(Header::SIZE);

      if header_end > self.offset {
        return Err(corrupted(cursor, CorruptionKind::Truncated { end: header_end }));
      }

      let header = unsafe { self.base.add(header_offset).cast::<Header>().read() };

      if !header.is_intact() {
        return Err(corrupted(header_offset, CorruptionKind::StartSentinel { found: header.canary }));
      }

      if !is_valid_alignment(header.align) {
        return Err(corrupted(header_offset, CorruptionKind::BadAlignment { align: header.align }));
      }

      let placement = match Checked.place(base, cursor, header.size, header.align) {
        Some(placement) if placement.end <= self.offset => placement,
        other => {
          let end = other.map_or(usize::MAX, |p| p.end);
          return Err(corrupted(header_offset, CorruptionKind::Truncated { end }));
        }
      };

      if let Some(sentinel) = placement.sentinel {
        let found = unsafe { self.base.add(sentinel).cast::<u64>().read() };

        if found != CANARY {
          return Err(corrupted(header_offset, CorruptionKind::EndSentinel { found }));
        }
      }

      trace!(index, offset = header_offset, size = header.size, "record verified");

      cursor = placement.end;
      index += 1;
    }

    Ok(index)
  }

  /// Reclaims every allocation at once.
  ///
  /// Checked arenas validate every record first; on corruption the process is
  /// aborted, or with [`CorruptionPolicy::Report`] the error is returned and
  /// the arena is left as it was.
  pub fn reset(&mut self) -> Result<()> {
    let verified = match self.validate() {
      Ok(verified) => verified,
      Err(err) => match self.on_corruption {
        CorruptionPolicy::Abort => {
          error!(%err, "arena corrupted, aborting");
          process::abort();
        }
        CorruptionPolicy::Report => {
          error!(%err, "arena corrupted");
          return Err(err);
        }
      },
    };

    debug!(
      used = self.offset,
      allocations = self.allocations,
      verified,
      "arena reset"
    );

    self.offset = 0;
    self.allocations = 0;
    self.generation = self.generation.wrapping_add(1);

    Ok(())
  }

  /// Releases the backing buffer. Calling it again is a no-op.
  pub fn destroy(&mut self) {
    if self.base.is_null() {
      return;
    }

    unsafe { free(self.base as *mut c_void) };

    debug!(capacity = self.capacity, "arena destroyed");

    self.base = ptr::null_mut();
    self.offset = 0;
    self.capacity = 0;
    self.allocations = 0;
    self.generation = self.generation.wrapping_add(1);
  }
}

impl Drop for Arena {
  fn drop(&mut self) {
    self.destroy();
  }
}

impl fmt::Debug for Arena {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    f.debug_struct("Arena")
      .field("base", &self.base)
      .field("offset", &self.offset)
      .field("capacity", &self.capacity)
      .field("mode", &self.mode())
      .field("allocations", &self.allocations)
      .field("generation", &self.generation)
      .finish()
  }
}
