/// Handle to a user block inside an [`Arena`](crate::Arena).
///
/// Unlike the raw pointers returned by [`Arena::allocate`](crate::Arena::allocate),
/// a `Block` remembers the arena generation it was handed out in; every reset
/// bumps the generation and the arena refuses to resolve older handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Block {
  offset: usize,
  len: usize,
  generation: u64,
}

impl Block {
  pub(crate) fn new(
    offset: usize,
    len: usize,
    generation: u64,
  ) -> Self {
    Self {
      offset,
      len,
      generation,
    }
  }

  /// Offset of the first byte from the start of the arena's buffer.
  pub fn offset(&self) -> usize {
    self.offset
  }

  pub fn len(&self) -> usize {
    self.len
  }

  pub fn is_empty(&self) -> bool {
    self.len == 0
  }

  pub fn generation(&self) -> u64 {
    self.generation
  }

  /// One past the last byte.
  pub(crate) fn end(&self) -> Option<usize> {
    self.offset.checked_add(self.len)
  }
}
