use crate::layout::Mode;

/// What [`Arena::reset`](crate::Arena::reset) does when the integrity walk
/// finds a damaged record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CorruptionPolicy {
  /// Log the corruption and abort the process.
  #[default]
  Abort,
  /// Return [`ArenaError::Corrupted`](crate::ArenaError::Corrupted) and leave
  /// the arena untouched.
  Report,
}

/// Construction-time settings of an [`Arena`](crate::Arena).
///
/// ```rust
/// use rarena::{ArenaConfig, CorruptionPolicy, Mode};
///
/// let config = ArenaConfig::new(4096)
///   .mode(Mode::Checked)
///   .on_corruption(CorruptionPolicy::Report);
///
/// assert_eq!(config.capacity, 4096);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArenaConfig {
  pub capacity: usize,
  pub mode: Mode,
  pub on_corruption: CorruptionPolicy,
}

impl ArenaConfig {
  pub fn new(capacity: usize) -> Self {
    Self {
      capacity,
      mode: Mode::default(),
      on_corruption: CorruptionPolicy::default(),
    }
  }

  pub fn mode(
    mut self,
    mode: Mode,
  ) -> Self {
    self.mode = mode;
    self
  }

  pub fn on_corruption(
    mut self,
    policy: CorruptionPolicy,
  ) -> Self {
    self.on_corruption = policy;
    self
  }
}
