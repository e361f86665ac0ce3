//! # rarena - A Fixed-Capacity Arena Allocator
//!
//! This crate provides a **bump arena**: one buffer is taken from the host
//! allocator (`calloc`) when the arena is created, sub-blocks are handed out
//! by moving a cursor forward, and every block is reclaimed at once by a reset.
//!
//! ## Overview
//!
//! ```text
//!   Arena:
//!
//!   base                                                        base + capacity
//!   ┌─────┬───┬─────┬─┬─────┬─────────────────────────────────────────────┐
//!   │ A1  │pad│ A2  │p│ A3  │                 Free Space                  │
//!   └─────┴───┴─────┴─┴─────┴─────────────────────────────────────────────┘
//!                           ▲
//!                           │
//!                         offset
//!
//!   allocate: align offset up, bump it past the block.   O(1)
//!   reset:    offset = 0, every block is gone.            O(1) / O(n) checked
//! ```
//!
//! ## Crate Structure
//!
//! ```text
//!   rarena
//!   ├── align      - Alignment helpers (align_to!, align_up)
//!   ├── arena      - Arena implementation
//!   ├── block      - Generation-checked block handles
//!   ├── config     - ArenaConfig and CorruptionPolicy
//!   ├── error      - ArenaError
//!   ├── header     - Checked-mode record header and canary
//!   └── layout     - Plain and Checked placement strategies
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use std::alloc::Layout;
//! use rarena::Arena;
//!
//! let mut arena = Arena::new(1024);
//!
//! unsafe {
//!     let ptr = arena.allocate(Layout::new::<u64>()).unwrap().cast::<u64>().as_ptr();
//!     ptr.write(42);
//!     assert_eq!(ptr.read(), 42);
//! }
//!
//! arena.reset().unwrap();
//! assert_eq!(arena.used(), 0);
//! ```
//!
//! ## Checked Mode
//!
//! An arena built with [`Mode::Checked`] (the default in debug builds) writes a
//! header in front of and a canary behind every block:
//!
//! ```text
//!   Single Allocation:
//!   ┌──────────────────────┬─────┬──────────────────┬─────┬──────────┐
//!   │       Header         │ pad │    User Data     │ pad │  CANARY  │
//!   │  size | align | CANARY     │   N bytes        │     │  8 bytes │
//!   └──────────────────────┴─────┴──────────────────┴─────┴──────────┘
//!                                ▲
//!                                └── Pointer returned to user
//! ```
//!
//! On reset the arena replays the same placement rules from offset 0, reading
//! each header to find the next record, and checks both canaries. A damaged
//! canary means a block was written out of bounds; by default the process is
//! aborted ([`CorruptionPolicy::Abort`]).
//!
//! ## Limitations
//!
//! - **Single-threaded only**: `Arena` is neither `Send` nor `Sync`
//! - **No individual frees**: memory comes back only through reset
//! - **Fixed size**: the arena never grows
//!
//! ## Safety
//!
//! [`Arena::allocate`] hands out raw pointers that dangle after a reset. Use
//! [`Arena::alloc_block`] with [`Arena::bytes`] / [`Arena::bytes_mut`] for
//! access that is checked against the arena's generation.

pub mod align;
mod arena;
mod block;
mod config;
mod error;
mod header;
pub mod layout;

pub use arena::Arena;
pub use block::Block;
pub use config::{ArenaConfig, CorruptionPolicy};
pub use error::{ArenaError, Corruption, CorruptionKind, Result};
pub use header::{CANARY, Header};
pub use layout::{LayoutStrategy, Mode, Placement};
