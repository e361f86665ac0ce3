use std::alloc::Layout;

use rarena::{Arena, ArenaConfig, CorruptionPolicy, Mode};
use tracing::info;
use tracing_subscriber::EnvFilter;

const BLOCK_COUNT: usize = 5;
const BLOCK_SIZE: usize = 8;
const ALIGNMENT: usize = 16;

fn main() -> rarena::Result<()> {
  // RUST_LOG=rarena=trace shows every allocation and every verified record.
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .init();

  let layout = Layout::from_size_align(BLOCK_SIZE, ALIGNMENT).expect("valid layout");

  // --------------------------------------------------------------------
  // 1) Create a 1 KiB arena and carve out a few aligned blocks.
  // --------------------------------------------------------------------
  let mut arena = Arena::with_config(
    ArenaConfig::new(1024)
      .mode(Mode::Checked)
      .on_corruption(CorruptionPolicy::Abort),
  )?;
  info!(capacity = arena.capacity(), mode = %arena.mode(), "[1] arena created");

  for i in 0..BLOCK_COUNT {
    let block = arena.allocate(layout).expect("arena has room");
    let addr = block.cast::<u8>().as_ptr() as usize;
    assert_eq!(addr % ALIGNMENT, 0, "block is not aligned");

    // Fill the block right up to its last byte; the canary behind it
    // must survive.
    unsafe { block.cast::<u8>().as_ptr().write_bytes(0xAB, BLOCK_SIZE) };
    info!(block = i + 1, addr = %format!("{addr:#x}"), used = arena.used(), "[1] allocated");
  }

  // --------------------------------------------------------------------
  // 2) Reset validates every record, then the arena is reused.
  // --------------------------------------------------------------------
  arena.reset()?;
  assert_eq!(arena.used(), 0);

  let block = arena.allocate(layout).expect("arena has room after reset");
  info!(addr = ?block.cast::<u8>(), "[2] arena reset and reused");

  // --------------------------------------------------------------------
  // 3) A request larger than the arena fails without moving the offset.
  // --------------------------------------------------------------------
  arena.reset()?;
  let overflow = arena.allocate(Layout::from_size_align(2048, ALIGNMENT).expect("valid layout"));
  assert!(overflow.is_none());
  assert_eq!(arena.used(), 0);
  info!("[3] oversized allocation refused");

  // --------------------------------------------------------------------
  // 4) Handles survive only until the next reset.
  // --------------------------------------------------------------------
  let greeting = arena.alloc_copy(b"hello arena")?;
  let text = String::from_utf8_lossy(arena.bytes(&greeting)?).into_owned();
  info!(%text, "[4] copied into arena");

  arena.reset()?;
  if let Err(err) = arena.bytes(&greeting) {
    info!(%err, "[4] stale handle rejected");
  }

  // --------------------------------------------------------------------
  // 5) Destroy releases the buffer; a second destroy does nothing.
  // --------------------------------------------------------------------
  arena.destroy();
  arena.destroy();
  info!(destroyed = arena.is_destroyed(), "[5] arena destroyed");

  Ok(())
}
