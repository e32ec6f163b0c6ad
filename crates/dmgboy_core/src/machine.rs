//! The emulated DMG machine: bus, cartridge, interrupt controller, timer,
//! PPU, DMA and the small register banks around them.

mod bus;
mod cartridge;
mod edge;
mod gameboy;
mod interrupts;
mod serial;
mod timer;

pub(crate) use bus::GameBoyBus;
pub use cartridge::CartridgeKind;
pub use gameboy::GameBoy;
pub use interrupts::Interrupt;

/// Total addressable memory for the Game Boy (64 KiB).
///
/// The bus keeps I/O registers without dedicated state in a flat array of
/// this size; banked regions live in the cartridge.
const MEMORY_SIZE: usize = 0x10000;

/// Machine cycles in one full frame (154 lines of 114 cycles).
pub const MCYCLES_PER_FRAME: u32 = 17_556;

#[cfg(test)]
mod tests;
