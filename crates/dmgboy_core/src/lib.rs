pub mod config;
pub mod cpu;
mod error;
pub mod machine;

pub use config::MachineConfig;
pub use cpu::{CpuStatus, Registers};
pub use error::{Error, Result};
pub use machine::GameBoy;

/// Logical screen width in pixels for the Game Boy DMG.
pub const SCREEN_WIDTH: usize = 160;
/// Logical screen height in pixels.
pub const SCREEN_HEIGHT: usize = 144;
