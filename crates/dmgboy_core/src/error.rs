use thiserror::Error;

/// Fatal conditions surfaced by the emulator core.
///
/// Out-of-range cartridge reads are deliberately *not* part of this enum:
/// they read back as `0xFF` on hardware and are only traced.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("invalid operand: {0}")]
    InvalidOperand(String),

    #[error("CPU hung on invalid opcode 0x{opcode:02X} at PC=0x{pc:04X}")]
    InvalidOpcode { opcode: u8, pc: u16 },

    #[error("unsupported cartridge banking controller 0x{0:02X}")]
    UnsupportedCartridge(u8),

    #[error("8x16 sprite mode is not supported")]
    UnsupportedSpriteMode,

    #[error("boot ROM must be 256 bytes, got {0}")]
    InvalidBootRom(usize),

    #[error("cartridge image of {0} bytes is too small to hold a header")]
    TruncatedRom(usize),
}

pub type Result<T> = std::result::Result<T, Error>;
