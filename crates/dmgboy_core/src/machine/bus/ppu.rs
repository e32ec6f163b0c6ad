//! Scanline PPU.
//!
//! Each visible line is 114 machine cycles: OAM search (mode 2) for cycles
//! 0–10, pixel transfer (mode 3) for 11–53 and HBlank (mode 0) for the
//! rest. The whole line is rendered in one batch on entry to mode 3, which
//! matches hardware as long as registers are not rewritten mid-line.
//! Lines 144–153 are VBlank (mode 1). Register values live in the bus
//! memory array; the state machine below tracks position and output.

mod access;
mod mmio;
mod render;
mod timing;

use bitflags::bitflags;

use crate::machine::edge::EdgeLatch;
use crate::{SCREEN_HEIGHT, SCREEN_WIDTH};

use super::GameBoyBus;

const LCDC_ADDR: u16 = 0xFF40;
const STAT_ADDR: u16 = 0xFF41;
const SCY_ADDR: u16 = 0xFF42;
const SCX_ADDR: u16 = 0xFF43;
const LY_ADDR: u16 = 0xFF44;
const LYC_ADDR: u16 = 0xFF45;
const BGP_ADDR: u16 = 0xFF47;
const OBP0_ADDR: u16 = 0xFF48;
const OBP1_ADDR: u16 = 0xFF49;
const WY_ADDR: u16 = 0xFF4A;
const WX_ADDR: u16 = 0xFF4B;

bitflags! {
    /// LCDC (0xFF40).
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub(crate) struct LcdControl: u8 {
        const LCD_ENABLE        = 0b1000_0000;
        const WINDOW_TILE_MAP   = 0b0100_0000;
        const WINDOW_ENABLE     = 0b0010_0000;
        const TILE_DATA_UNSIGNED = 0b0001_0000;
        const BG_TILE_MAP       = 0b0000_1000;
        const OBJ_TALL          = 0b0000_0100;
        const OBJ_ENABLE        = 0b0000_0010;
        const BG_WINDOW_ENABLE  = 0b0000_0001;
    }
}

bitflags! {
    /// Writable STAT (0xFF41) interrupt selects.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub(crate) struct StatSelect: u8 {
        const LYC    = 0b0100_0000;
        const MODE2  = 0b0010_0000;
        const MODE1  = 0b0001_0000;
        const MODE0  = 0b0000_1000;
    }
}

/// Machine cycles per scanline.
pub(super) const LINE_MCYCLES: u8 = 114;
/// First cycle of mode 3 within a visible line.
const MODE3_START: u8 = 11;
/// First cycle of mode 0 within a visible line.
const MODE0_START: u8 = 54;
const VBLANK_LINE: u8 = 144;
const LINES_PER_FRAME: u8 = 154;

pub(super) struct Ppu {
    /// Position within the current line, 0..LINE_MCYCLES.
    line_cycle: u8,
    ly: u8,
    mode: u8,
    /// STAT interrupt line, requested on its rising edge.
    stat_line: EdgeLatch,
    /// Window's own line counter; advances only on lines that drew it.
    window_line: u8,
    /// Set once a line failed to render; every later tick reports it again.
    sprite_fault: bool,
    /// One shade (0–3) per pixel, row-major.
    pub(super) frame: Vec<u8>,
    /// Frames completed (VBlank entries) since power-on.
    pub(super) frames: u64,
}

impl Ppu {
    pub(super) fn new() -> Self {
        Self {
            line_cycle: 0,
            ly: 0,
            mode: 0,
            stat_line: EdgeLatch::default(),
            window_line: 0,
            sprite_fault: false,
            frame: vec![0; SCREEN_WIDTH * SCREEN_HEIGHT],
            frames: 0,
        }
    }
}

impl GameBoyBus {
    #[inline]
    pub(super) fn lcdc(&self) -> LcdControl {
        LcdControl::from_bits_retain(self.memory[LCDC_ADDR as usize])
    }
}
