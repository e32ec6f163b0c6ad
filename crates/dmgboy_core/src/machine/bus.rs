use crate::{Error, MachineConfig, Result};

use super::cartridge::{Cartridge, CartridgeKind};
use super::interrupts::InterruptController;
use super::serial::Serial;
use super::timer::Timer;
use super::MEMORY_SIZE;

mod apu;
mod dma;
mod init;
mod joypad;
mod mmio;
mod ppu;
mod traits;

use dma::Dma;
use ppu::Ppu;

pub(crate) struct GameBoyBus {
    /// Backing store for VRAM, WRAM, OAM, HRAM and I/O registers without
    /// dedicated state. Cartridge ROM/RAM live in `cartridge`.
    pub(crate) memory: [u8; MEMORY_SIZE],
    pub(crate) serial: Serial,
    pub(crate) interrupts: InterruptController,
    cartridge: Cartridge,
    /// 256-byte boot ROM overlaid on 0x0000–0x00FF until 0xFF50 is written.
    boot_rom: Option<Vec<u8>>,
    /// Timer / divider state.
    timer: Timer,
    /// OAM DMA engine.
    dma: Dma,
    /// Scanline state machine and frame buffer.
    ppu: Ppu,
    /// Joypad selection bits (P1 bits 5 and 4).
    joyp_select: u8,
    /// Current key state, active low: bits 0–3 Right/Left/Up/Down,
    /// bits 4–7 A/B/Select/Start.
    joyp_keys: u8,
}

impl GameBoyBus {
    pub(crate) fn new(rom: &[u8], config: &MachineConfig) -> Result<Self> {
        let cartridge = Cartridge::from_rom(rom)?;
        let boot_rom = match &config.boot_rom {
            Some(image) if image.len() != 0x100 => return Err(Error::InvalidBootRom(image.len())),
            Some(image) => Some(image.clone()),
            None => None,
        };

        let mut bus = Self {
            memory: [0; MEMORY_SIZE],
            serial: Serial::default(),
            interrupts: InterruptController::default(),
            cartridge,
            boot_rom,
            timer: Timer::new(),
            dma: Dma::default(),
            ppu: Ppu::new(),
            joyp_select: 0x30,
            joyp_keys: 0xFF,
        };
        if config.seed_internal_ram {
            bus.randomize_internal_ram();
        }
        if bus.boot_rom.is_some() {
            bus.apply_power_on_io_state();
        } else {
            bus.apply_dmg_initial_io_state();
        }
        Ok(bus)
    }

    pub(crate) fn cartridge_kind(&self) -> CartridgeKind {
        self.cartridge.kind()
    }

    pub(crate) fn boot_rom_mapped(&self) -> bool {
        self.boot_rom.is_some()
    }

    /// Advance timer, DMA and PPU by one machine cycle.
    ///
    /// A PPU fault (unsupported sprite mode) is reported from the cycle
    /// that rendered the offending line.
    pub(crate) fn tick_mcycle(&mut self) -> Result<()> {
        self.timer.tick_mcycle(&mut self.interrupts);
        self.dma_tick();
        self.ppu_tick()
    }

    /// Side-effect-free read that ignores DMA conflicts and PPU blocking.
    pub(crate) fn peek(&self, addr: u16) -> u8 {
        self.read_raw(addr)
    }

    pub(crate) fn frame_buffer(&self) -> &[u8] {
        &self.ppu.frame
    }

    pub(crate) fn frame_count(&self) -> u64 {
        self.ppu.frames
    }

    pub(crate) fn lcd_enabled(&self) -> bool {
        self.lcdc().contains(ppu::LcdControl::LCD_ENABLE)
    }
}
