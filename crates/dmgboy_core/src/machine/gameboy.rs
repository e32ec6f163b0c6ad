use std::ops::RangeInclusive;

use crate::cpu::{Cpu, CpuStatus, Registers};
use crate::{MachineConfig, Result};

use super::{CartridgeKind, GameBoyBus, MCYCLES_PER_FRAME};

/// High-level Game Boy machine.
///
/// Holds the CPU core and the bus. This is the main entry point for hosts:
/// load a cartridge, feed keys, step, and read back the frame buffer.
pub struct GameBoy {
    cpu: Cpu,
    pub(crate) bus: GameBoyBus,
}

impl GameBoy {
    /// Build a machine in the post-boot state with default configuration.
    pub fn new(rom: &[u8]) -> Result<Self> {
        Self::with_config(MachineConfig::default(), rom)
    }

    pub fn with_config(config: MachineConfig, rom: &[u8]) -> Result<Self> {
        let bus = GameBoyBus::new(rom, &config)?;
        let cpu = if bus.boot_rom_mapped() {
            Cpu::with_boot_rom()
        } else {
            Cpu::new()
        };
        log::info!(
            "GB: loaded {:?} cartridge ({} bytes), boot ROM {}",
            bus.cartridge_kind(),
            rom.len(),
            if bus.boot_rom_mapped() { "mapped" } else { "skipped" }
        );
        Ok(Self { cpu, bus })
    }

    /// Execute one instruction, interrupt dispatch or parked cycle.
    /// Returns the machine cycles it took.
    pub fn step(&mut self) -> Result<u32> {
        self.cpu.step(&mut self.bus)
    }

    /// Step until at least `budget` machine cycles have elapsed. Returns the
    /// cycles actually run, which may overshoot by part of an instruction.
    pub fn run_mcycles(&mut self, budget: u64) -> Result<u64> {
        let mut elapsed = 0u64;
        while elapsed < budget {
            elapsed += u64::from(self.step()?);
        }
        Ok(elapsed)
    }

    /// Step until the PPU finishes a frame (enters VBlank). With the LCD off
    /// no frame ever completes, so a frame's worth of cycles is run instead.
    /// Returns the machine cycles elapsed.
    pub fn step_frame(&mut self) -> Result<u64> {
        let start_frame = self.bus.frame_count();
        let mut elapsed = 0u64;
        while self.bus.frame_count() == start_frame {
            if !self.bus.lcd_enabled() && elapsed >= u64::from(MCYCLES_PER_FRAME) {
                break;
            }
            elapsed += u64::from(self.step()?);
        }
        Ok(elapsed)
    }

    /// Shade (0 = lightest, 3 = darkest) for each of the 160×144 pixels,
    /// row-major.
    pub fn frame_buffer(&self) -> &[u8] {
        self.bus.frame_buffer()
    }

    /// Set the key state, active low: bits 0–3 Right/Left/Up/Down,
    /// bits 4–7 A/B/Select/Start. `0xFF` means nothing is pressed.
    pub fn set_keys(&mut self, keys: u8) {
        self.bus.set_keys(keys);
    }

    pub fn cpu_status(&self) -> CpuStatus {
        self.cpu.status()
    }

    pub fn registers(&self) -> Registers {
        self.cpu.regs
    }

    /// Read a byte as the CPU would see it with no DMA or PPU in the way.
    /// Has no side effects.
    pub fn peek(&self, addr: u16) -> u8 {
        self.bus.peek(addr)
    }

    pub fn dump(&self, range: RangeInclusive<u16>) -> Vec<u8> {
        range.map(|addr| self.bus.peek(addr)).collect()
    }

    /// Total machine cycles elapsed since power-on.
    pub fn cycles(&self) -> u64 {
        self.cpu.mcycles()
    }

    /// Frames completed since power-on.
    pub fn frame_count(&self) -> u64 {
        self.bus.frame_count()
    }

    /// Bytes shifted out of the serial port so far.
    pub fn serial_output(&self) -> &[u8] {
        &self.bus.serial.output
    }

    pub fn cartridge_kind(&self) -> CartridgeKind {
        self.bus.cartridge_kind()
    }
}
