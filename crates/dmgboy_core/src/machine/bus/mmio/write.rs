use super::super::GameBoyBus;
use crate::machine::interrupts::Interrupt;

impl GameBoyBus {
    pub(super) fn write8_mmio_impl(&mut self, addr: u16, value: u8) {
        match addr {
            // Cartridge ROM / MBC area 0x0000..0x7FFF. On real hardware this is
            // read-only from the CPU's point of view; writes are interpreted
            // by the cartridge's MBC logic.
            0x0000..=0x7FFF => self.cartridge.rom_write(addr, value),

            0xA000..=0xBFFF => self.cartridge.ram_write(addr, value),

            // VRAM: writes are ignored while the PPU owns the bus (mode 3).
            0x8000..=0x9FFF => {
                if self.vram_accessible() {
                    self.memory[addr as usize] = value;
                }
            }

            0xC000..=0xDFFF => self.memory[addr as usize] = value,

            // Echo RAM writes land in WRAM.
            0xE000..=0xFDFF => self.memory[(addr - 0x2000) as usize] = value,

            // OAM: ignored while the PPU (modes 2/3) or a DMA owns it.
            0xFE00..=0xFE9F => {
                if self.oam_accessible() && !self.dma_owns_oam() {
                    self.memory[addr as usize] = value;
                }
            }

            // Writes to the unusable area 0xFEA0..0xFEFF are ignored.
            0xFEA0..=0xFEFF => {}

            // Joypad input (P1).
            0xFF00 => self.write_joyp(value),

            // Serial transfer registers.
            0xFF01 => self.serial.write_sb(value),
            0xFF02 => {
                if self.serial.write_sc(value) {
                    self.interrupts.request(Interrupt::SERIAL);
                }
            }

            0xFF04..=0xFF07 => self.timer.write(addr, value),

            // Only lower 5 bits are writable; upper bits always read as 1.
            0xFF0F => self.interrupts.write_flags(value),

            0xFF10..=0xFF3F => self.write_apu_register(addr, value),

            0xFF40 => self.mmio_write_lcdc(value),
            0xFF41 => self.mmio_write_stat(value),
            // LY is read-only.
            0xFF44 => {}
            0xFF45 => self.mmio_write_lyc(value),
            0xFF46 => self.start_oam_dma(value),
            0xFF42 | 0xFF43 | 0xFF47..=0xFF4B => self.memory[addr as usize] = value,

            // Boot ROM latch: any non-zero write unmaps it for good.
            0xFF50 => {
                if value != 0 && self.boot_rom.take().is_some() {
                    log::info!("GB boot ROM unmapped");
                }
            }

            0xFF80..=0xFFFE => self.memory[addr as usize] = value,

            0xFFFF => self.interrupts.write_enable(value),

            _ => {}
        }
    }
}
