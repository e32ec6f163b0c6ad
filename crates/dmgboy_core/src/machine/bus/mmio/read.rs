use super::super::GameBoyBus;

impl GameBoyBus {
    /// Address decode for reads, without DMA or PPU interference.
    pub(in super::super) fn read_raw(&self, addr: u16) -> u8 {
        match addr {
            0x0000..=0x00FF if self.boot_rom.is_some() => self
                .boot_rom
                .as_ref()
                .map_or(0xFF, |image| image[addr as usize]),

            // Cartridge ROM area, routed through the active mapper.
            0x0000..=0x7FFF => self.cartridge.rom_read(addr),

            // Cartridge RAM area 0xA000..0xBFFF.
            0xA000..=0xBFFF => self.cartridge.ram_read(addr),

            // VRAM, WRAM, OAM.
            0x8000..=0x9FFF | 0xC000..=0xDFFF | 0xFE00..=0xFE9F => self.memory[addr as usize],

            // Echo RAM: 0xE000..0xFDFF mirrors 0xC000..0xDDFF.
            0xE000..=0xFDFF => self.memory[(addr - 0x2000) as usize],

            // Unusable area 0xFEA0..0xFEFF reads as 0xFF.
            0xFEA0..=0xFEFF => 0xFF,

            // Joypad input (P1).
            0xFF00 => self.read_joyp(),

            // Serial transfer registers.
            0xFF01 => self.serial.sb,
            0xFF02 => self.serial.read_sc(),

            0xFF04..=0xFF07 => self.timer.read(addr),

            0xFF0F => self.interrupts.read_flags(),

            0xFF10..=0xFF3F => self.read_apu_register(addr),

            // STAT bit 7 is unused and reads as 1.
            0xFF41 => self.memory[0xFF41] | 0x80,
            0xFF40 | 0xFF42..=0xFF4B => self.memory[addr as usize],

            // HRAM.
            0xFF80..=0xFFFE => self.memory[addr as usize],

            0xFFFF => self.interrupts.read_enable(),

            // Unmapped I/O, including the boot ROM latch.
            _ => 0xFF,
        }
    }
}
