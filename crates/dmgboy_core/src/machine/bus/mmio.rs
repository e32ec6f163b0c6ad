mod read;
mod write;

use super::GameBoyBus;

impl GameBoyBus {
    /// CPU read: DMA conflicts first, then VRAM/OAM blocking.
    pub(super) fn read8_mmio(&self, addr: u16) -> u8 {
        if let Some(value) = self.dma_bus_conflict(addr) {
            return value;
        }
        match addr {
            // Undefined data when blocked; hardware observations see 0xFF.
            0x8000..=0x9FFF if !self.vram_accessible() => 0xFF,
            0xFE00..=0xFE9F if !self.oam_accessible() => 0xFF,
            _ => self.read_raw(addr),
        }
    }

    pub(super) fn write8_mmio(&mut self, addr: u16, value: u8) {
        self.write8_mmio_impl(addr, value)
    }
}
