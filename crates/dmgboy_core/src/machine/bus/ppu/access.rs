use super::super::GameBoyBus;
use super::LcdControl;

impl GameBoyBus {
    /// Check whether VRAM ($8000-$9FFF) is currently accessible to the CPU.
    ///
    /// VRAM is accessible in PPU modes 0, 1 and 2 and becomes inaccessible
    /// in mode 3. While the LCD is disabled (LCDC.7=0), VRAM is always
    /// accessible.
    pub(in super::super) fn vram_accessible(&self) -> bool {
        !self.lcdc().contains(LcdControl::LCD_ENABLE) || self.ppu.mode != 3
    }

    /// Check whether OAM ($FE00-$FE9F) is currently accessible to the CPU.
    ///
    /// OAM is accessible in modes 0 and 1 (HBlank / VBlank) and inaccessible
    /// in modes 2 and 3. While the LCD is disabled, OAM is always accessible.
    pub(in super::super) fn oam_accessible(&self) -> bool {
        !self.lcdc().contains(LcdControl::LCD_ENABLE) || matches!(self.ppu.mode, 0 | 1)
    }
}
