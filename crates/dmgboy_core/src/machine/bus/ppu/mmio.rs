use super::super::GameBoyBus;
use super::{LcdControl, LCDC_ADDR, LYC_ADDR, STAT_ADDR};

impl GameBoyBus {
    /// LCDC write. Turning the LCD off parks the PPU at LY=0 in mode 0 and
    /// unblocks VRAM/OAM; turning it on restarts the frame from line 0.
    pub(in super::super) fn mmio_write_lcdc(&mut self, value: u8) {
        let was_enabled = self.lcdc().contains(LcdControl::LCD_ENABLE);
        self.memory[LCDC_ADDR as usize] = value;
        let now_enabled = self.lcdc().contains(LcdControl::LCD_ENABLE);

        if was_enabled && !now_enabled {
            log::debug!("GB PPU: LCD off");
            self.ppu_stop();
        } else if !was_enabled && now_enabled {
            log::debug!("GB PPU: LCD on");
            self.ppu_restart();
        }

        self.update_lcd_status();
    }

    /// STAT: only bits 3..6 are writable; bits 0..2 are owned by the PPU.
    pub(in super::super) fn mmio_write_stat(&mut self, value: u8) {
        let current = self.memory[STAT_ADDR as usize];
        self.memory[STAT_ADDR as usize] = (current & !0x78) | (value & 0x78);
        self.update_lcd_status();
    }

    /// LYC: store the compare value and recompute coincidence.
    pub(in super::super) fn mmio_write_lyc(&mut self, value: u8) {
        self.memory[LYC_ADDR as usize] = value;
        self.update_lcd_status();
    }
}
