use crate::machine::Interrupt;
use crate::{Error, Result};

use super::super::GameBoyBus;
use super::{
    LcdControl, StatSelect, LINES_PER_FRAME, LINE_MCYCLES, LYC_ADDR, LY_ADDR, MODE0_START,
    MODE3_START, STAT_ADDR, VBLANK_LINE,
};

impl GameBoyBus {
    /// Advance the PPU by one machine cycle.
    pub(in super::super) fn ppu_tick(&mut self) -> Result<()> {
        if self.ppu.sprite_fault {
            return Err(Error::UnsupportedSpriteMode);
        }
        if !self.lcdc().contains(LcdControl::LCD_ENABLE) {
            return Ok(());
        }

        self.ppu.line_cycle += 1;
        if self.ppu.line_cycle == LINE_MCYCLES {
            self.ppu.line_cycle = 0;
            self.advance_line();
        }

        if self.ppu.ly < VBLANK_LINE {
            match self.ppu.line_cycle {
                0 => self.ppu.mode = 2,
                MODE3_START => {
                    self.ppu.mode = 3;
                    if let Err(err) = self.render_line() {
                        self.ppu.sprite_fault = true;
                        log::warn!("GB PPU: line {} failed to render: {}", self.ppu.ly, err);
                        return Err(err);
                    }
                }
                MODE0_START => self.ppu.mode = 0,
                _ => {}
            }
        }

        self.update_lcd_status();
        Ok(())
    }

    fn advance_line(&mut self) {
        self.ppu.ly += 1;
        if self.ppu.ly == VBLANK_LINE {
            self.ppu.mode = 1;
            self.ppu.frames += 1;
            self.interrupts.request(Interrupt::VBLANK);
            log::debug!("GB PPU: VBlank, frame {}", self.ppu.frames);
        } else if self.ppu.ly == LINES_PER_FRAME {
            self.ppu.ly = 0;
            self.ppu.window_line = 0;
        }
        self.memory[LY_ADDR as usize] = self.ppu.ly;
    }

    /// Restart the frame at line 0, cycle 0, in mode 2.
    pub(super) fn ppu_restart(&mut self) {
        self.ppu.line_cycle = 0;
        self.ppu.ly = 0;
        self.ppu.mode = 2;
        self.ppu.window_line = 0;
        self.memory[LY_ADDR as usize] = 0;
    }

    /// Park the PPU while the LCD is off: LY=0, mode 0, STAT line low.
    pub(super) fn ppu_stop(&mut self) {
        self.ppu.line_cycle = 0;
        self.ppu.ly = 0;
        self.ppu.mode = 0;
        self.ppu.window_line = 0;
        self.memory[LY_ADDR as usize] = 0;
    }

    /// Recompute STAT's mode and LYC=LY flag and update the STAT interrupt line.
    ///
    /// Called after every PPU cycle and from writes to LCDC/STAT/LYC. The
    /// STAT interrupt is requested on a rising edge of the OR of all enabled
    /// sources.
    pub(in super::super) fn update_lcd_status(&mut self) {
        let ly = self.ppu.ly;
        let lyc = self.memory[LYC_ADDR as usize];
        let lcd_enabled = self.lcdc().contains(LcdControl::LCD_ENABLE);
        let mode = self.ppu.mode;
        let coincidence = ly == lyc;

        // Update STAT bits 0-2 while preserving the interrupt selects.
        let mut stat = self.memory[STAT_ADDR as usize] & 0x78;
        stat |= mode;
        if coincidence {
            stat |= 0x04;
        }
        self.memory[STAT_ADDR as usize] = stat;

        if !lcd_enabled {
            self.ppu.stat_line.reset(false);
            return;
        }

        let select = StatSelect::from_bits_truncate(stat);
        let line = (select.contains(StatSelect::LYC) && coincidence)
            || (select.contains(StatSelect::MODE2) && mode == 2)
            || (select.contains(StatSelect::MODE1) && mode == 1)
            || (select.contains(StatSelect::MODE0) && mode == 0);

        if self.ppu.stat_line.rising(line) {
            self.interrupts.request(Interrupt::STAT);
            log::debug!(
                "GB PPU: STAT IRQ rising edge (STAT=0x{:02X} LY={} mode={})",
                stat,
                ly,
                mode
            );
        }
    }
}
