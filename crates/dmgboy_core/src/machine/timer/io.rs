use super::Timer;

impl Timer {
    pub(in super::super) fn read(&self, addr: u16) -> u8 {
        match addr {
            0xFF04 => (self.internal_counter >> 6) as u8,
            0xFF05 => self.tima,
            0xFF06 => self.tma,
            _ => self.tac | 0b1111_1000,
        }
    }

    pub(in super::super) fn write(&mut self, addr: u16, value: u8) {
        match addr {
            0xFF04 => self.div_write(),
            0xFF05 => self.tima_write(value),
            0xFF06 => self.tma_write(value),
            _ => self.tac_write(value),
        }
    }

    /// Writing any value to DIV resets the internal counter. When the
    /// selected bit was high this is a falling edge and TIMA ticks once.
    fn div_write(&mut self) {
        self.internal_counter = 0;
        self.sample_input();
    }

    /// A write during the overflow cycle cancels the pending reload and
    /// interrupt; a write during the reload cycle itself is lost.
    fn tima_write(&mut self, value: u8) {
        if self.reloaded {
            return;
        }
        self.reload_pending = false;
        self.tima = value;
    }

    fn tma_write(&mut self, value: u8) {
        self.tma = value;
        if self.reloaded {
            self.tima = value;
        }
    }

    /// Disabling the timer or switching the clock source while the selected
    /// input bit is 1 triggers a single TIMA increment.
    fn tac_write(&mut self, value: u8) {
        self.tac = value & 0x07;
        self.sample_input();
    }
}
