/// Serial port modelled via SB/SC with no link partner.
///
/// A transfer started with the internal clock (SC bits 7 and 0 set)
/// completes immediately: SB is appended to `output`, the "other side"
/// shifts in 0xFF, the start bit clears and the caller raises INT $58.
#[derive(Default)]
pub(crate) struct Serial {
    pub(crate) sb: u8,
    pub(crate) sc: u8,
    pub(crate) output: Vec<u8>,
}

impl Serial {
    pub(super) fn read_sc(&self) -> u8 {
        self.sc | 0b0111_1110
    }

    pub(super) fn write_sb(&mut self, value: u8) {
        self.sb = value;
    }

    /// Returns true when a transfer completed and the serial interrupt
    /// should be requested.
    pub(super) fn write_sc(&mut self, value: u8) -> bool {
        self.sc = value & 0x81;
        // Internal clock & start bit set?
        if (self.sc & 0x81) == 0x81 {
            self.output.push(self.sb);
            self.sb = 0xFF;
            self.sc &= !0x80;
            return true;
        }
        false
    }
}
