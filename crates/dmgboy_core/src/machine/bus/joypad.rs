use super::GameBoyBus;
use crate::machine::Interrupt;

impl GameBoyBus {
    pub(super) fn read_joyp(&self) -> u8 {
        // Bits 7-6 always read as 1 on DMG.
        let mut result = 0xC0;
        // Bits 5 (buttons) and 4 (d-pad) are selection bits; 0 selects.
        let select = self.joyp_select & 0x30;
        result |= select;

        // Lower nibble is read-only. A pressed button is observed as 0.
        let mut low = 0x0F;
        if (select & 0x10) == 0 {
            low &= self.joyp_keys & 0x0F;
        }
        if (select & 0x20) == 0 {
            low &= self.joyp_keys >> 4;
        }
        result | low
    }

    pub(super) fn write_joyp(&mut self, value: u8) {
        // Only bits 5 and 4 are writable; lower nibble is read-only.
        self.joyp_select = value & 0x30;
    }

    /// Replace the key state (active low). A key that goes from released to
    /// pressed requests the joypad interrupt.
    pub(crate) fn set_keys(&mut self, keys: u8) {
        let newly_pressed = self.joyp_keys & !keys;
        self.joyp_keys = keys;
        if newly_pressed != 0 {
            log::debug!("GB joypad: keys=0x{:02X} pressed=0x{:02X}", keys, newly_pressed);
            self.interrupts.request(Interrupt::JOYPAD);
        }
    }
}
