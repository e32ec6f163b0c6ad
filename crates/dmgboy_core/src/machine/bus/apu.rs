use super::GameBoyBus;

/// Bits that read back as 1 for each register in 0xFF10..0xFF2F.
///
/// Write-only fields and unused bits are set; wave RAM (0xFF30..0xFF3F)
/// reads back unmasked.
const READ_MASKS: [u8; 0x20] = [
    0x80, 0x3F, 0x00, 0xFF, 0xBF, // NR10-NR14
    0xFF, 0x3F, 0x00, 0xFF, 0xBF, // unused, NR21-NR24
    0x7F, 0xFF, 0x9F, 0xFF, 0xBF, // NR30-NR34
    0xFF, 0xFF, 0x00, 0x00, 0xBF, // unused, NR41-NR44
    0x00, 0x00, 0x70, // NR50, NR51, NR52
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, // unused
];

const NR52: u16 = 0xFF26;

impl GameBoyBus {
    /// Check whether the APU is currently powered on.
    ///
    /// This is controlled by NR52 (FF26) bit 7 ("Audio on/off"). When the APU
    /// is off, the channel and global audio registers become read-only from
    /// the CPU's point of view.
    pub(super) fn apu_enabled(&self) -> bool {
        (self.memory[NR52 as usize] & 0x80) != 0
    }

    pub(super) fn read_apu_register(&self, addr: u16) -> u8 {
        let value = self.memory[addr as usize];
        match addr {
            0xFF10..=0xFF2F => value | READ_MASKS[(addr - 0xFF10) as usize],
            _ => value,
        }
    }

    pub(super) fn write_apu_register(&mut self, addr: u16, value: u8) {
        match addr {
            0xFF10..=0xFF25 => {
                if self.apu_enabled() {
                    self.memory[addr as usize] = value;
                }
            }
            NR52 => self.write_nr52(value),
            // Wave RAM stays accessible regardless of power.
            0xFF30..=0xFF3F => self.memory[addr as usize] = value,
            _ => {}
        }
    }

    fn write_nr52(&mut self, value: u8) {
        // Only bit 7 (Audio on/off) is writable. Turning audio off clears
        // all APU registers, channel status bits included.
        let was_on = self.apu_enabled();
        let new_on = (value & 0x80) != 0;

        if was_on && !new_on {
            for a in 0xFF10..=0xFF25usize {
                self.memory[a] = 0x00;
            }
            self.memory[NR52 as usize] = 0x00;
            log::debug!("GB APU: powered off");
        }

        let mut reg = self.memory[NR52 as usize];
        if new_on {
            reg |= 0x80;
        } else {
            reg &= !0x80;
        }
        self.memory[NR52 as usize] = reg;
    }
}
