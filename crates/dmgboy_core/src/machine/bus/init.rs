use super::GameBoyBus;

impl GameBoyBus {
    /// Initialize I/O registers to match the DMG state after the boot ROM
    /// hands control to the cartridge at 0x0100.
    pub(super) fn apply_dmg_initial_io_state(&mut self) {
        self.joyp_select = 0x30;

        // Serial.
        self.serial.sb = 0x00;
        self.serial.sc = 0x00;

        // Divider / timer.
        self.timer.init_dmg();

        // IF's upper 3 bits always read as 1 on DMG; the hardware happens
        // to have bit 0 set at PC=0x0100 as well (VBlank request).
        self.interrupts.write_flags(0x01);
        self.interrupts.write_enable(0x00);

        // Sound registers (no synthesis, but the values are visible).
        const APU_POST_BOOT: [(u16, u8); 21] = [
            (0xFF10, 0x80),
            (0xFF11, 0xBF),
            (0xFF12, 0xF3),
            (0xFF13, 0xFF),
            (0xFF14, 0xBF),
            (0xFF16, 0x3F),
            (0xFF17, 0x00),
            (0xFF18, 0xFF),
            (0xFF19, 0xBF),
            (0xFF1A, 0x7F),
            (0xFF1B, 0xFF),
            (0xFF1C, 0x9F),
            (0xFF1D, 0xFF),
            (0xFF1E, 0xBF),
            (0xFF20, 0xFF),
            (0xFF21, 0x00),
            (0xFF22, 0x00),
            (0xFF23, 0xBF),
            (0xFF24, 0x77),
            (0xFF25, 0xF3),
            (0xFF26, 0xF1),
        ];
        for (addr, value) in APU_POST_BOOT {
            self.memory[addr as usize] = value;
        }

        // PPU registers.
        self.memory[0xFF42] = 0x00; // SCY
        self.memory[0xFF43] = 0x00; // SCX
        self.memory[0xFF45] = 0x00; // LYC
        self.memory[0xFF46] = 0xFF; // DMA
        self.memory[0xFF47] = 0xFC; // BGP
        self.memory[0xFF4A] = 0x00; // WY
        self.memory[0xFF4B] = 0x00; // WX
        self.mmio_write_lcdc(0x91);
    }

    /// Raw power-on state used when a boot ROM runs first: everything the
    /// boot ROM would set is left at zero and the LCD is off.
    pub(super) fn apply_power_on_io_state(&mut self) {
        self.joyp_select = 0x30;
        self.timer = super::Timer::new();
        self.interrupts.write_flags(0x00);
        self.interrupts.write_enable(0x00);
        self.mmio_write_lcdc(0x00);
    }

    /// Fill internal WRAM and HRAM with pseudo‑random bytes.
    ///
    /// These RAM areas contain "random" data at power‑on. For
    /// reproducibility we use a fixed‑seed xorshift PRNG rather than true
    /// randomness, so runs stay deterministic while code cannot rely on an
    /// all-zero pattern.
    pub(super) fn randomize_internal_ram(&mut self) {
        // Simple xorshift32 PRNG.
        let mut x: u32 = 0xC0DE_1234;
        let mut next_byte = || {
            x ^= x << 13;
            x ^= x >> 17;
            x ^= x << 5;
            x as u8
        };

        // WRAM: 0xC000–0xDFFF.
        for addr in 0xC000..=0xDFFF {
            self.memory[addr] = next_byte();
        }

        // HRAM: 0xFF80–0xFFFE (IE at 0xFFFF is handled separately).
        for addr in 0xFF80..=0xFFFE {
            self.memory[addr] = next_byte();
        }
    }
}
