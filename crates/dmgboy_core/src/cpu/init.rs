use super::opcodes::Opcode;
use super::{Cpu, CpuStatus, Registers};

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

impl Cpu {
    /// CPU as the DMG boot ROM leaves it when jumping to 0x0100.
    pub fn new() -> Self {
        let mut cpu = Self::blank();
        cpu.apply_dmg_boot_state();
        cpu
    }

    /// CPU at power-on, about to run a boot ROM from 0x0000.
    pub fn with_boot_rom() -> Self {
        Self::blank()
    }

    fn blank() -> Self {
        Self {
            regs: Registers::default(),
            ime: false,
            ime_pending: false,
            status: CpuStatus::Okay,
            halt_bug: false,
            hung_at: None,
            opcode: 0,
            opcode_pc: 0,
            instr: Opcode::INVALID,
            cb_instr: Opcode::INVALID,
            latch: 0,
            cond_taken: false,
            mcycles: 0,
        }
    }

    /// Initialize registers to match the DMG boot ROM's state after it
    /// hands control to cartridge code.
    fn apply_dmg_boot_state(&mut self) {
        self.regs.a = 0x01;
        self.regs.f = 0xB0;
        self.regs.b = 0x00;
        self.regs.c = 0x13;
        self.regs.d = 0x00;
        self.regs.e = 0xD8;
        self.regs.h = 0x01;
        self.regs.l = 0x4D;
        self.regs.sp = 0xFFFE;
        self.regs.pc = 0x0100;

        // Cartridge code starts with IME clear.
        self.ime = false;
    }

    pub fn status(&self) -> CpuStatus {
        self.status
    }

    /// Machine cycles consumed since power-on.
    pub fn mcycles(&self) -> u64 {
        self.mcycles
    }

    /// Opcode and address of the invalid instruction, once hung.
    pub fn hung_at(&self) -> Option<(u8, u16)> {
        self.hung_at
    }
}
