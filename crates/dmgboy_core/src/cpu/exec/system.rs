use crate::{Error, Result};

use crate::cpu::{Bus, Cpu, CpuStatus};

impl Cpu {
    /// `HALT`
    ///
    /// With IME clear and an interrupt already pending the CPU does not
    /// halt; instead the next opcode fetch fails to advance PC.
    pub(in crate::cpu) fn step_halt<B: Bus>(&mut self, bus: &mut B) -> Result<bool> {
        if !self.ime && self.pending_interrupts(bus) != 0 {
            log::debug!("GB CPU HALT bug at pc=0x{:04X}", self.opcode_pc);
            self.halt_bug = true;
        } else {
            self.status = CpuStatus::Halt;
        }
        Ok(true)
    }

    /// `STOP`: the padding byte after the opcode is skipped without a read.
    pub(in crate::cpu) fn step_stop(&mut self) -> Result<bool> {
        self.regs.pc = self.regs.pc.wrapping_add(1);
        self.status = CpuStatus::Stop;
        log::debug!("GB CPU STOP at pc=0x{:04X}", self.opcode_pc);
        Ok(true)
    }

    pub(in crate::cpu) fn step_di(&mut self) -> Result<bool> {
        self.ime = false;
        self.ime_pending = false;
        Ok(true)
    }

    pub(in crate::cpu) fn step_ei(&mut self) -> Result<bool> {
        self.ime_pending = true;
        Ok(true)
    }

    /// Enter the terminal HUNG state for the opcode in flight.
    pub(in crate::cpu) fn hang(&mut self) -> Error {
        log::warn!(
            "GB CPU hung on invalid opcode 0x{:02X} at pc=0x{:04X}",
            self.opcode,
            self.opcode_pc
        );
        self.status = CpuStatus::Hung;
        self.hung_at = Some((self.opcode, self.opcode_pc));
        self.hung_error()
    }

    pub(in crate::cpu) fn hung_error(&self) -> Error {
        let (opcode, pc) = self.hung_at.unwrap_or((self.opcode, self.opcode_pc));
        Error::InvalidOpcode { opcode, pc }
    }
}
