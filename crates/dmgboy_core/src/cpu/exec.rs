mod alu;
mod cb;
mod control;
mod ld;
mod stack;
mod system;

use crate::Result;

use super::opcodes::{self, Instr};
use super::{Bus, Cpu, CpuStatus};

impl Cpu {
    /// Execute one unit of work and return the machine cycles it consumed.
    ///
    /// A unit is one instruction, one interrupt dispatch, or one parked
    /// cycle while halted or stopped. Once the CPU has hung every call
    /// reports the invalid opcode again without touching the bus.
    pub fn step<B: Bus>(&mut self, bus: &mut B) -> Result<u32> {
        let start = self.mcycles;

        match self.status {
            CpuStatus::Hung => return Err(self.hung_error()),
            CpuStatus::Halt | CpuStatus::Stop => {
                self.idle_cycle(bus)?;
                // Wake-up ignores IME; dispatch (if any) happens on the
                // next call.
                if self.pending_interrupts(bus) != 0 {
                    log::debug!("GB CPU wake from {:?} at pc=0x{:04X}", self.status, self.regs.pc);
                    self.status = CpuStatus::Okay;
                }
                return Ok(self.cycles_since(start));
            }
            CpuStatus::Okay => {}
        }

        if self.ime && self.pending_interrupts(bus) != 0 {
            self.service_interrupt(bus)?;
            return Ok(self.cycles_since(start));
        }

        // EI takes effect after the instruction that follows it.
        let enable_after = self.ime_pending;

        self.opcode_pc = self.regs.pc;
        self.opcode = self.fetch_opcode(bus)?;
        self.instr = opcodes::lookup(self.opcode);

        let mut stage = 0u8;
        while !self.execute(bus, stage)? {
            stage += 1;
        }

        if enable_after && self.ime_pending {
            self.ime = true;
            self.ime_pending = false;
        }

        Ok(self.cycles_since(start))
    }

    /// Run stage `stage` of the unprefixed instruction in flight.
    ///
    /// Returns `true` once the instruction has retired.
    fn execute<B: Bus>(&mut self, bus: &mut B, stage: u8) -> Result<bool> {
        match self.instr.instr {
            Instr::Nop => Ok(true),
            Instr::Ld8 => self.step_ld8(bus, stage),
            Instr::Ld16 => self.step_ld16(bus, stage),
            Instr::LdImm16Sp => self.step_ld_imm16_sp(bus, stage),
            Instr::LdSpHl => self.step_ld_sp_hl(bus, stage),
            Instr::LdHlSpOffset => self.step_ld_hl_sp_offset(bus, stage),
            Instr::Push => self.step_push(bus, stage),
            Instr::Pop => self.step_pop(bus, stage),
            Instr::Alu(op) => self.step_alu(bus, stage, op),
            Instr::Inc8 => self.step_inc_dec8(bus, stage, true),
            Instr::Dec8 => self.step_inc_dec8(bus, stage, false),
            Instr::Inc16 => self.step_inc_dec16(bus, stage, true),
            Instr::Dec16 => self.step_inc_dec16(bus, stage, false),
            Instr::AddHl => self.step_add_hl(bus, stage),
            Instr::AddSp => self.step_add_sp(bus, stage),
            Instr::Jr => self.step_jr(bus, stage),
            Instr::Jp => self.step_jp(bus, stage),
            Instr::JpHl => self.step_jp_hl(),
            Instr::Call => self.step_call(bus, stage),
            Instr::Ret => self.step_ret(bus, stage),
            Instr::Reti => self.step_reti(bus, stage),
            Instr::Rst => self.step_rst(bus, stage),
            Instr::Rlca
            | Instr::Rrca
            | Instr::Rla
            | Instr::Rra
            | Instr::Daa
            | Instr::Cpl
            | Instr::Scf
            | Instr::Ccf => self.step_accumulator(),
            Instr::Halt => self.step_halt(bus),
            Instr::Stop => self.step_stop(),
            Instr::Di => self.step_di(),
            Instr::Ei => self.step_ei(),
            Instr::Prefix => self.step_prefix(bus, stage),
            Instr::Invalid => Err(self.hang()),
            Instr::Rotate(_) | Instr::Bit | Instr::Res | Instr::Set => {
                Err(crate::Error::InvalidOperand(format!(
                    "{:?} is only reachable through the 0xCB prefix",
                    self.instr.instr
                )))
            }
        }
    }

    #[inline]
    fn cycles_since(&self, start: u64) -> u32 {
        (self.mcycles - start) as u32
    }
}
