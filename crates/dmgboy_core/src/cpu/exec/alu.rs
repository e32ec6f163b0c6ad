use crate::{Error, Result};

use crate::cpu::{AluOp, Bus, Cpu, Instr, Operand, RotOp};

impl Cpu {
    /// `ALU A,r` (1 cycle), `ALU A,(HL)` and `ALU A,n` (2 cycles).
    pub(in crate::cpu) fn step_alu<B: Bus>(&mut self, bus: &mut B, stage: u8, op: AluOp) -> Result<bool> {
        let value = match (self.instr.src, stage) {
            (Operand::Reg8(sel), _) => self.regs.get8(sel)?,
            (_, 0) => return Ok(false),
            (Operand::IndHl, _) => self.read_cycle(bus, self.regs.hl())?,
            (Operand::Imm8, _) => self.fetch_cycle(bus)?,
            (other, _) => return Err(Error::InvalidOperand(format!("{op:?} source {other:?}"))),
        };
        self.alu(op, value);
        Ok(true)
    }

    /// `INC r`/`DEC r` (1 cycle) and `INC (HL)`/`DEC (HL)` (3 cycles).
    pub(in crate::cpu) fn step_inc_dec8<B: Bus>(&mut self, bus: &mut B, stage: u8, inc: bool) -> Result<bool> {
        match (self.instr.dst, stage) {
            (Operand::Reg8(sel), _) => {
                let value = self.regs.get8(sel)?;
                let result = self.inc_or_dec8(value, inc);
                self.regs.set8(sel, result)?;
                Ok(true)
            }
            (Operand::IndHl, 0) => Ok(false),
            (Operand::IndHl, 1) => {
                let value = self.read_cycle(bus, self.regs.hl())?;
                self.latch_low(value);
                Ok(false)
            }
            (Operand::IndHl, _) => {
                let result = self.inc_or_dec8(self.latch as u8, inc);
                self.write_cycle(bus, self.regs.hl(), result)?;
                Ok(true)
            }
            (other, _) => Err(Error::InvalidOperand(format!("INC/DEC {other:?}"))),
        }
    }

    fn inc_or_dec8(&mut self, value: u8, inc: bool) -> u8 {
        if inc {
            self.alu_inc8(value)
        } else {
            self.alu_dec8(value)
        }
    }

    /// `INC rr`/`DEC rr`: no flags, one internal cycle.
    pub(in crate::cpu) fn step_inc_dec16<B: Bus>(&mut self, bus: &mut B, stage: u8, inc: bool) -> Result<bool> {
        let Operand::Reg16(pair, context) = self.instr.dst else {
            return Err(Error::InvalidOperand(format!("INC16/DEC16 {:?}", self.instr.dst)));
        };
        if stage == 0 {
            return Ok(false);
        }
        self.idle_cycle(bus)?;
        let value = self.regs.get16(pair, context);
        let result = if inc {
            value.wrapping_add(1)
        } else {
            value.wrapping_sub(1)
        };
        self.regs.set16(pair, context, result);
        Ok(true)
    }

    /// `ADD HL,rr`
    pub(in crate::cpu) fn step_add_hl<B: Bus>(&mut self, bus: &mut B, stage: u8) -> Result<bool> {
        let Operand::Reg16(pair, context) = self.instr.src else {
            return Err(Error::InvalidOperand(format!("ADD HL,{:?}", self.instr.src)));
        };
        if stage == 0 {
            return Ok(false);
        }
        self.idle_cycle(bus)?;
        let value = self.regs.get16(pair, context);
        self.alu_add16_hl(value);
        Ok(true)
    }

    /// `ADD SP,e8`: operand fetch plus two internal cycles.
    pub(in crate::cpu) fn step_add_sp<B: Bus>(&mut self, bus: &mut B, stage: u8) -> Result<bool> {
        match stage {
            0 => Ok(false),
            1 => {
                let offset = self.fetch_cycle(bus)?;
                self.latch_low(offset);
                Ok(false)
            }
            2 => {
                self.idle_cycle(bus)?;
                Ok(false)
            }
            _ => {
                self.idle_cycle(bus)?;
                self.regs.sp = self.alu_add16_signed(self.regs.sp, self.latch as u8);
                Ok(true)
            }
        }
    }

    /// Single-cycle accumulator and flag instructions.
    pub(in crate::cpu) fn step_accumulator(&mut self) -> Result<bool> {
        match self.instr.instr {
            Instr::Rlca => self.alu_rotate_a(RotOp::Rlc),
            Instr::Rrca => self.alu_rotate_a(RotOp::Rrc),
            Instr::Rla => self.alu_rotate_a(RotOp::Rl),
            Instr::Rra => self.alu_rotate_a(RotOp::Rr),
            Instr::Daa => self.alu_daa(),
            Instr::Cpl => self.alu_cpl(),
            Instr::Scf => self.alu_scf(),
            Instr::Ccf => self.alu_ccf(),
            other => {
                return Err(Error::InvalidOperand(format!("{other:?} is not an accumulator op")));
            }
        }
        Ok(true)
    }
}
