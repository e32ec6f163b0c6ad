use crate::{Error, Result};

use crate::cpu::{Bus, Condition, Cpu, Operand};

impl Cpu {
    fn branch_condition(&self) -> Result<Condition> {
        match self.instr.dst {
            Operand::Cond(cond) => Ok(cond),
            other => Err(Error::InvalidOperand(format!("{other:?} is not a branch condition"))),
        }
    }

    /// `JR cc,e8`: 3 cycles taken, 2 not taken.
    pub(in crate::cpu) fn step_jr<B: Bus>(&mut self, bus: &mut B, stage: u8) -> Result<bool> {
        match stage {
            0 => {
                self.cond_taken = self.condition(self.branch_condition()?);
                Ok(false)
            }
            1 => {
                let offset = self.fetch_cycle(bus)?;
                self.latch_low(offset);
                Ok(!self.cond_taken)
            }
            _ => {
                self.idle_cycle(bus)?;
                let offset = self.latch as u8 as i8 as i16 as u16;
                self.regs.pc = self.regs.pc.wrapping_add(offset);
                Ok(true)
            }
        }
    }

    /// `JP cc,nn`: 4 cycles taken, 3 not taken.
    pub(in crate::cpu) fn step_jp<B: Bus>(&mut self, bus: &mut B, stage: u8) -> Result<bool> {
        match stage {
            0 => {
                self.cond_taken = self.condition(self.branch_condition()?);
                Ok(false)
            }
            1 => {
                self.fetch_latch_byte(bus, 1)?;
                Ok(false)
            }
            2 => {
                self.fetch_latch_byte(bus, 2)?;
                Ok(!self.cond_taken)
            }
            _ => {
                self.idle_cycle(bus)?;
                self.regs.pc = self.latch;
                Ok(true)
            }
        }
    }

    /// `JP HL`
    pub(in crate::cpu) fn step_jp_hl(&mut self) -> Result<bool> {
        self.regs.pc = self.regs.hl();
        Ok(true)
    }

    /// `CALL cc,nn`: 6 cycles taken, 3 not taken.
    pub(in crate::cpu) fn step_call<B: Bus>(&mut self, bus: &mut B, stage: u8) -> Result<bool> {
        match stage {
            0 => {
                self.cond_taken = self.condition(self.branch_condition()?);
                Ok(false)
            }
            1 => {
                self.fetch_latch_byte(bus, 1)?;
                Ok(false)
            }
            2 => {
                self.fetch_latch_byte(bus, 2)?;
                Ok(!self.cond_taken)
            }
            3 => {
                self.idle_cycle(bus)?;
                Ok(false)
            }
            4 => {
                self.push_pc_byte(bus, 0)?;
                Ok(false)
            }
            _ => {
                self.push_pc_byte(bus, 1)?;
                self.regs.pc = self.latch;
                Ok(true)
            }
        }
    }

    /// `RET` (4 cycles) and `RET cc` (5 cycles taken, 2 not taken).
    ///
    /// The conditional form spends an internal cycle evaluating the
    /// condition before the pops.
    pub(in crate::cpu) fn step_ret<B: Bus>(&mut self, bus: &mut B, stage: u8) -> Result<bool> {
        let cond = self.branch_condition()?;
        if stage == 0 {
            return Ok(false);
        }
        let pop_stage = if cond == Condition::Always {
            stage
        } else if stage == 1 {
            self.idle_cycle(bus)?;
            self.cond_taken = self.condition(cond);
            return Ok(!self.cond_taken);
        } else {
            stage - 1
        };
        self.step_pop_pc(bus, pop_stage)
    }

    /// `RETI`: like `RET` but IME is set immediately, with no delay.
    pub(in crate::cpu) fn step_reti<B: Bus>(&mut self, bus: &mut B, stage: u8) -> Result<bool> {
        if stage == 0 {
            return Ok(false);
        }
        let done = self.step_pop_pc(bus, stage)?;
        if done {
            self.ime = true;
            self.ime_pending = false;
        }
        Ok(done)
    }

    /// Shared tail of the returns: pop low, pop high, internal cycle.
    fn step_pop_pc<B: Bus>(&mut self, bus: &mut B, stage: u8) -> Result<bool> {
        match stage {
            1 => {
                let low = self.pop_cycle(bus)?;
                self.latch_low(low);
                Ok(false)
            }
            2 => {
                let high = self.pop_cycle(bus)?;
                self.latch_high(high);
                Ok(false)
            }
            _ => {
                self.idle_cycle(bus)?;
                self.regs.pc = self.latch;
                Ok(true)
            }
        }
    }

    /// `RST n`
    pub(in crate::cpu) fn step_rst<B: Bus>(&mut self, bus: &mut B, stage: u8) -> Result<bool> {
        let Operand::Vector(vector) = self.instr.dst else {
            return Err(Error::InvalidOperand(format!("RST {:?}", self.instr.dst)));
        };
        match stage {
            0 => Ok(false),
            1 => {
                self.idle_cycle(bus)?;
                Ok(false)
            }
            2 => {
                self.push_pc_byte(bus, 0)?;
                Ok(false)
            }
            _ => {
                self.push_pc_byte(bus, 1)?;
                self.regs.pc = vector as u16;
                Ok(true)
            }
        }
    }
}
