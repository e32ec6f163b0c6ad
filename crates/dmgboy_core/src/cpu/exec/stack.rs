use crate::{Error, Result};

use crate::cpu::{Bus, Cpu, Operand};

impl Cpu {
    /// `PUSH rr`: one internal cycle, then high byte and low byte.
    pub(in crate::cpu) fn step_push<B: Bus>(&mut self, bus: &mut B, stage: u8) -> Result<bool> {
        let Operand::Reg16(pair, context) = self.instr.src else {
            return Err(Error::InvalidOperand(format!("PUSH {:?}", self.instr.src)));
        };
        match stage {
            0 => Ok(false),
            1 => {
                self.idle_cycle(bus)?;
                self.latch = self.regs.get16(pair, context);
                Ok(false)
            }
            2 => {
                self.push_cycle(bus, (self.latch >> 8) as u8)?;
                Ok(false)
            }
            _ => {
                self.push_cycle(bus, self.latch as u8)?;
                Ok(true)
            }
        }
    }

    /// `POP rr`; popping into AF clears the low nibble of F.
    pub(in crate::cpu) fn step_pop<B: Bus>(&mut self, bus: &mut B, stage: u8) -> Result<bool> {
        let Operand::Reg16(pair, context) = self.instr.dst else {
            return Err(Error::InvalidOperand(format!("POP {:?}", self.instr.dst)));
        };
        match stage {
            0 => Ok(false),
            1 => {
                let low = self.pop_cycle(bus)?;
                self.latch_low(low);
                Ok(false)
            }
            _ => {
                let high = self.pop_cycle(bus)?;
                self.latch_high(high);
                self.regs.set16(pair, context, self.latch);
                Ok(true)
            }
        }
    }

    /// Push the current PC over two cycles (`which` 0 = high, 1 = low).
    pub(in crate::cpu) fn push_pc_byte<B: Bus>(&mut self, bus: &mut B, which: u8) -> Result<()> {
        let pc = self.regs.pc;
        if which == 0 {
            self.push_cycle(bus, (pc >> 8) as u8)
        } else {
            self.push_cycle(bus, pc as u8)
        }
    }
}
