use crate::{Error, Result};

use crate::cpu::opcodes;
use crate::cpu::{Bus, Cpu, Instr, Operand};

impl Cpu {
    /// `0xCB`: fetch the extension opcode at stage 1, then run the CB
    /// instruction with its stages shifted down by one.
    pub(in crate::cpu) fn step_prefix<B: Bus>(&mut self, bus: &mut B, stage: u8) -> Result<bool> {
        match stage {
            0 => Ok(false),
            1 => {
                let opcode = self.fetch_cycle(bus)?;
                self.cb_instr = opcodes::lookup_cb(opcode);
                self.execute_cb(bus, 0)
            }
            _ => self.execute_cb(bus, stage - 1),
        }
    }

    /// Register forms retire at stage 0; `BIT b,(HL)` reads once and the
    /// read-modify-write forms read then write.
    fn execute_cb<B: Bus>(&mut self, bus: &mut B, stage: u8) -> Result<bool> {
        let op = self.cb_instr;
        let (target, bit) = match op.instr {
            Instr::Bit => (op.src, bit_index(op.dst)?),
            Instr::Res | Instr::Set => (op.dst, bit_index(op.src)?),
            Instr::Rotate(_) => (op.dst, 0),
            other => {
                return Err(Error::InvalidOperand(format!("{other:?} in the CB table")));
            }
        };

        match (target, stage) {
            (Operand::Reg8(sel), _) => {
                let value = self.regs.get8(sel)?;
                if let Some(result) = self.apply_cb(value, bit) {
                    self.regs.set8(sel, result)?;
                }
                Ok(true)
            }
            (Operand::IndHl, 0) => Ok(false),
            (Operand::IndHl, 1) => {
                let value = self.read_cycle(bus, self.regs.hl())?;
                match self.apply_cb(value, bit) {
                    Some(result) => {
                        self.latch_low(result);
                        Ok(false)
                    }
                    None => Ok(true),
                }
            }
            (Operand::IndHl, _) => {
                self.write_cycle(bus, self.regs.hl(), self.latch as u8)?;
                Ok(true)
            }
            (other, _) => Err(Error::InvalidOperand(format!("CB operand {other:?}"))),
        }
    }

    /// Compute the CB operation; `None` means nothing is written back.
    fn apply_cb(&mut self, value: u8, bit: u8) -> Option<u8> {
        match self.cb_instr.instr {
            Instr::Rotate(op) => Some(self.alu_rotate(op, value)),
            Instr::Bit => {
                self.alu_bit(bit, value);
                None
            }
            Instr::Res => Some(value & !(1 << bit)),
            Instr::Set => Some(value | (1 << bit)),
            _ => None,
        }
    }
}

fn bit_index(operand: Operand) -> Result<u8> {
    match operand {
        Operand::Bit(bit) => Ok(bit),
        other => Err(Error::InvalidOperand(format!("{other:?} is not a bit index"))),
    }
}
