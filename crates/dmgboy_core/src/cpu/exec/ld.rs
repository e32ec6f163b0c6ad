use crate::{Error, Result};

use crate::cpu::{Bus, Cpu, Operand, PairContext};

impl Cpu {
    /// Resolve a single-cycle memory operand to its address.
    ///
    /// `(HL+)` and `(HL-)` adjust HL as a side effect, so this must only be
    /// called from the stage that performs the access.
    fn indirect_address(&mut self, operand: Operand) -> Result<u16> {
        match operand {
            Operand::IndHl => Ok(self.regs.hl()),
            Operand::HlInc => {
                let hl = self.regs.hl();
                self.regs.set_hl(hl.wrapping_add(1));
                Ok(hl)
            }
            Operand::HlDec => {
                let hl = self.regs.hl();
                self.regs.set_hl(hl.wrapping_sub(1));
                Ok(hl)
            }
            Operand::Indirect(pair) => Ok(self.regs.get16(pair, PairContext::StackPointer)),
            Operand::HighC => Ok(0xFF00 | self.regs.c as u16),
            other => Err(Error::InvalidOperand(format!("{other:?} is not an indirect operand"))),
        }
    }

    /// 8-bit loads between registers, immediates and memory.
    ///
    /// Cycle counts: `LD r,r` 1, `LD r,(rr)`/`LD (rr),r` 2, `LD r,n` 2,
    /// `LD (HL),n` 3, `LDH` 3, `LD (nn),A`/`LD A,(nn)` 4.
    pub(in crate::cpu) fn step_ld8<B: Bus>(&mut self, bus: &mut B, stage: u8) -> Result<bool> {
        let (dst, src) = (self.instr.dst, self.instr.src);
        match (dst, src) {
            (Operand::Reg8(d), Operand::Reg8(s)) => {
                let value = self.regs.get8(s)?;
                self.regs.set8(d, value)?;
                Ok(true)
            }
            (_, _) if stage == 0 => Ok(false),

            (Operand::Reg8(d), Operand::Imm8) => {
                let value = self.fetch_cycle(bus)?;
                self.regs.set8(d, value)?;
                Ok(true)
            }
            (Operand::IndHl, Operand::Imm8) => match stage {
                1 => {
                    let value = self.fetch_cycle(bus)?;
                    self.latch_low(value);
                    Ok(false)
                }
                _ => {
                    self.write_cycle(bus, self.regs.hl(), self.latch as u8)?;
                    Ok(true)
                }
            },

            (Operand::Reg8(d), Operand::HighImm8) => match stage {
                1 => {
                    let offset = self.fetch_cycle(bus)?;
                    self.latch = 0xFF00 | offset as u16;
                    Ok(false)
                }
                _ => {
                    let value = self.read_cycle(bus, self.latch)?;
                    self.regs.set8(d, value)?;
                    Ok(true)
                }
            },
            (Operand::HighImm8, Operand::Reg8(s)) => match stage {
                1 => {
                    let offset = self.fetch_cycle(bus)?;
                    self.latch = 0xFF00 | offset as u16;
                    Ok(false)
                }
                _ => {
                    let value = self.regs.get8(s)?;
                    self.write_cycle(bus, self.latch, value)?;
                    Ok(true)
                }
            },

            (Operand::Reg8(d), Operand::IndImm16) => match stage {
                1 | 2 => {
                    self.fetch_latch_byte(bus, stage)?;
                    Ok(false)
                }
                _ => {
                    let value = self.read_cycle(bus, self.latch)?;
                    self.regs.set8(d, value)?;
                    Ok(true)
                }
            },
            (Operand::IndImm16, Operand::Reg8(s)) => match stage {
                1 | 2 => {
                    self.fetch_latch_byte(bus, stage)?;
                    Ok(false)
                }
                _ => {
                    let value = self.regs.get8(s)?;
                    self.write_cycle(bus, self.latch, value)?;
                    Ok(true)
                }
            },

            (Operand::Reg8(d), mem) => {
                let addr = self.indirect_address(mem)?;
                let value = self.read_cycle(bus, addr)?;
                self.regs.set8(d, value)?;
                Ok(true)
            }
            (mem, Operand::Reg8(s)) => {
                let value = self.regs.get8(s)?;
                let addr = self.indirect_address(mem)?;
                self.write_cycle(bus, addr, value)?;
                Ok(true)
            }

            (dst, src) => Err(Error::InvalidOperand(format!("LD {dst:?},{src:?}"))),
        }
    }

    /// Fetch the low (stage 1) or high (stage 2) byte of a 16-bit immediate.
    pub(in crate::cpu) fn fetch_latch_byte<B: Bus>(&mut self, bus: &mut B, stage: u8) -> Result<()> {
        let value = self.fetch_cycle(bus)?;
        if stage == 1 {
            self.latch_low(value);
        } else {
            self.latch_high(value);
        }
        Ok(())
    }

    /// `LD rr,nn`
    pub(in crate::cpu) fn step_ld16<B: Bus>(&mut self, bus: &mut B, stage: u8) -> Result<bool> {
        let Operand::Reg16(pair, context) = self.instr.dst else {
            return Err(Error::InvalidOperand(format!("LD16 into {:?}", self.instr.dst)));
        };
        match stage {
            0 => Ok(false),
            1 => {
                self.fetch_latch_byte(bus, 1)?;
                Ok(false)
            }
            _ => {
                self.fetch_latch_byte(bus, 2)?;
                self.regs.set16(pair, context, self.latch);
                Ok(true)
            }
        }
    }

    /// `LD (nn),SP`: five cycles, low byte first.
    pub(in crate::cpu) fn step_ld_imm16_sp<B: Bus>(&mut self, bus: &mut B, stage: u8) -> Result<bool> {
        match stage {
            0 => Ok(false),
            1 | 2 => {
                self.fetch_latch_byte(bus, stage)?;
                Ok(false)
            }
            3 => {
                self.write_cycle(bus, self.latch, self.regs.sp as u8)?;
                Ok(false)
            }
            _ => {
                self.write_cycle(bus, self.latch.wrapping_add(1), (self.regs.sp >> 8) as u8)?;
                Ok(true)
            }
        }
    }

    /// `LD SP,HL`
    pub(in crate::cpu) fn step_ld_sp_hl<B: Bus>(&mut self, bus: &mut B, stage: u8) -> Result<bool> {
        if stage == 0 {
            return Ok(false);
        }
        self.idle_cycle(bus)?;
        self.regs.sp = self.regs.hl();
        Ok(true)
    }

    /// `LD HL,SP+e8`
    pub(in crate::cpu) fn step_ld_hl_sp_offset<B: Bus>(&mut self, bus: &mut B, stage: u8) -> Result<bool> {
        match stage {
            0 => Ok(false),
            1 => {
                let offset = self.fetch_cycle(bus)?;
                self.latch_low(offset);
                Ok(false)
            }
            _ => {
                self.idle_cycle(bus)?;
                let result = self.alu_add16_signed(self.regs.sp, self.latch as u8);
                self.regs.set_hl(result);
                Ok(true)
            }
        }
    }
}
