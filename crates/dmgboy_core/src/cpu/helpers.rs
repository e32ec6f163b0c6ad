use crate::Result;

use super::{Bus, Condition, Cpu, Flag};

impl Cpu {
    /// Perform a single bus read cycle at the given address.
    ///
    /// The rest of the machine advances by one machine cycle first, so the
    /// read observes this cycle's DMA and PPU state.
    #[inline]
    pub(super) fn read_cycle<B: Bus>(&mut self, bus: &mut B, addr: u16) -> Result<u8> {
        self.mcycles += 1;
        bus.tick_mcycle()?;
        Ok(bus.read8(addr))
    }

    /// Perform a single bus write cycle at the given address.
    #[inline]
    pub(super) fn write_cycle<B: Bus>(&mut self, bus: &mut B, addr: u16, value: u8) -> Result<()> {
        self.mcycles += 1;
        bus.tick_mcycle()?;
        bus.write8(addr, value);
        Ok(())
    }

    /// Internal machine cycle without a memory access.
    #[inline]
    pub(super) fn idle_cycle<B: Bus>(&mut self, bus: &mut B) -> Result<()> {
        self.mcycles += 1;
        bus.tick_mcycle()
    }

    /// Read the byte at PC as an immediate operand and advance PC.
    #[inline]
    pub(super) fn fetch_cycle<B: Bus>(&mut self, bus: &mut B) -> Result<u8> {
        let value = self.read_cycle(bus, self.regs.pc)?;
        self.regs.pc = self.regs.pc.wrapping_add(1);
        Ok(value)
    }

    /// Opcode fetch cycle, honouring a pending HALT bug.
    pub(super) fn fetch_opcode<B: Bus>(&mut self, bus: &mut B) -> Result<u8> {
        let value = self.read_cycle(bus, self.regs.pc)?;
        if self.halt_bug {
            // HALT bug: the first opcode fetch after the bug does not
            // increment PC. We consume the bug here.
            self.halt_bug = false;
        } else {
            self.regs.pc = self.regs.pc.wrapping_add(1);
        }
        Ok(value)
    }

    /// Decrement SP and write one byte of a push.
    #[inline]
    pub(super) fn push_cycle<B: Bus>(&mut self, bus: &mut B, value: u8) -> Result<()> {
        self.regs.sp = self.regs.sp.wrapping_sub(1);
        self.write_cycle(bus, self.regs.sp, value)
    }

    /// Read one byte of a pop and increment SP.
    #[inline]
    pub(super) fn pop_cycle<B: Bus>(&mut self, bus: &mut B) -> Result<u8> {
        let value = self.read_cycle(bus, self.regs.sp)?;
        self.regs.sp = self.regs.sp.wrapping_add(1);
        Ok(value)
    }

    #[inline]
    pub(super) fn latch_low(&mut self, value: u8) {
        self.latch = (self.latch & 0xFF00) | value as u16;
    }

    #[inline]
    pub(super) fn latch_high(&mut self, value: u8) {
        self.latch = ((value as u16) << 8) | (self.latch & 0x00FF);
    }

    /// Interrupt sources that are both requested (IF) and enabled (IE).
    ///
    /// These are plain register reads and do not spend a machine cycle.
    #[inline]
    pub(super) fn pending_interrupts<B: Bus>(&self, bus: &mut B) -> u8 {
        bus.read8(0xFFFF) & bus.read8(0xFF0F) & 0x1F
    }

    pub(super) fn condition(&self, cond: Condition) -> bool {
        match cond {
            Condition::Always => true,
            Condition::NotZero => !self.regs.flag(Flag::Z),
            Condition::Zero => self.regs.flag(Flag::Z),
            Condition::NotCarry => !self.regs.flag(Flag::C),
            Condition::Carry => self.regs.flag(Flag::C),
        }
    }
}
