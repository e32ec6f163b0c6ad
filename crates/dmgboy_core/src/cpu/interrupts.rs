use crate::machine::Interrupt;
use crate::Result;

use super::{Bus, Cpu};

const IF_ADDR: u16 = 0xFF0F;

impl Cpu {
    /// Interrupt acknowledge sequence, five machine cycles in total.
    ///
    /// IME is cleared first, then two internal cycles, the two PC pushes and
    /// a final internal cycle. The vector is chosen from IE & IF as they
    /// stand after the pushes, so a push landing on IE (SP wrapping through
    /// 0xFFFF) can retarget or cancel the dispatch; a cancelled dispatch
    /// jumps to 0x0000.
    pub(super) fn service_interrupt<B: Bus>(&mut self, bus: &mut B) -> Result<()> {
        self.ime = false;
        self.ime_pending = false;

        // `EI; HALT` with an interrupt already pending: the handler returns
        // to the HALT itself.
        if self.halt_bug {
            self.halt_bug = false;
            self.regs.pc = self.regs.pc.wrapping_sub(1);
        }

        let pc = self.regs.pc;
        self.idle_cycle(bus)?;
        self.idle_cycle(bus)?;
        self.push_pc_byte(bus, 0)?;
        self.push_pc_byte(bus, 1)?;

        match Interrupt::highest_priority(self.pending_interrupts(bus)) {
            None => {
                log::debug!("GB CPU interrupt dispatch cancelled at pc=0x{:04X}", pc);
                self.regs.pc = 0x0000;
            }
            Some((index, vector)) => {
                let iflags = bus.read8(IF_ADDR);
                bus.write8(IF_ADDR, iflags & !(1 << index));
                log::debug!(
                    "GB CPU interrupt: idx={} vector=0x{:04X} pc=0x{:04X} sp=0x{:04X} IF=0x{:02X}",
                    index,
                    vector,
                    pc,
                    self.regs.sp,
                    iflags & 0x1F,
                );
                self.regs.pc = vector;
            }
        }

        self.idle_cycle(bus)
    }
}
