/// Timer / divider unit.
///
/// A free-running 16-bit counter advances once per machine cycle and DIV
/// exposes its bits 13:6. TAC picks one counter bit (7, 1, 3 or 5 for the
/// four rates); that bit AND-ed with the enable bit is the timer input, and
/// TIMA increments on its falling edge as seen by the shared edge latch.
///
/// On overflow TIMA holds 0x00 for one machine cycle; the reload from TMA
/// and the interrupt request happen on the following cycle.
mod io;

use super::edge::EdgeLatch;
use super::interrupts::{Interrupt, InterruptController};

pub(super) struct Timer {
    /// Hidden system counter; DIV exposes its upper bits.
    pub(super) internal_counter: u16,
    /// TIMA (FF05).
    pub(super) tima: u8,
    /// TMA (FF06).
    pub(super) tma: u8,
    /// TAC raw value (lower 3 bits meaningful).
    pub(super) tac: u8,
    /// TIMA overflowed last cycle; the next tick reloads it.
    pub(super) reload_pending: bool,
    /// The reload happened during the current cycle, so writes to TIMA are
    /// ignored and writes to TMA also land in TIMA.
    pub(super) reloaded: bool,
    input: EdgeLatch,
}

impl Timer {
    pub(super) fn new() -> Self {
        Self {
            internal_counter: 0,
            tima: 0,
            tma: 0,
            tac: 0,
            reload_pending: false,
            reloaded: false,
            input: EdgeLatch::default(),
        }
    }

    /// Initialise timer to DMG post-boot state.
    ///
    /// `internal_counter` is seeded so that DIV reads back as 0xAB at
    /// PC=0x0100.
    pub(super) fn init_dmg(&mut self) {
        *self = Self::new();
        self.internal_counter = 0xAB << 6;
    }

    #[inline]
    pub(super) fn enabled(&self) -> bool {
        (self.tac & 0x04) != 0
    }

    /// Return the currently selected timer input bit of the internal
    /// counter based on TAC[1:0]. The mapping is:
    /// - 00 → bit 7
    /// - 01 → bit 1
    /// - 10 → bit 3
    /// - 11 → bit 5
    #[inline]
    pub(super) fn counter_bit(&self) -> bool {
        let mask = match self.tac & 0x03 {
            0x00 => 1u16 << 7,
            0x01 => 1u16 << 1,
            0x02 => 1u16 << 3,
            _ => 1u16 << 5,
        };
        (self.internal_counter & mask) != 0
    }

    /// Sample the timer input and increment TIMA on a falling edge.
    fn sample_input(&mut self) {
        let level = self.enabled() && self.counter_bit();
        if self.input.falling(level) {
            self.increment_tima();
        }
    }

    /// Increment TIMA by one and track overflow.
    #[inline]
    fn increment_tima(&mut self) {
        let (next, overflow) = self.tima.overflowing_add(1);
        self.tima = next;
        if overflow {
            log::trace!("GB timer: TIMA overflow, reload from TMA=0x{:02X} next cycle", self.tma);
            self.reload_pending = true;
        }
    }

    /// Advance the timer by one machine cycle.
    pub(super) fn tick_mcycle(&mut self, interrupts: &mut InterruptController) {
        self.reloaded = false;
        if self.reload_pending {
            self.reload_pending = false;
            self.reloaded = true;
            self.tima = self.tma;
            interrupts.request(Interrupt::TIMER);
        }
        self.internal_counter = self.internal_counter.wrapping_add(1);
        self.sample_input();
    }
}
