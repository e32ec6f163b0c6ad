use bitflags::bitflags;

bitflags! {
    /// Interrupt sources as laid out in IF (0xFF0F) and IE (0xFFFF).
    ///
    /// Bit index doubles as priority: lower bits are serviced first.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct Interrupt: u8 {
        const VBLANK = 0b0000_0001;
        const STAT   = 0b0000_0010;
        const TIMER  = 0b0000_0100;
        const SERIAL = 0b0000_1000;
        const JOYPAD = 0b0001_0000;
    }
}

impl Interrupt {
    /// Lowest set source in `pending` with its index and vector address.
    pub fn highest_priority(pending: u8) -> Option<(u8, u16)> {
        let pending = pending & Self::all().bits();
        if pending == 0 {
            return None;
        }
        let index = pending.trailing_zeros() as u8;
        Some((index, 0x0040 + (index as u16) * 8))
    }
}

/// IF/IE register pair.
///
/// The master enable is CPU state and is not kept here.
#[derive(Clone, Debug, Default)]
pub(crate) struct InterruptController {
    flags: Interrupt,
    enable: u8,
}

impl InterruptController {
    #[inline]
    pub(crate) fn request(&mut self, source: Interrupt) {
        self.flags |= source;
    }

    /// IF as read by the CPU; the three unused bits read as 1.
    #[inline]
    pub(crate) fn read_flags(&self) -> u8 {
        self.flags.bits() | 0b1110_0000
    }

    #[inline]
    pub(crate) fn write_flags(&mut self, value: u8) {
        self.flags = Interrupt::from_bits_truncate(value);
    }

    /// IE keeps all eight bits even though only five are wired.
    #[inline]
    pub(crate) fn read_enable(&self) -> u8 {
        self.enable
    }

    #[inline]
    pub(crate) fn write_enable(&mut self, value: u8) {
        self.enable = value;
    }
}
