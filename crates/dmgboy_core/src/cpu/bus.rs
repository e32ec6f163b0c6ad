use crate::Result;

/// Abstraction over the Game Boy bus (memory and IO) as seen by the CPU.
///
/// `read8`/`write8` are the raw accesses; they never advance time. The CPU
/// calls `tick_mcycle` once for every machine cycle it spends, immediately
/// before the access belonging to that cycle.
pub trait Bus {
    fn read8(&mut self, addr: u16) -> u8;
    fn write8(&mut self, addr: u16, value: u8);

    /// Advance bus-side peripherals (timer, PPU, DMA) by one machine cycle.
    ///
    /// Default implementation does nothing so flat test buses can ignore
    /// time entirely. Peripherals that hit an unrecoverable condition while
    /// advancing report it here.
    fn tick_mcycle(&mut self) -> Result<()> {
        Ok(())
    }
}
