use super::GameBoyBus;

/// Number of bytes copied by one OAM DMA transfer.
const DMA_LENGTH: u16 = 0xA0;

/// Which internal bus an address sits on, for DMA conflict purposes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum InternalBus {
    /// Cartridge ROM/RAM and WRAM (with its echo).
    External,
    /// VRAM.
    Video,
}

fn internal_bus(addr: u16) -> Option<InternalBus> {
    match addr {
        0x0000..=0x7FFF | 0xA000..=0xFDFF => Some(InternalBus::External),
        0x8000..=0x9FFF => Some(InternalBus::Video),
        _ => None,
    }
}

/// OAM DMA progress.
#[derive(Clone, Debug, Default)]
pub(super) struct Dma {
    active: bool,
    /// First source address of the transfer.
    source: u16,
    /// Bytes copied so far.
    index: u16,
    /// Last byte moved; what a conflicting CPU read observes.
    value: u8,
}

impl Dma {
    /// At least one byte has moved and more are due.
    #[inline]
    pub(super) fn in_flight(&self) -> bool {
        self.active && self.index > 0
    }

    #[inline]
    fn current_source(&self) -> u16 {
        self.source.wrapping_add(self.index.saturating_sub(1))
    }
}

impl GameBoyBus {
    /// Arm a transfer from `value × 0x100` into OAM.
    ///
    /// Sources at 0xE000 and above fold down onto WRAM. Writing again while
    /// a transfer runs restarts it.
    pub(super) fn start_oam_dma(&mut self, value: u8) {
        let page = if value >= 0xE0 { value - 0x20 } else { value };
        self.dma = Dma {
            active: true,
            source: (page as u16) << 8,
            index: 0,
            value: self.dma.value,
        };
        self.memory[0xFF46] = value;
        log::debug!("GB DMA: start from 0x{:04X}", self.dma.source);
    }

    /// Move one byte per machine cycle.
    pub(super) fn dma_tick(&mut self) {
        if !self.dma.active {
            return;
        }
        let src = self.dma.source.wrapping_add(self.dma.index);
        let byte = self.read_raw(src);
        self.memory[0xFE00 + self.dma.index as usize] = byte;
        self.dma.value = byte;
        self.dma.index += 1;
        if self.dma.index == DMA_LENGTH {
            self.dma.active = false;
            log::trace!("GB DMA: transfer complete");
        }
    }

    /// Value a CPU read at `addr` observes because of an in-flight DMA.
    ///
    /// Reads on the same internal bus as the DMA source see the byte being
    /// moved. OAM, HRAM and I/O sit on neither bus and read normally.
    pub(super) fn dma_bus_conflict(&self, addr: u16) -> Option<u8> {
        if !self.dma.in_flight() {
            return None;
        }
        match (internal_bus(addr), internal_bus(self.dma.current_source())) {
            (Some(cpu), Some(dma)) if cpu == dma => Some(self.dma.value),
            _ => None,
        }
    }

    /// OAM is owned by the DMA while a transfer is armed or running.
    #[inline]
    pub(super) fn dma_owns_oam(&self) -> bool {
        self.dma.active
    }
}
