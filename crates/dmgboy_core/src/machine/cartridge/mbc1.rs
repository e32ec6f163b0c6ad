use super::{image_byte, CartridgeKind, Header};

/// MBC1 cartridge state.
///
/// Two bank registers feed the ROM address: the 5-bit primary register
/// (written at 0x2000–0x3FFF, 0 reads as 1) and the 2-bit secondary one
/// (0x4000–0x5FFF). The switchable window at 0x4000–0x7FFF always sees
/// `secondary << 5 | primary`. In mode 1 (0x6000–0x7FFF bit 0) the secondary
/// register also drives the fixed window at 0x0000–0x3FFF and selects the
/// RAM bank; in mode 0 both use bank 0. Bank numbers wrap to the ROM size
/// declared in the header. Battery persistence is not modelled.
pub(in super::super) struct Mbc1Cartridge {
    kind: CartridgeKind,
    rom: Vec<u8>,
    ram: Vec<u8>,
    rom_bank_mask: usize,
    num_ram_banks: usize,
    rom_bank_low5: u8,
    rom_bank_high2: u8,
    ram_enable: bool,
    banking_mode: u8,
}

impl Mbc1Cartridge {
    pub(super) fn new(rom: &[u8], header: Header) -> Self {
        // 2 KiB RAM still occupies one 8 KiB bank slot.
        let num_ram_banks = header.ram_bytes.div_ceil(0x2000).min(4);
        let ram_bytes = if header.kind == CartridgeKind::Mbc1Ram {
            header.ram_bytes.min(0x8000)
        } else {
            0
        };

        Self {
            kind: header.kind,
            rom: rom.to_vec(),
            ram: vec![0xFF; ram_bytes],
            rom_bank_mask: header.rom_banks.max(2) - 1,
            num_ram_banks: if ram_bytes == 0 { 0 } else { num_ram_banks },
            rom_bank_low5: 1,
            rom_bank_high2: 0,
            ram_enable: false,
            banking_mode: 0,
        }
    }

    pub(super) fn kind(&self) -> CartridgeKind {
        self.kind
    }

    /// Compute effective ROM bank for the given address.
    fn effective_rom_bank(&self, addr: u16) -> usize {
        let high = (self.rom_bank_high2 as usize) << 5;
        let bank = if addr < 0x4000 {
            if self.banking_mode == 1 {
                high
            } else {
                0
            }
        } else {
            high | self.rom_bank_low5 as usize
        };
        bank & self.rom_bank_mask
    }

    fn ram_offset(&self, addr: u16) -> Option<usize> {
        if !self.ram_enable || self.num_ram_banks == 0 {
            return None;
        }
        let bank = if self.banking_mode == 1 {
            (self.rom_bank_high2 as usize) % self.num_ram_banks
        } else {
            0
        };
        Some(bank * 0x2000 + (addr - 0xA000) as usize)
    }

    pub(super) fn rom_read(&self, addr: u16) -> u8 {
        let bank = self.effective_rom_bank(addr);
        let index = bank * 0x4000 + (addr & 0x3FFF) as usize;
        image_byte(&self.rom, index, "ROM")
    }

    pub(super) fn ram_read(&self, addr: u16) -> u8 {
        match self.ram_offset(addr) {
            Some(offset) => image_byte(&self.ram, offset, "RAM"),
            None => 0xFF,
        }
    }

    pub(super) fn rom_write(&mut self, addr: u16, value: u8) {
        match addr {
            0x0000..=0x1FFF => {
                // RAM enable: lower 4 bits must be 0x0A.
                self.ram_enable = (value & 0x0F) == 0x0A;
            }
            0x2000..=0x3FFF => {
                self.rom_bank_low5 = value & 0x1F;
                if self.rom_bank_low5 == 0 {
                    self.rom_bank_low5 = 1;
                }
                log::debug!(
                    "GB MBC1: ROM bank -> {}",
                    self.effective_rom_bank(0x4000)
                );
            }
            0x4000..=0x5FFF => {
                self.rom_bank_high2 = value & 0x03;
                log::debug!("GB MBC1: secondary bank register -> {}", self.rom_bank_high2);
            }
            _ => {
                self.banking_mode = value & 0x01;
            }
        }
    }

    pub(super) fn ram_write(&mut self, addr: u16, value: u8) {
        if let Some(offset) = self.ram_offset(addr) {
            if let Some(slot) = self.ram.get_mut(offset) {
                *slot = value;
            }
        }
    }
}
