use super::{image_byte, CartridgeKind, Header};

/// 32 KiB of unbanked ROM, optionally with up to 8 KiB of RAM.
pub(in super::super) struct RomOnlyCartridge {
    kind: CartridgeKind,
    rom: Vec<u8>,
    ram: Vec<u8>,
}

impl RomOnlyCartridge {
    pub(super) fn new(rom: &[u8], header: Header) -> Self {
        let ram_bytes = if header.kind == CartridgeKind::RomRam {
            header.ram_bytes.min(0x2000)
        } else {
            0
        };
        Self {
            kind: header.kind,
            rom: rom.to_vec(),
            ram: vec![0xFF; ram_bytes],
        }
    }

    pub(super) fn kind(&self) -> CartridgeKind {
        self.kind
    }

    pub(super) fn rom_read(&self, addr: u16) -> u8 {
        image_byte(&self.rom, addr as usize, "ROM")
    }

    pub(super) fn ram_read(&self, addr: u16) -> u8 {
        image_byte(&self.ram, (addr - 0xA000) as usize, "RAM")
    }

    pub(super) fn ram_write(&mut self, addr: u16, value: u8) {
        if let Some(slot) = self.ram.get_mut((addr - 0xA000) as usize) {
            *slot = value;
        }
    }
}
