mod mbc1;
mod rom_only;

pub(super) use mbc1::Mbc1Cartridge;
pub(super) use rom_only::RomOnlyCartridge;

use crate::{Error, Result};

/// Banking-controller kind read from header byte 0x0147.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CartridgeKind {
    RomOnly,
    /// ROM + optional RAM.
    RomRam,
    Mbc1,
    /// MBC1 + RAM (with or without battery).
    Mbc1Ram,
}

impl CartridgeKind {
    pub fn from_header_byte(code: u8) -> Result<Self> {
        match code {
            0x00 => Ok(Self::RomOnly),
            0x08 | 0x09 => Ok(Self::RomRam),
            0x01 => Ok(Self::Mbc1),
            0x02 | 0x03 => Ok(Self::Mbc1Ram),
            other => Err(Error::UnsupportedCartridge(other)),
        }
    }
}

/// The three header fields the bus needs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) struct Header {
    pub(super) kind: CartridgeKind,
    pub(super) rom_banks: usize,
    pub(super) ram_bytes: usize,
}

impl Header {
    pub(super) fn parse(rom: &[u8]) -> Result<Self> {
        if rom.len() < 0x150 {
            return Err(Error::TruncatedRom(rom.len()));
        }
        let kind = CartridgeKind::from_header_byte(rom[0x147])?;
        // 0x148: 32 KiB << code, i.e. 2 << code banks of 16 KiB.
        let rom_banks = 2usize << rom[0x148].min(8);
        let ram_bytes = match rom[0x149] {
            0x01 => 0x800,
            0x02 => 0x2000,
            0x03 => 0x8000,
            0x04 => 0x2_0000,
            0x05 => 0x1_0000,
            _ => 0,
        };
        Ok(Self {
            kind,
            rom_banks,
            ram_bytes,
        })
    }
}

/// Simple wrapper enum for supported cartridge mappers.
pub(super) enum Cartridge {
    RomOnly(RomOnlyCartridge),
    Mbc1(Mbc1Cartridge),
}

impl Cartridge {
    /// Parse the header and build the matching mapper.
    ///
    /// Fails before any instruction runs when the banking controller is not
    /// supported.
    pub(super) fn from_rom(rom: &[u8]) -> Result<Self> {
        let header = Header::parse(rom)?;
        log::info!(
            "GB cartridge: {:?}, {} ROM banks, {} bytes RAM",
            header.kind,
            header.rom_banks,
            header.ram_bytes
        );
        Ok(match header.kind {
            CartridgeKind::RomOnly | CartridgeKind::RomRam => {
                Cartridge::RomOnly(RomOnlyCartridge::new(rom, header))
            }
            CartridgeKind::Mbc1 | CartridgeKind::Mbc1Ram => {
                Cartridge::Mbc1(Mbc1Cartridge::new(rom, header))
            }
        })
    }

    pub(super) fn kind(&self) -> CartridgeKind {
        match self {
            Cartridge::RomOnly(c) => c.kind(),
            Cartridge::Mbc1(c) => c.kind(),
        }
    }

    pub(super) fn rom_read(&self, addr: u16) -> u8 {
        match self {
            Cartridge::RomOnly(c) => c.rom_read(addr),
            Cartridge::Mbc1(c) => c.rom_read(addr),
        }
    }

    pub(super) fn rom_write(&mut self, addr: u16, value: u8) {
        match self {
            // No banking registers: writes have no effect.
            Cartridge::RomOnly(_) => {}
            Cartridge::Mbc1(c) => c.rom_write(addr, value),
        }
    }

    pub(super) fn ram_read(&self, addr: u16) -> u8 {
        match self {
            Cartridge::RomOnly(c) => c.ram_read(addr),
            Cartridge::Mbc1(c) => c.ram_read(addr),
        }
    }

    pub(super) fn ram_write(&mut self, addr: u16, value: u8) {
        match self {
            Cartridge::RomOnly(c) => c.ram_write(addr, value),
            Cartridge::Mbc1(c) => c.ram_write(addr, value),
        }
    }
}

/// Byte at `index` of a cartridge image, or the open-bus value past its end.
pub(super) fn image_byte(image: &[u8], index: usize, what: &str) -> u8 {
    match image.get(index) {
        Some(&value) => value,
        None => {
            log::trace!("GB cartridge: {} read past image at 0x{:X}", what, index);
            0xFF
        }
    }
}
