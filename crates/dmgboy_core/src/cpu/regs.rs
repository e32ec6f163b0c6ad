use crate::{Error, Result};

/// Registers for the Game Boy CPU (LR35902).
///
/// Six general registers pair up as BC/DE/HL, A pairs with F as AF.
/// The low nibble of F always reads as zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Registers {
    pub a: u8,
    pub f: u8,
    pub b: u8,
    pub c: u8,
    pub d: u8,
    pub e: u8,
    pub h: u8,
    pub l: u8,
    pub sp: u16,
    pub pc: u16,
}

/// Flag bits in the F register.
///
/// Layout (bit index in the byte, from MSB to LSB):
/// - bit 7: Z (zero)
/// - bit 6: N (subtract)
/// - bit 5: H (half carry)
/// - bit 4: C (carry)
/// - bits 0–3 are always zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flag {
    Z = 7,
    N = 6,
    H = 5,
    C = 4,
}

/// Meaning of the fourth 16-bit pair selector (`0b11`).
///
/// Opcodes such as `LD rr,nn` and `INC rr` address SP there, while
/// `PUSH`/`POP` address AF.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PairContext {
    StackPointer,
    AccumulatorFlags,
}

/// Selector value reserved for "memory at HL" in 8-bit operand fields.
pub const SELECTOR_INDIRECT_HL: u8 = 6;

impl Registers {
    #[inline]
    pub fn af(&self) -> u16 {
        u16::from_be_bytes([self.a, self.f & 0xF0])
    }

    #[inline]
    pub fn set_af(&mut self, value: u16) {
        let [a, f] = value.to_be_bytes();
        self.a = a;
        // Lower 4 bits of F are always zero.
        self.f = f & 0xF0;
    }

    #[inline]
    pub fn bc(&self) -> u16 {
        u16::from_be_bytes([self.b, self.c])
    }

    #[inline]
    pub fn set_bc(&mut self, value: u16) {
        let [b, c] = value.to_be_bytes();
        self.b = b;
        self.c = c;
    }

    #[inline]
    pub fn de(&self) -> u16 {
        u16::from_be_bytes([self.d, self.e])
    }

    #[inline]
    pub fn set_de(&mut self, value: u16) {
        let [d, e] = value.to_be_bytes();
        self.d = d;
        self.e = e;
    }

    #[inline]
    pub fn hl(&self) -> u16 {
        u16::from_be_bytes([self.h, self.l])
    }

    #[inline]
    pub fn set_hl(&mut self, value: u16) {
        let [h, l] = value.to_be_bytes();
        self.h = h;
        self.l = l;
    }

    /// Read an 8-bit register by its 3-bit opcode selector.
    ///
    /// The encoding matches the standard opcode tables:
    /// 0=B, 1=C, 2=D, 3=E, 4=H, 5=L, 7=A. Selector 6 names `(HL)`, which is
    /// a memory access and therefore never valid here.
    pub fn get8(&self, selector: u8) -> Result<u8> {
        match selector {
            0 => Ok(self.b),
            1 => Ok(self.c),
            2 => Ok(self.d),
            3 => Ok(self.e),
            4 => Ok(self.h),
            5 => Ok(self.l),
            7 => Ok(self.a),
            other => Err(invalid_selector(other)),
        }
    }

    /// Write an 8-bit register by its 3-bit opcode selector.
    pub fn set8(&mut self, selector: u8, value: u8) -> Result<()> {
        match selector {
            0 => self.b = value,
            1 => self.c = value,
            2 => self.d = value,
            3 => self.e = value,
            4 => self.h = value,
            5 => self.l = value,
            7 => self.a = value,
            other => return Err(invalid_selector(other)),
        }
        Ok(())
    }

    /// Read a 16-bit pair by its 2-bit selector (0=BC, 1=DE, 2=HL, 3=SP/AF).
    pub fn get16(&self, selector: u8, context: PairContext) -> u16 {
        match (selector & 0x03, context) {
            (0, _) => self.bc(),
            (1, _) => self.de(),
            (2, _) => self.hl(),
            (_, PairContext::StackPointer) => self.sp,
            (_, PairContext::AccumulatorFlags) => self.af(),
        }
    }

    /// Write a 16-bit pair by its 2-bit selector.
    pub fn set16(&mut self, selector: u8, context: PairContext, value: u16) {
        match (selector & 0x03, context) {
            (0, _) => self.set_bc(value),
            (1, _) => self.set_de(value),
            (2, _) => self.set_hl(value),
            (_, PairContext::StackPointer) => self.sp = value,
            (_, PairContext::AccumulatorFlags) => self.set_af(value),
        }
    }

    #[inline]
    pub fn flag(&self, flag: Flag) -> bool {
        (self.f & (1 << flag as u8)) != 0
    }

    #[inline]
    pub fn set_flag(&mut self, flag: Flag, value: bool) {
        let bit = flag as u8;
        if value {
            self.f |= 1 << bit;
        } else {
            self.f &= !(1 << bit);
        }
    }

    /// Overwrite all four flags at once; the low nibble stays clear.
    #[inline]
    pub fn set_flags(&mut self, z: bool, n: bool, h: bool, c: bool) {
        self.f = ((z as u8) << 7) | ((n as u8) << 6) | ((h as u8) << 5) | ((c as u8) << 4);
    }
}

fn invalid_selector(selector: u8) -> Error {
    if selector == SELECTOR_INDIRECT_HL {
        Error::InvalidOperand("selector 6 is (HL), not a register".to_string())
    } else {
        Error::InvalidOperand(format!("8-bit register selector {selector} out of range"))
    }
}
