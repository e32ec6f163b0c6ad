//! Decoded opcode tables.
//!
//! Both tables are built once, on first use, by walking every opcode
//! through the usual `x/y/z/p/q` bit-field decoding. Each entry names the
//! step function to run (`Instr`) and its destination/source operands.

use lazy_static::lazy_static;

use super::regs::{PairContext, SELECTOR_INDIRECT_HL};

/// Operand selector stored in a decoded opcode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operand {
    None,
    /// 8-bit register by selector (never 6).
    Reg8(u8),
    /// `(HL)`
    IndHl,
    /// `(HL+)`
    HlInc,
    /// `(HL-)`
    HlDec,
    /// `(BC)` or `(DE)` by pair selector.
    Indirect(u8),
    /// `n`
    Imm8,
    /// `nn`
    Imm16,
    /// `(nn)`
    IndImm16,
    /// `(FF00+n)`
    HighImm8,
    /// `(FF00+C)`
    HighC,
    /// 16-bit pair by selector.
    Reg16(u8, PairContext),
    /// `SP+e8`
    SpOffset,
    Cond(Condition),
    /// RST target address.
    Vector(u8),
    /// Bit index for BIT/RES/SET.
    Bit(u8),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Condition {
    Always,
    NotZero,
    Zero,
    NotCarry,
    Carry,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AluOp {
    Add,
    Adc,
    Sub,
    Sbc,
    And,
    Xor,
    Or,
    Cp,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RotOp {
    Rlc,
    Rrc,
    Rl,
    Rr,
    Sla,
    Sra,
    Swap,
    Srl,
}

/// Step function selected by an opcode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Instr {
    Nop,
    Ld8,
    Ld16,
    /// LD (nn),SP
    LdImm16Sp,
    /// LD SP,HL
    LdSpHl,
    /// LD HL,SP+e8
    LdHlSpOffset,
    Push,
    Pop,
    Alu(AluOp),
    Inc8,
    Dec8,
    Inc16,
    Dec16,
    AddHl,
    AddSp,
    Jr,
    Jp,
    JpHl,
    Call,
    Ret,
    Reti,
    Rst,
    Rlca,
    Rrca,
    Rla,
    Rra,
    Daa,
    Cpl,
    Scf,
    Ccf,
    Halt,
    Stop,
    Di,
    Ei,
    /// 0xCB: fetches the extension opcode and re-enters the CB table.
    Prefix,
    Invalid,
    Rotate(RotOp),
    Bit,
    Res,
    Set,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Opcode {
    pub instr: Instr,
    pub dst: Operand,
    pub src: Operand,
}

impl Opcode {
    pub const INVALID: Opcode = Opcode::new(Instr::Invalid, Operand::None, Operand::None);

    const fn new(instr: Instr, dst: Operand, src: Operand) -> Self {
        Self { instr, dst, src }
    }

    const fn bare(instr: Instr) -> Self {
        Self::new(instr, Operand::None, Operand::None)
    }
}

lazy_static! {
    static ref OPCODES: [Opcode; 256] = build_table(decode);
    static ref CB_OPCODES: [Opcode; 256] = build_table(decode_cb);
}

/// Look up an unprefixed opcode.
pub fn lookup(opcode: u8) -> Opcode {
    OPCODES[opcode as usize]
}

/// Look up the extension opcode following 0xCB.
pub fn lookup_cb(opcode: u8) -> Opcode {
    CB_OPCODES[opcode as usize]
}

fn build_table(decode: fn(u8) -> Opcode) -> [Opcode; 256] {
    let mut table = [Opcode::INVALID; 256];
    for (opcode, entry) in table.iter_mut().enumerate() {
        *entry = decode(opcode as u8);
    }
    table
}

/// 8-bit operand for a 3-bit register field; selector 6 means `(HL)`.
fn r8(selector: u8) -> Operand {
    if selector == SELECTOR_INDIRECT_HL {
        Operand::IndHl
    } else {
        Operand::Reg8(selector)
    }
}

fn rp(p: u8) -> Operand {
    Operand::Reg16(p, PairContext::StackPointer)
}

fn rp2(p: u8) -> Operand {
    Operand::Reg16(p, PairContext::AccumulatorFlags)
}

fn cond(y: u8) -> Operand {
    Operand::Cond(match y & 0x03 {
        0 => Condition::NotZero,
        1 => Condition::Zero,
        2 => Condition::NotCarry,
        _ => Condition::Carry,
    })
}

const ALWAYS: Operand = Operand::Cond(Condition::Always);
const A: Operand = Operand::Reg8(7);

fn alu_op(y: u8) -> AluOp {
    match y {
        0 => AluOp::Add,
        1 => AluOp::Adc,
        2 => AluOp::Sub,
        3 => AluOp::Sbc,
        4 => AluOp::And,
        5 => AluOp::Xor,
        6 => AluOp::Or,
        _ => AluOp::Cp,
    }
}

fn decode(opcode: u8) -> Opcode {
    let x = opcode >> 6;
    let y = (opcode >> 3) & 0x07;
    let z = opcode & 0x07;
    let p = y >> 1;
    let q = y & 0x01;

    match (x, z) {
        (0, 0) => match y {
            0 => Opcode::bare(Instr::Nop),
            1 => Opcode::new(Instr::LdImm16Sp, Operand::IndImm16, rp(3)),
            2 => Opcode::bare(Instr::Stop),
            3 => Opcode::new(Instr::Jr, ALWAYS, Operand::Imm8),
            _ => Opcode::new(Instr::Jr, cond(y - 4), Operand::Imm8),
        },
        (0, 1) if q == 0 => Opcode::new(Instr::Ld16, rp(p), Operand::Imm16),
        (0, 1) => Opcode::new(Instr::AddHl, rp(2), rp(p)),
        (0, 2) => {
            let mem = match p {
                0 | 1 => Operand::Indirect(p),
                2 => Operand::HlInc,
                _ => Operand::HlDec,
            };
            if q == 0 {
                Opcode::new(Instr::Ld8, mem, A)
            } else {
                Opcode::new(Instr::Ld8, A, mem)
            }
        }
        (0, 3) if q == 0 => Opcode::new(Instr::Inc16, rp(p), Operand::None),
        (0, 3) => Opcode::new(Instr::Dec16, rp(p), Operand::None),
        (0, 4) => Opcode::new(Instr::Inc8, r8(y), Operand::None),
        (0, 5) => Opcode::new(Instr::Dec8, r8(y), Operand::None),
        (0, 6) => Opcode::new(Instr::Ld8, r8(y), Operand::Imm8),
        (0, _) => Opcode::bare(match y {
            0 => Instr::Rlca,
            1 => Instr::Rrca,
            2 => Instr::Rla,
            3 => Instr::Rra,
            4 => Instr::Daa,
            5 => Instr::Cpl,
            6 => Instr::Scf,
            _ => Instr::Ccf,
        }),
        // 0x76 sits where LD (HL),(HL) would be.
        (1, _) if opcode == 0x76 => Opcode::bare(Instr::Halt),
        (1, _) => Opcode::new(Instr::Ld8, r8(y), r8(z)),
        (2, _) => Opcode::new(Instr::Alu(alu_op(y)), A, r8(z)),
        (_, 0) => match y {
            0..=3 => Opcode::new(Instr::Ret, cond(y), Operand::None),
            4 => Opcode::new(Instr::Ld8, Operand::HighImm8, A),
            5 => Opcode::new(Instr::AddSp, rp(3), Operand::Imm8),
            6 => Opcode::new(Instr::Ld8, A, Operand::HighImm8),
            _ => Opcode::new(Instr::LdHlSpOffset, rp(2), Operand::SpOffset),
        },
        (_, 1) if q == 0 => Opcode::new(Instr::Pop, rp2(p), Operand::None),
        (_, 1) => match p {
            0 => Opcode::new(Instr::Ret, ALWAYS, Operand::None),
            1 => Opcode::bare(Instr::Reti),
            2 => Opcode::new(Instr::JpHl, Operand::None, rp(2)),
            _ => Opcode::new(Instr::LdSpHl, rp(3), rp(2)),
        },
        (_, 2) => match y {
            0..=3 => Opcode::new(Instr::Jp, cond(y), Operand::Imm16),
            4 => Opcode::new(Instr::Ld8, Operand::HighC, A),
            5 => Opcode::new(Instr::Ld8, Operand::IndImm16, A),
            6 => Opcode::new(Instr::Ld8, A, Operand::HighC),
            _ => Opcode::new(Instr::Ld8, A, Operand::IndImm16),
        },
        (_, 3) => match y {
            0 => Opcode::new(Instr::Jp, ALWAYS, Operand::Imm16),
            1 => Opcode::bare(Instr::Prefix),
            6 => Opcode::bare(Instr::Di),
            7 => Opcode::bare(Instr::Ei),
            _ => Opcode::INVALID,
        },
        (_, 4) if y < 4 => Opcode::new(Instr::Call, cond(y), Operand::Imm16),
        (_, 4) => Opcode::INVALID,
        (_, 5) if q == 0 => Opcode::new(Instr::Push, Operand::None, rp2(p)),
        (_, 5) if p == 0 => Opcode::new(Instr::Call, ALWAYS, Operand::Imm16),
        (_, 5) => Opcode::INVALID,
        (_, 6) => Opcode::new(Instr::Alu(alu_op(y)), A, Operand::Imm8),
        _ => Opcode::new(Instr::Rst, Operand::Vector(y * 8), Operand::None),
    }
}

fn decode_cb(opcode: u8) -> Opcode {
    let x = opcode >> 6;
    let y = (opcode >> 3) & 0x07;
    let z = opcode & 0x07;

    match x {
        0 => {
            let op = match y {
                0 => RotOp::Rlc,
                1 => RotOp::Rrc,
                2 => RotOp::Rl,
                3 => RotOp::Rr,
                4 => RotOp::Sla,
                5 => RotOp::Sra,
                6 => RotOp::Swap,
                _ => RotOp::Srl,
            };
            Opcode::new(Instr::Rotate(op), r8(z), Operand::None)
        }
        1 => Opcode::new(Instr::Bit, Operand::Bit(y), r8(z)),
        2 => Opcode::new(Instr::Res, r8(z), Operand::Bit(y)),
        _ => Opcode::new(Instr::Set, r8(z), Operand::Bit(y)),
    }
}
