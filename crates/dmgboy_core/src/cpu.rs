//! LR35902 instruction engine.
//!
//! Instructions execute as small state machines: after the opcode fetch
//! cycle, the opcode's step function is called with an increasing `stage`
//! until it reports completion. Every stage past 0 that touches the bus
//! (or idles internally) spends exactly one machine cycle, and the bus is
//! ticked before the access so Timer, PPU and DMA move in lock-step.

mod alu;
mod bus;
mod exec;
mod helpers;
mod init;
mod interrupts;
pub mod opcodes;
mod regs;


pub use bus::Bus;
pub use opcodes::{AluOp, Condition, Instr, Opcode, Operand, RotOp};
pub use regs::{Flag, PairContext, Registers, SELECTOR_INDIRECT_HL};

/// Top-level CPU state reported to the host.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CpuStatus {
    /// Fetching and executing instructions.
    #[default]
    Okay,
    /// Parked by HALT until an enabled interrupt is pending.
    Halt,
    /// Parked by STOP until an enabled interrupt is pending.
    Stop,
    /// Terminal trap after an invalid opcode.
    Hung,
}

/// Game Boy CPU core.
#[derive(Clone, Debug)]
pub struct Cpu {
    pub regs: Registers,
    /// Interrupt master enable.
    pub ime: bool,
    /// Set by EI; IME becomes true once the following instruction retires.
    ime_pending: bool,
    status: CpuStatus,
    /// HALT bug: the next opcode fetch does not increment PC.
    halt_bug: bool,
    /// Opcode and PC of the instruction that hung the CPU.
    hung_at: Option<(u8, u16)>,
    /// Raw opcode byte and fetch address of the instruction in flight.
    opcode: u8,
    opcode_pc: u16,
    /// Table entry of the instruction in flight.
    instr: Opcode,
    /// Table entry of the CB-prefixed instruction in flight, once decoded.
    cb_instr: Opcode,
    /// Two-byte latch for immediates and popped words.
    latch: u16,
    /// Result of the condition check made at stage 0.
    cond_taken: bool,
    /// Machine cycles consumed since power-on.
    mcycles: u64,
}
