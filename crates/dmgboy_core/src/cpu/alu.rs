use super::{AluOp, Cpu, Flag, RotOp};

impl Cpu {
    /// Apply one of the eight accumulator operations with `value`.
    pub(super) fn alu(&mut self, op: AluOp, value: u8) {
        match op {
            AluOp::Add => self.alu_add(value, false),
            AluOp::Adc => self.alu_add(value, true),
            AluOp::Sub => self.regs.a = self.alu_sub(value, false),
            AluOp::Sbc => self.regs.a = self.alu_sub(value, self.regs.flag(Flag::C)),
            AluOp::And => self.alu_and(value),
            AluOp::Xor => self.alu_xor(value),
            AluOp::Or => self.alu_or(value),
            AluOp::Cp => {
                self.alu_sub(value, false);
            }
        }
    }

    /// Core 8-bit ADD/ADC operation on A.
    ///
    /// `use_carry` selects between ADD (false) and ADC (true).
    pub(super) fn alu_add(&mut self, value: u8, use_carry: bool) {
        let a = self.regs.a;
        let carry_in = (use_carry && self.regs.flag(Flag::C)) as u8;

        let half = (a & 0x0F) + (value & 0x0F) + carry_in;
        let full = (a as u16) + (value as u16) + (carry_in as u16);
        let result = full as u8;

        self.regs.a = result;
        self.regs.set_flags(result == 0, false, (half & 0x10) != 0, full > 0xFF);
    }

    /// Core 8-bit subtraction; returns the difference without storing it so
    /// CP can share the flag logic.
    ///
    /// `borrow_in` is the carry consumed by SBC; SUB and CP pass false.
    pub(super) fn alu_sub(&mut self, value: u8, borrow_in: bool) -> u8 {
        let a = self.regs.a;
        let carry_in = borrow_in as i16;

        let half = (a & 0x0F) as i16 - (value & 0x0F) as i16 - carry_in;
        let full = a as i16 - value as i16 - carry_in;
        let result = full as u8;

        self.regs.set_flags(result == 0, true, half < 0, full < 0);
        result
    }

    #[inline]
    pub(super) fn alu_and(&mut self, value: u8) {
        let result = self.regs.a & value;
        self.regs.a = result;
        self.regs.set_flags(result == 0, false, true, false);
    }

    #[inline]
    pub(super) fn alu_or(&mut self, value: u8) {
        let result = self.regs.a | value;
        self.regs.a = result;
        self.regs.set_flags(result == 0, false, false, false);
    }

    #[inline]
    pub(super) fn alu_xor(&mut self, value: u8) {
        let result = self.regs.a ^ value;
        self.regs.a = result;
        self.regs.set_flags(result == 0, false, false, false);
    }

    /// Decimal adjust accumulator after BCD addition/subtraction.
    ///
    /// Uses C, H, N, and A to compute a correction value and updates
    /// A, Z, H, C; N is left unchanged.
    pub(super) fn alu_daa(&mut self) {
        let mut a = self.regs.a;
        let mut adjust: u8 = if self.regs.flag(Flag::C) { 0x60 } else { 0x00 };
        if self.regs.flag(Flag::H) {
            adjust |= 0x06;
        }

        if !self.regs.flag(Flag::N) {
            // After an addition.
            if (a & 0x0F) > 0x09 {
                adjust |= 0x06;
            }
            if a > 0x99 {
                adjust |= 0x60;
            }
            a = a.wrapping_add(adjust);
        } else {
            // After a subtraction.
            a = a.wrapping_sub(adjust);
        }

        self.regs.set_flag(Flag::C, adjust >= 0x60);
        self.regs.set_flag(Flag::H, false);
        self.regs.set_flag(Flag::Z, a == 0);
        self.regs.a = a;
    }

    /// 8-bit increment helper used by INC r and INC (HL).
    ///
    /// Updates Z, N, H while leaving C unchanged.
    #[inline]
    pub(super) fn alu_inc8(&mut self, value: u8) -> u8 {
        let result = value.wrapping_add(1);
        self.regs.set_flag(Flag::Z, result == 0);
        self.regs.set_flag(Flag::N, false);
        self.regs.set_flag(Flag::H, (value & 0x0F) == 0x0F);
        result
    }

    /// 8-bit decrement helper used by DEC r and DEC (HL).
    ///
    /// Updates Z, N, H while leaving C unchanged.
    #[inline]
    pub(super) fn alu_dec8(&mut self, value: u8) -> u8 {
        let result = value.wrapping_sub(1);
        self.regs.set_flag(Flag::Z, result == 0);
        self.regs.set_flag(Flag::N, true);
        self.regs.set_flag(Flag::H, (value & 0x0F) == 0);
        result
    }

    /// 16-bit add helper for `ADD HL,rr`.
    ///
    /// Z is unaffected; N is cleared. H is the carry out of bit 11 and C the
    /// carry out of bit 15 of the 16-bit operands.
    #[inline]
    pub(super) fn alu_add16_hl(&mut self, value: u16) {
        let hl = self.regs.hl();
        let result = hl.wrapping_add(value);

        self.regs.set_flag(Flag::N, false);
        self.regs.set_flag(Flag::H, (hl & 0x0FFF) + (value & 0x0FFF) > 0x0FFF);
        self.regs.set_flag(Flag::C, (hl as u32) + (value as u32) > 0xFFFF);

        self.regs.set_hl(result);
    }

    /// 16-bit add of a signed 8-bit immediate (ADD SP,e8 and LD HL,SP+e8).
    ///
    /// Z and N are cleared; H and C come from the unsigned low-byte add.
    #[inline]
    pub(super) fn alu_add16_signed(&mut self, base: u16, imm8: u8) -> u16 {
        let offset = imm8 as i8 as i16 as u16;
        let h = (base & 0x000F) + (offset & 0x000F) > 0x000F;
        let c = (base & 0x00FF) + (offset & 0x00FF) > 0x00FF;
        self.regs.set_flags(false, false, h, c);
        base.wrapping_add(offset)
    }

    /// CB-prefixed rotate/shift of `value`; Z reflects the result.
    pub(super) fn alu_rotate(&mut self, op: RotOp, value: u8) -> u8 {
        let carry_in = self.regs.flag(Flag::C);
        let (result, carry) = match op {
            RotOp::Rlc => (value.rotate_left(1), value & 0x80 != 0),
            RotOp::Rrc => (value.rotate_right(1), value & 0x01 != 0),
            RotOp::Rl => ((value << 1) | carry_in as u8, value & 0x80 != 0),
            RotOp::Rr => ((value >> 1) | ((carry_in as u8) << 7), value & 0x01 != 0),
            RotOp::Sla => (value << 1, value & 0x80 != 0),
            RotOp::Sra => ((value >> 1) | (value & 0x80), value & 0x01 != 0),
            RotOp::Swap => (value.rotate_left(4), false),
            RotOp::Srl => (value >> 1, value & 0x01 != 0),
        };
        self.regs.set_flags(result == 0, false, false, carry);
        result
    }

    /// RLCA/RRCA/RLA/RRA: like the CB rotates but Z is always cleared.
    pub(super) fn alu_rotate_a(&mut self, op: RotOp) {
        let result = self.alu_rotate(op, self.regs.a);
        self.regs.set_flag(Flag::Z, false);
        self.regs.a = result;
    }

    /// BIT b,value: Z set when the bit is clear; C preserved.
    pub(super) fn alu_bit(&mut self, bit: u8, value: u8) {
        self.regs.set_flag(Flag::Z, value & (1 << bit) == 0);
        self.regs.set_flag(Flag::N, false);
        self.regs.set_flag(Flag::H, true);
    }

    pub(super) fn alu_cpl(&mut self) {
        self.regs.a = !self.regs.a;
        self.regs.set_flag(Flag::N, true);
        self.regs.set_flag(Flag::H, true);
    }

    pub(super) fn alu_scf(&mut self) {
        self.regs.set_flag(Flag::N, false);
        self.regs.set_flag(Flag::H, false);
        self.regs.set_flag(Flag::C, true);
    }

    pub(super) fn alu_ccf(&mut self) {
        let carry = self.regs.flag(Flag::C);
        self.regs.set_flag(Flag::N, false);
        self.regs.set_flag(Flag::H, false);
        self.regs.set_flag(Flag::C, !carry);
    }
}
