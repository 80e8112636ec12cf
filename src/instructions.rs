// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Instruction metadata types shared by the opcode table.
//!
//! The table itself lives in [`table`]; this module defines the mnemonic and
//! addressing-mode enums plus the per-entry descriptor.

use strum::{Display, EnumIter, EnumString};

/// The documented NMOS 6502 instruction set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(ascii_case_insensitive, serialize_all = "UPPERCASE")]
pub enum Mnemonic {
    Adc,
    And,
    Asl,
    Bcc,
    Bcs,
    Beq,
    Bit,
    Bmi,
    Bne,
    Bpl,
    Brk,
    Bvc,
    Bvs,
    Clc,
    Cld,
    Cli,
    Clv,
    Cmp,
    Cpx,
    Cpy,
    Dec,
    Dex,
    Dey,
    Eor,
    Inc,
    Inx,
    Iny,
    Jmp,
    Jsr,
    Lda,
    Ldx,
    Ldy,
    Lsr,
    Nop,
    Ora,
    Pha,
    Php,
    Pla,
    Plp,
    Rol,
    Ror,
    Rti,
    Rts,
    Sbc,
    Sec,
    Sed,
    Sei,
    Sta,
    Stx,
    Sty,
    Tax,
    Tay,
    Tsx,
    Txa,
    Txs,
    Tya,
}

impl Mnemonic {
    /// Branch instructions encode with relative addressing and get their
    /// operand byte computed as a displacement from the program counter.
    pub fn is_branch(self) -> bool {
        matches!(
            self,
            Mnemonic::Bcc
                | Mnemonic::Bcs
                | Mnemonic::Beq
                | Mnemonic::Bmi
                | Mnemonic::Bne
                | Mnemonic::Bpl
                | Mnemonic::Bvc
                | Mnemonic::Bvs
        )
    }
}

/// Addressing modes of the 6502.
///
/// Accumulator-operand forms (ASL, LSR, ROL, ROR with no operand) are carried
/// as `Implied` length-1 entries in the table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display)]
pub enum AddressMode {
    /// No operand (NOP, RTS, ASL-on-accumulator, ...)
    Implied,
    /// #$nn - 8-bit immediate value
    Immediate,
    /// $nn - zero page (8-bit address)
    ZeroPage,
    /// $nn,X - zero page indexed by X
    ZeroPageX,
    /// $nn,Y - zero page indexed by Y
    ZeroPageY,
    /// $nnnn - absolute (16-bit address)
    Absolute,
    /// $nnnn,X - absolute indexed by X
    AbsoluteX,
    /// $nnnn,Y - absolute indexed by Y
    AbsoluteY,
    /// ($nnnn) - indirect (JMP only)
    Indirect,
    /// ($nn,X) - indexed indirect (zero page)
    IndexedIndirectX,
    /// ($nn),Y - indirect indexed (zero page)
    IndirectIndexedY,
    /// Branch offset (8-bit signed)
    Relative,
}

impl AddressMode {
    /// Number of operand bytes following the opcode for this mode.
    pub fn operand_size(self) -> u8 {
        match self {
            AddressMode::Implied => 0,
            AddressMode::Immediate
            | AddressMode::ZeroPage
            | AddressMode::ZeroPageX
            | AddressMode::ZeroPageY
            | AddressMode::IndexedIndirectX
            | AddressMode::IndirectIndexedY
            | AddressMode::Relative => 1,
            AddressMode::Absolute
            | AddressMode::AbsoluteX
            | AddressMode::AbsoluteY
            | AddressMode::Indirect => 2,
        }
    }
}

/// One row of the opcode table: a (mnemonic, mode) pair with its encoding.
#[derive(Debug)]
pub struct InstructionEntry {
    pub mnemonic: Mnemonic,
    pub mode: AddressMode,
    pub opcode: u8,
    pub length: u8,
    pub cycles: u8,
}

pub mod table;

#[cfg(test)]
mod tests {
    use super::{AddressMode, Mnemonic};
    use std::str::FromStr;

    #[test]
    fn branch_flag_covers_exactly_the_branches() {
        assert!(Mnemonic::Beq.is_branch());
        assert!(Mnemonic::Bcc.is_branch());
        assert!(!Mnemonic::Jmp.is_branch());
        assert!(!Mnemonic::Lda.is_branch());
        assert!(!Mnemonic::Brk.is_branch());
    }

    #[test]
    fn mnemonics_parse_case_insensitively() {
        assert_eq!(Mnemonic::from_str("LDA"), Ok(Mnemonic::Lda));
        assert_eq!(Mnemonic::from_str("lda"), Ok(Mnemonic::Lda));
        assert!(Mnemonic::from_str("BRA").is_err());
    }

    #[test]
    fn operand_sizes_match_mode_class() {
        assert_eq!(AddressMode::Implied.operand_size(), 0);
        assert_eq!(AddressMode::Immediate.operand_size(), 1);
        assert_eq!(AddressMode::Relative.operand_size(), 1);
        assert_eq!(AddressMode::Absolute.operand_size(), 2);
        assert_eq!(AddressMode::Indirect.operand_size(), 2);
    }
}
