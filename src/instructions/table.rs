// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Opcode table for the documented NMOS 6502 instruction set.
//!
//! Every legal (mnemonic, mode) pair appears exactly once with its opcode
//! byte, encoded length and base cycle count (page-crossing and taken-branch
//! penalties are not modeled). Lookup goes through a lazily built index so
//! the table itself stays a plain static slice.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::error::AsmError;
use crate::instructions::AddressMode::*;
use crate::instructions::Mnemonic::*;
use crate::instructions::{AddressMode, InstructionEntry, Mnemonic};

const fn e(
    mnemonic: Mnemonic,
    mode: AddressMode,
    opcode: u8,
    length: u8,
    cycles: u8,
) -> InstructionEntry {
    InstructionEntry {
        mnemonic,
        mode,
        opcode,
        length,
        cycles,
    }
}

#[rustfmt::skip]
pub static INSTRUCTION_TABLE: &[InstructionEntry] = &[
    // ADC - Add with Carry
    e(Adc, Immediate,        0x69, 2, 2),
    e(Adc, ZeroPage,         0x65, 2, 3),
    e(Adc, ZeroPageX,        0x75, 2, 4),
    e(Adc, Absolute,         0x6D, 3, 4),
    e(Adc, AbsoluteX,        0x7D, 3, 4),
    e(Adc, AbsoluteY,        0x79, 3, 4),
    e(Adc, IndexedIndirectX, 0x61, 2, 6),
    e(Adc, IndirectIndexedY, 0x71, 2, 5),
    // AND - Logical AND
    e(And, Immediate,        0x29, 2, 2),
    e(And, ZeroPage,         0x25, 2, 3),
    e(And, ZeroPageX,        0x35, 2, 4),
    e(And, Absolute,         0x2D, 3, 4),
    e(And, AbsoluteX,        0x3D, 3, 4),
    e(And, AbsoluteY,        0x39, 3, 4),
    e(And, IndexedIndirectX, 0x21, 2, 6),
    e(And, IndirectIndexedY, 0x31, 2, 5),
    // ASL - Arithmetic Shift Left (implied form shifts the accumulator)
    e(Asl, Implied,          0x0A, 1, 2),
    e(Asl, ZeroPage,         0x06, 2, 5),
    e(Asl, ZeroPageX,        0x16, 2, 6),
    e(Asl, Absolute,         0x0E, 3, 6),
    e(Asl, AbsoluteX,        0x1E, 3, 7),
    // Branches
    e(Bcc, Relative,         0x90, 2, 2),
    e(Bcs, Relative,         0xB0, 2, 2),
    e(Beq, Relative,         0xF0, 2, 2),
    // BIT - Bit Test
    e(Bit, ZeroPage,         0x24, 2, 3),
    e(Bit, Absolute,         0x2C, 3, 4),
    e(Bmi, Relative,         0x30, 2, 2),
    e(Bne, Relative,         0xD0, 2, 2),
    e(Bpl, Relative,         0x10, 2, 2),
    // BRK - Force Interrupt
    e(Brk, Implied,          0x00, 1, 7),
    e(Bvc, Relative,         0x50, 2, 2),
    e(Bvs, Relative,         0x70, 2, 2),
    // Flag operations
    e(Clc, Implied,          0x18, 1, 2),
    e(Cld, Implied,          0xD8, 1, 2),
    e(Cli, Implied,          0x58, 1, 2),
    e(Clv, Implied,          0xB8, 1, 2),
    // CMP - Compare Accumulator
    e(Cmp, Immediate,        0xC9, 2, 2),
    e(Cmp, ZeroPage,         0xC5, 2, 3),
    e(Cmp, ZeroPageX,        0xD5, 2, 4),
    e(Cmp, Absolute,         0xCD, 3, 4),
    e(Cmp, AbsoluteX,        0xDD, 3, 4),
    e(Cmp, AbsoluteY,        0xD9, 3, 4),
    e(Cmp, IndexedIndirectX, 0xC1, 2, 6),
    e(Cmp, IndirectIndexedY, 0xD1, 2, 5),
    // CPX - Compare X
    e(Cpx, Immediate,        0xE0, 2, 2),
    e(Cpx, ZeroPage,         0xE4, 2, 3),
    e(Cpx, Absolute,         0xEC, 3, 4),
    // CPY - Compare Y
    e(Cpy, Immediate,        0xC0, 2, 2),
    e(Cpy, ZeroPage,         0xC4, 2, 3),
    e(Cpy, Absolute,         0xCC, 3, 4),
    // DEC - Decrement Memory
    e(Dec, ZeroPage,         0xC6, 2, 5),
    e(Dec, ZeroPageX,        0xD6, 2, 6),
    e(Dec, Absolute,         0xCE, 3, 6),
    e(Dec, AbsoluteX,        0xDE, 3, 7),
    e(Dex, Implied,          0xCA, 1, 2),
    e(Dey, Implied,          0x88, 1, 2),
    // EOR - Exclusive OR
    e(Eor, Immediate,        0x49, 2, 2),
    e(Eor, ZeroPage,         0x45, 2, 3),
    e(Eor, ZeroPageX,        0x55, 2, 4),
    e(Eor, Absolute,         0x4D, 3, 4),
    e(Eor, AbsoluteX,        0x5D, 3, 4),
    e(Eor, AbsoluteY,        0x59, 3, 4),
    e(Eor, IndexedIndirectX, 0x41, 2, 6),
    e(Eor, IndirectIndexedY, 0x51, 2, 5),
    // INC - Increment Memory
    e(Inc, ZeroPage,         0xE6, 2, 5),
    e(Inc, ZeroPageX,        0xF6, 2, 6),
    e(Inc, Absolute,         0xEE, 3, 6),
    e(Inc, AbsoluteX,        0xFE, 3, 7),
    e(Inx, Implied,          0xE8, 1, 2),
    e(Iny, Implied,          0xC8, 1, 2),
    // JMP - Jump
    e(Jmp, Absolute,         0x4C, 3, 3),
    e(Jmp, Indirect,         0x6C, 3, 5),
    // JSR - Jump to Subroutine
    e(Jsr, Absolute,         0x20, 3, 6),
    // LDA - Load Accumulator
    e(Lda, Immediate,        0xA9, 2, 2),
    e(Lda, ZeroPage,         0xA5, 2, 3),
    e(Lda, ZeroPageX,        0xB5, 2, 4),
    e(Lda, Absolute,         0xAD, 3, 4),
    e(Lda, AbsoluteX,        0xBD, 3, 4),
    e(Lda, AbsoluteY,        0xB9, 3, 4),
    e(Lda, IndexedIndirectX, 0xA1, 2, 6),
    e(Lda, IndirectIndexedY, 0xB1, 2, 5),
    // LDX - Load X
    e(Ldx, Immediate,        0xA2, 2, 2),
    e(Ldx, ZeroPage,         0xA6, 2, 3),
    e(Ldx, ZeroPageY,        0xB6, 2, 4),
    e(Ldx, Absolute,         0xAE, 3, 4),
    e(Ldx, AbsoluteY,        0xBE, 3, 4),
    // LDY - Load Y
    e(Ldy, Immediate,        0xA0, 2, 2),
    e(Ldy, ZeroPage,         0xA4, 2, 3),
    e(Ldy, ZeroPageX,        0xB4, 2, 4),
    e(Ldy, Absolute,         0xAC, 3, 4),
    e(Ldy, AbsoluteX,        0xBC, 3, 4),
    // LSR - Logical Shift Right (implied form shifts the accumulator)
    e(Lsr, Implied,          0x4A, 1, 2),
    e(Lsr, ZeroPage,         0x46, 2, 5),
    e(Lsr, ZeroPageX,        0x56, 2, 6),
    e(Lsr, Absolute,         0x4E, 3, 6),
    e(Lsr, AbsoluteX,        0x5E, 3, 7),
    e(Nop, Implied,          0xEA, 1, 2),
    // ORA - Logical OR
    e(Ora, Immediate,        0x09, 2, 2),
    e(Ora, ZeroPage,         0x05, 2, 3),
    e(Ora, ZeroPageX,        0x15, 2, 4),
    e(Ora, Absolute,         0x0D, 3, 4),
    e(Ora, AbsoluteX,        0x1D, 3, 4),
    e(Ora, AbsoluteY,        0x19, 3, 4),
    e(Ora, IndexedIndirectX, 0x01, 2, 6),
    e(Ora, IndirectIndexedY, 0x11, 2, 5),
    // Stack operations
    e(Pha, Implied,          0x48, 1, 3),
    e(Php, Implied,          0x08, 1, 3),
    e(Pla, Implied,          0x68, 1, 4),
    e(Plp, Implied,          0x28, 1, 4),
    // ROL - Rotate Left (implied form rotates the accumulator)
    e(Rol, Implied,          0x2A, 1, 2),
    e(Rol, ZeroPage,         0x26, 2, 5),
    e(Rol, ZeroPageX,        0x36, 2, 6),
    e(Rol, Absolute,         0x2E, 3, 6),
    e(Rol, AbsoluteX,        0x3E, 3, 7),
    // ROR - Rotate Right (implied form rotates the accumulator)
    e(Ror, Implied,          0x6A, 1, 2),
    e(Ror, ZeroPage,         0x66, 2, 5),
    e(Ror, ZeroPageX,        0x76, 2, 6),
    e(Ror, Absolute,         0x6E, 3, 6),
    e(Ror, AbsoluteX,        0x7E, 3, 7),
    // Returns
    e(Rti, Implied,          0x40, 1, 6),
    e(Rts, Implied,          0x60, 1, 6),
    // SBC - Subtract with Carry
    e(Sbc, Immediate,        0xE9, 2, 2),
    e(Sbc, ZeroPage,         0xE5, 2, 3),
    e(Sbc, ZeroPageX,        0xF5, 2, 4),
    e(Sbc, Absolute,         0xED, 3, 4),
    e(Sbc, AbsoluteX,        0xFD, 3, 4),
    e(Sbc, AbsoluteY,        0xF9, 3, 4),
    e(Sbc, IndexedIndirectX, 0xE1, 2, 6),
    e(Sbc, IndirectIndexedY, 0xF1, 2, 5),
    // Flag operations
    e(Sec, Implied,          0x38, 1, 2),
    e(Sed, Implied,          0xF8, 1, 2),
    e(Sei, Implied,          0x78, 1, 2),
    // STA - Store Accumulator
    e(Sta, ZeroPage,         0x85, 2, 3),
    e(Sta, ZeroPageX,        0x95, 2, 4),
    e(Sta, Absolute,         0x8D, 3, 4),
    e(Sta, AbsoluteX,        0x9D, 3, 5),
    e(Sta, AbsoluteY,        0x99, 3, 5),
    e(Sta, IndexedIndirectX, 0x81, 2, 6),
    e(Sta, IndirectIndexedY, 0x91, 2, 6),
    // STX - Store X
    e(Stx, ZeroPage,         0x86, 2, 3),
    e(Stx, ZeroPageY,        0x96, 2, 4),
    e(Stx, Absolute,         0x8E, 3, 4),
    // STY - Store Y
    e(Sty, ZeroPage,         0x84, 2, 3),
    e(Sty, ZeroPageX,        0x94, 2, 4),
    e(Sty, Absolute,         0x8C, 3, 4),
    // Register transfers
    e(Tax, Implied,          0xAA, 1, 2),
    e(Tay, Implied,          0xA8, 1, 2),
    e(Tsx, Implied,          0xBA, 1, 2),
    e(Txa, Implied,          0x8A, 1, 2),
    e(Txs, Implied,          0x9A, 1, 2),
    e(Tya, Implied,          0x98, 1, 2),
];

static INSTRUCTION_INDEX: Lazy<HashMap<(Mnemonic, AddressMode), &'static InstructionEntry>> =
    Lazy::new(|| {
        let mut index = HashMap::with_capacity(INSTRUCTION_TABLE.len());
        for entry in INSTRUCTION_TABLE {
            index.insert((entry.mnemonic, entry.mode), entry);
        }
        index
    });

/// Look up an instruction by mnemonic and addressing mode.
pub fn lookup(mnemonic: Mnemonic, mode: AddressMode) -> Result<&'static InstructionEntry, AsmError> {
    INSTRUCTION_INDEX
        .get(&(mnemonic, mode))
        .copied()
        .ok_or(AsmError::UnknownInstruction { mnemonic, mode })
}

#[cfg(test)]
mod tests {
    use super::{lookup, INSTRUCTION_TABLE};
    use crate::error::AsmError;
    use crate::instructions::{AddressMode, Mnemonic};
    use std::collections::HashSet;
    use strum::IntoEnumIterator;

    #[test]
    fn lookup_lda_immediate() {
        let entry = lookup(Mnemonic::Lda, AddressMode::Immediate).unwrap();
        assert_eq!(entry.opcode, 0xA9);
        assert_eq!(entry.length, 2);
        assert_eq!(entry.cycles, 2);
    }

    #[test]
    fn lookup_jmp_indirect() {
        let entry = lookup(Mnemonic::Jmp, AddressMode::Indirect).unwrap();
        assert_eq!(entry.opcode, 0x6C);
        assert_eq!(entry.length, 3);
    }

    #[test]
    fn lookup_rejects_missing_mode() {
        let err = lookup(Mnemonic::Sta, AddressMode::Immediate).unwrap_err();
        assert!(matches!(
            err,
            AsmError::UnknownInstruction {
                mnemonic: Mnemonic::Sta,
                mode: AddressMode::Immediate,
            }
        ));
    }

    #[test]
    fn opcodes_are_unique() {
        let mut seen = HashSet::new();
        for entry in INSTRUCTION_TABLE {
            assert!(
                seen.insert(entry.opcode),
                "opcode {:02X} appears twice ({} {})",
                entry.opcode,
                entry.mnemonic,
                entry.mode
            );
        }
    }

    #[test]
    fn mnemonic_mode_pairs_are_unique() {
        let mut seen = HashSet::new();
        for entry in INSTRUCTION_TABLE {
            assert!(
                seen.insert((entry.mnemonic, entry.mode)),
                "duplicate table entry: {} {}",
                entry.mnemonic,
                entry.mode
            );
        }
    }

    #[test]
    fn every_mnemonic_has_an_entry() {
        for mnemonic in Mnemonic::iter() {
            assert!(
                INSTRUCTION_TABLE.iter().any(|e| e.mnemonic == mnemonic),
                "no table entry for {mnemonic}"
            );
        }
    }

    #[test]
    fn lengths_and_cycles_are_in_range() {
        for entry in INSTRUCTION_TABLE {
            assert!(
                (1..=3).contains(&entry.length),
                "{} {} has length {}",
                entry.mnemonic,
                entry.mode,
                entry.length
            );
            assert!(
                (1..=7).contains(&entry.cycles),
                "{} {} has cycles {}",
                entry.mnemonic,
                entry.mode,
                entry.cycles
            );
        }
    }

    #[test]
    fn length_matches_mode_class() {
        for entry in INSTRUCTION_TABLE {
            assert_eq!(
                entry.length,
                1 + entry.mode.operand_size(),
                "{} {} length disagrees with mode",
                entry.mnemonic,
                entry.mode
            );
        }
    }

    #[test]
    fn branch_mnemonics_only_encode_relative() {
        for entry in INSTRUCTION_TABLE {
            assert_eq!(
                entry.mnemonic.is_branch(),
                entry.mode == AddressMode::Relative,
                "{} {} branch flag disagrees with mode",
                entry.mnemonic,
                entry.mode
            );
        }
    }
}
