// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

// Error taxonomy for the assembler engine.

use thiserror::Error;

use crate::instructions::{AddressMode, Mnemonic};

#[derive(Error, Debug)]
pub enum AsmError {
    #[error("Unknown instruction: {mnemonic} has no {mode} form")]
    UnknownInstruction {
        mnemonic: Mnemonic,
        mode: AddressMode,
    },

    #[error("Duplicate label: `{0}`")]
    DuplicateLabel(String),

    #[error("Undefined label: `{0}`")]
    UndefinedLabel(String),

    #[error("Ownership conflict at ${addr:04x}: `{new}` overwrites byte owned by `{existing}`")]
    OwnershipConflict {
        addr: u16,
        existing: String,
        new: String,
    },

    #[error("Branch out of range: target ${target:04x} is {offset} bytes away")]
    BranchOutOfRange { target: u16, offset: i32 },

    #[error("Wrong operand count for {mnemonic}: expected {expected} operand bytes, got {got}")]
    ArityError {
        mnemonic: Mnemonic,
        expected: usize,
        got: usize,
    },

    #[error("No indirect indexed mode for 16-bit address ${0:04x}")]
    IllegalIndirect(u16),

    #[error("Value {0} does not fit in 16 bits")]
    ValueRange(i32),

    #[error(
        "Pass size mismatch: discovery emitted {discovery_instructions} instructions / \
         {discovery_bytes} bytes, final pass emitted {final_instructions} / {final_bytes}"
    )]
    PassMismatch {
        discovery_instructions: u32,
        discovery_bytes: u32,
        final_instructions: u32,
        final_bytes: u32,
    },

    #[error("Output selection: {0}")]
    Cli(String),

    #[error("Failed to write output")]
    Io(#[from] std::io::Error),
}
