// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Bundled demo program.
//!
//! Copies a message to the screen through a zero-page pointer, then flashes
//! the border forever. Exercises forward references, both branch directions,
//! zero-page and indirect-indexed addressing, split pointers and the debug
//! records.

use crate::assembler::{unit, CompilationContext, Group};
use crate::error::AsmError;
use crate::instructions::Mnemonic;
use crate::operand::Operand;
use crate::util::{hi, lo};

/// Load address of the demo image.
pub const START: u16 = 0x1000;

const BORDER: u16 = 0xD020;
const BACKGROUND: u16 = 0xD021;
const SCREEN: u16 = 0x0400;
const ZP_PTR: u16 = 0x00FB;
const MESSAGE_PAGE: u16 = 0x1100;

pub fn demo_program() -> Group {
    Group::new("demo")
        .with(unit("init", init))
        .with(unit("copy", copy))
        .with(unit("flash", flash))
        .with(unit("data", data))
}

fn init(ctx: &mut CompilationContext) -> Result<(), AsmError> {
    ctx.define_label_at("zp_ptr", ZP_PTR)?;

    // point zp_ptr at the message
    let message = ctx.resolve("message")?;
    ctx.emit(Mnemonic::Lda, Operand::value(u16::from(lo(message))))?;
    ctx.emit(Mnemonic::Sta, Operand::value(ZP_PTR).zero_page())?;
    ctx.emit(Mnemonic::Lda, Operand::value(u16::from(hi(message))))?;
    ctx.emit(Mnemonic::Sta, Operand::value(ZP_PTR + 1).zero_page())?;

    // black border and background
    ctx.emit(Mnemonic::Lda, Operand::value(0x00))?;
    ctx.emit(Mnemonic::Sta, Operand::value(BORDER))?;
    ctx.emit(Mnemonic::Sta, Operand::value(BACKGROUND))?;
    Ok(())
}

fn copy(ctx: &mut CompilationContext) -> Result<(), AsmError> {
    ctx.define_label("copy")?;
    ctx.emit(Mnemonic::Ldy, Operand::value(0x00))?;
    ctx.define_label("copy_loop")?;
    ctx.emit(Mnemonic::Lda, Operand::label("zp_ptr").y().indirect())?;
    ctx.emit(Mnemonic::Beq, Operand::label("copy_done"))?;
    ctx.emit(Mnemonic::Sta, Operand::value(SCREEN).y())?;
    ctx.emit_implied(Mnemonic::Iny)?;
    ctx.emit(Mnemonic::Bne, Operand::label("copy_loop"))?;
    ctx.define_label("copy_done")?;
    Ok(())
}

fn flash(ctx: &mut CompilationContext) -> Result<(), AsmError> {
    ctx.define_label("flash")?;
    ctx.emit(Mnemonic::Inc, Operand::value(BORDER))?;
    ctx.breakpoint();
    ctx.emit(Mnemonic::Jmp, Operand::label("flash"))?;
    ctx.watch(ZP_PTR, 2);
    Ok(())
}

fn data(ctx: &mut CompilationContext) -> Result<(), AsmError> {
    // message lives on its own page; the serializer fills the gap with zeros
    ctx.jump(MESSAGE_PAGE);
    ctx.define_label("message")?;
    ctx.data_bytes(&screen_codes("HELLO FROM FORGE65"))?;
    ctx.data_bytes(&[0x00])?;

    // screen cursor pointer stored as a split pair
    ctx.define_double("cursor")?;
    ctx.data_word(SCREEN)?;
    Ok(())
}

/// ASCII to C64 screen codes, for the subset the message uses.
fn screen_codes(text: &str) -> Vec<u8> {
    text.bytes()
        .map(|byte| match byte {
            b'A'..=b'Z' => byte - b'A' + 1,
            b' ' => 0x20,
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{demo_program, START};
    use crate::assembler::Assembler;

    #[test]
    fn demo_assembles_and_resolves_the_message_pointer() {
        let mut asm = Assembler::new(START);
        asm.compile(&demo_program()).unwrap();
        let ctx = asm.context();

        // LDA #<message / STA $FB with message at 0x1100
        assert_eq!(ctx.image().read(0x1000), Some(0xA9));
        assert_eq!(ctx.image().read(0x1001), Some(0x00));
        assert_eq!(ctx.image().read(0x1002), Some(0x85));
        assert_eq!(ctx.image().read(0x1003), Some(0xFB));
        assert_eq!(ctx.image().read(0x1004), Some(0xA9));
        assert_eq!(ctx.image().read(0x1005), Some(0x11));

        assert_eq!(ctx.labels().lookup("message"), Some(0x1100));
    }

    #[test]
    fn demo_copy_loop_uses_indirect_indexed_addressing() {
        let mut asm = Assembler::new(START);
        asm.compile(&demo_program()).unwrap();
        let ctx = asm.context();

        assert_eq!(ctx.labels().lookup("copy_loop"), Some(0x1012));
        // LDA ($FB),Y
        assert_eq!(ctx.image().read(0x1012), Some(0xB1));
        assert_eq!(ctx.image().read(0x1013), Some(0xFB));
        // BNE back to copy_loop: -10 as two's complement
        assert_eq!(ctx.image().read(0x101A), Some(0xD0));
        assert_eq!(ctx.image().read(0x101B), Some(0xF6));
    }

    #[test]
    fn demo_collects_debug_records_and_split_pointer() {
        let mut asm = Assembler::new(START);
        asm.compile(&demo_program()).unwrap();
        let ctx = asm.context();

        let dbg = ctx.debug_info();
        assert_eq!(dbg.breakpoints().len(), 1);
        assert_eq!(dbg.watches().len(), 1);

        let cursor_lo = ctx.labels().lookup("cursor_lo").unwrap();
        let cursor_hi = ctx.labels().lookup("cursor_hi").unwrap();
        assert_eq!(cursor_hi, cursor_lo + 1);
        assert_eq!(ctx.image().read(cursor_lo), Some(0x00));
        assert_eq!(ctx.image().read(cursor_hi), Some(0x04));
    }
}
