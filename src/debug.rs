// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Debug records and plain-text exports.
//!
//! Breakpoints and watches are collected during the final pass; the export
//! functions are read-only projections of the finished compilation context,
//! meant for monitor scripts and post-mortem inspection.

use std::io::{self, Write};

use crate::assembler::CompilationContext;
use crate::imagestore::OwnerId;

/// Stop-here marker for an emulator monitor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Breakpoint {
    pub addr: u16,
}

/// Watched byte range: `count` bytes starting at `addr`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Watch {
    pub addr: u16,
    pub count: u16,
}

/// Debug records collected while the final pass runs.
#[derive(Debug, Default)]
pub struct DebugInfo {
    breakpoints: Vec<Breakpoint>,
    watches: Vec<Watch>,
}

impl DebugInfo {
    pub fn add_breakpoint(&mut self, addr: u16) {
        self.breakpoints.push(Breakpoint { addr });
    }

    pub fn add_watch(&mut self, addr: u16, count: u16) {
        self.watches.push(Watch { addr, count });
    }

    pub fn breakpoints(&self) -> &[Breakpoint] {
        &self.breakpoints
    }

    pub fn watches(&self) -> &[Watch] {
        &self.watches
    }

    pub fn clear(&mut self) {
        self.breakpoints.clear();
        self.watches.clear();
    }
}

/// Label/address listing, one line per label.
pub fn export_labels<W: Write>(ctx: &CompilationContext, out: W) -> io::Result<()> {
    ctx.labels().dump(out)
}

/// Forward references recorded during discovery.
pub fn export_references<W: Write>(ctx: &CompilationContext, mut out: W) -> io::Result<()> {
    for reference in ctx.labels().references() {
        writeln!(out, "{:<16}: used at {:04x}", reference.name, reference.pc)?;
    }
    Ok(())
}

/// Breakpoint list in monitor syntax.
pub fn export_breakpoints<W: Write>(ctx: &CompilationContext, mut out: W) -> io::Result<()> {
    for breakpoint in ctx.debug_info().breakpoints() {
        writeln!(out, "break {:04x}", breakpoint.addr)?;
    }
    Ok(())
}

/// Watch list in monitor syntax, one `watch first last` line per range.
pub fn export_watches<W: Write>(ctx: &CompilationContext, mut out: W) -> io::Result<()> {
    for watch in ctx.debug_info().watches() {
        let last = watch.addr.wrapping_add(watch.count.saturating_sub(1));
        writeln!(out, "watch {:04x} {:04x}", watch.addr, last)?;
    }
    Ok(())
}

/// Memory map: populated ranges coalesced per owning unit.
pub fn export_memory_map<W: Write>(ctx: &CompilationContext, mut out: W) -> io::Result<()> {
    let cells = ctx.image().owned_cells();
    let mut run: Option<(u16, u16, OwnerId)> = None;

    for (addr, owner) in cells {
        match run {
            Some((start, end, run_owner))
                if owner == run_owner && addr == end.wrapping_add(1) =>
            {
                run = Some((start, addr, run_owner));
            }
            Some((start, end, run_owner)) => {
                writeln!(
                    out,
                    "{:04x}-{:04x}  {}",
                    start,
                    end,
                    ctx.owner_name(run_owner)
                )?;
                run = Some((addr, addr, owner));
            }
            None => run = Some((addr, addr, owner)),
        }
    }
    if let Some((start, end, run_owner)) = run {
        writeln!(
            out,
            "{:04x}-{:04x}  {}",
            start,
            end,
            ctx.owner_name(run_owner)
        )?;
    }
    Ok(())
}

/// Processor state after the final pass.
pub fn export_processor_state<W: Write>(ctx: &CompilationContext, mut out: W) -> io::Result<()> {
    let cpu = ctx.processor();
    writeln!(
        out,
        "start: {:04x}  pc: {:04x}  a: {:02x}  x: {:02x}  y: {:02x}  sp: {:02x}",
        cpu.start(),
        cpu.current(),
        cpu.a,
        cpu.x,
        cpu.y,
        cpu.sp
    )
}

#[cfg(test)]
mod tests {
    use super::{
        export_breakpoints, export_memory_map, export_processor_state, export_references,
        export_watches,
    };
    use crate::assembler::{unit, Assembler, Group};
    use crate::instructions::Mnemonic;
    use crate::operand::Operand;

    fn compiled() -> Assembler {
        let program = Group::new("prog")
            .with(unit("code", |ctx| {
                ctx.emit(Mnemonic::Jmp, Operand::label("data"))?;
                ctx.breakpoint();
                ctx.emit_implied(Mnemonic::Rts)?;
                ctx.watch(0x1000, 3);
                Ok(())
            }))
            .with(unit("data", |ctx| {
                ctx.define_label("data")?;
                ctx.data_bytes(&[0x01, 0x02])?;
                Ok(())
            }));

        let mut asm = Assembler::new(0x1000);
        asm.compile(&program).unwrap();
        asm
    }

    #[test]
    fn breakpoints_and_watches_render_monitor_lines() {
        let asm = compiled();
        let mut out = Vec::new();
        export_breakpoints(asm.context(), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "break 1003\n");

        let mut out = Vec::new();
        export_watches(asm.context(), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "watch 1000 1002\n");
    }

    #[test]
    fn references_list_discovery_uses() {
        let asm = compiled();
        let mut out = Vec::new();
        export_references(asm.context(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("data"));
        assert!(text.contains("1000"));
    }

    #[test]
    fn processor_state_reports_cursor_and_registers() {
        let asm = compiled();
        let mut out = Vec::new();
        export_processor_state(asm.context(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("start: 1000"));
        assert!(text.contains("sp: ff"));
    }

    #[test]
    fn memory_map_coalesces_per_unit_runs() {
        let asm = compiled();
        let mut out = Vec::new();
        export_memory_map(asm.context(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("1000-1003"));
        assert!(lines[0].ends_with("prog.code"));
        assert!(lines[1].starts_with("1004-1005"));
        assert!(lines[1].ends_with("prog.data"));
    }
}
