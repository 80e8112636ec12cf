// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Compilation context, generator-unit tree and the two-pass driver.
//!
//! A program is a tree of [`Unit`]s that emit instructions and data into a
//! shared [`CompilationContext`]. The driver runs the tree twice: the
//! discovery pass hands out placeholder addresses for names that are not
//! defined yet, the final pass re-runs the identical tree with every label
//! known. Both passes must produce the same instruction and byte counts,
//! otherwise the addresses collected during discovery would be wrong.

use log::{debug, info};

use crate::debug::DebugInfo;
use crate::error::AsmError;
use crate::imagestore::{ImageStore, OwnerId, StoreResult};
use crate::instructions::table;
use crate::instructions::{AddressMode, InstructionEntry, Mnemonic};
use crate::labels::LabelTable;
use crate::operand::{Operand, OperandValue};
use crate::processor::Processor;
use crate::util::{hi, lo};

/// The two passes of a compilation run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// First execution: collect label addresses, tolerate unresolved names.
    Discovery,
    /// Second execution: every name must resolve, emitted bytes are final.
    Final,
}

/// Per-pass emission totals. Instruction and byte counts must agree between
/// the two passes; cycles are informational.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PassCounts {
    pub instructions: u32,
    pub bytes: u32,
    pub cycles: u32,
}

/// A code-generating unit. Units nest through [`CompilationContext::run_unit`],
/// which attributes every byte written while a unit runs to that unit.
pub trait Unit {
    fn name(&self) -> &str;
    fn compile(&self, ctx: &mut CompilationContext) -> Result<(), AsmError>;
}

/// A leaf unit wrapping a closure.
pub struct FnUnit<F> {
    name: String,
    body: F,
}

/// Build a leaf unit from a closure.
pub fn unit<F>(name: impl Into<String>, body: F) -> FnUnit<F>
where
    F: Fn(&mut CompilationContext) -> Result<(), AsmError>,
{
    FnUnit {
        name: name.into(),
        body,
    }
}

impl<F> Unit for FnUnit<F>
where
    F: Fn(&mut CompilationContext) -> Result<(), AsmError>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn compile(&self, ctx: &mut CompilationContext) -> Result<(), AsmError> {
        (self.body)(ctx)
    }
}

/// A named group of child units, compiled in order.
pub struct Group {
    name: String,
    children: Vec<Box<dyn Unit>>,
}

impl Group {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
        }
    }

    pub fn with(mut self, child: impl Unit + 'static) -> Self {
        self.children.push(Box::new(child));
        self
    }

    pub fn push(&mut self, child: impl Unit + 'static) {
        self.children.push(Box::new(child));
    }
}

impl Unit for Group {
    fn name(&self) -> &str {
        &self.name
    }

    fn compile(&self, ctx: &mut CompilationContext) -> Result<(), AsmError> {
        for child in &self.children {
            ctx.run_unit(child.as_ref())?;
        }
        Ok(())
    }
}

/// Shared state of one compilation run: memory image, cursor, label table,
/// owner attribution and debug records.
pub struct CompilationContext {
    phase: Phase,
    processor: Processor,
    image: ImageStore,
    labels: LabelTable,
    owner_names: Vec<String>,
    owner_stack: Vec<OwnerId>,
    counts: PassCounts,
    debug: DebugInfo,
}

impl CompilationContext {
    pub fn new(start: u16) -> Self {
        Self {
            phase: Phase::Discovery,
            processor: Processor::new(start),
            image: ImageStore::new(),
            labels: LabelTable::new(),
            owner_names: vec!["program".to_string()],
            owner_stack: vec![OwnerId(0)],
            counts: PassCounts::default(),
            debug: DebugInfo::default(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn processor(&self) -> &Processor {
        &self.processor
    }

    pub fn image(&self) -> &ImageStore {
        &self.image
    }

    pub fn labels(&self) -> &LabelTable {
        &self.labels
    }

    pub fn counts(&self) -> PassCounts {
        self.counts
    }

    pub fn debug_info(&self) -> &DebugInfo {
        &self.debug
    }

    /// Address the next byte will be written to.
    pub fn current(&self) -> u16 {
        self.processor.current()
    }

    /// Continue writing at `addr`.
    pub fn jump(&mut self, addr: u16) {
        self.processor.jump(addr);
    }

    /// Bind `name` to the current cursor address.
    pub fn define_label(&mut self, name: &str) -> Result<u16, AsmError> {
        let addr = self.current();
        self.labels.define(name, addr, self.phase)
    }

    /// Bind `name` to an explicit address.
    pub fn define_label_at(&mut self, name: &str, addr: u16) -> Result<u16, AsmError> {
        self.labels.define(name, addr, self.phase)
    }

    /// Bind `{name}_lo` / `{name}_hi` to the current cursor address and the
    /// byte after it, for pointers stored split across two bytes.
    pub fn define_double(&mut self, name: &str) -> Result<u16, AsmError> {
        let addr = self.current();
        self.labels.define_double(name, addr, self.phase)
    }

    /// Resolve a label to an address; placeholder during discovery when the
    /// name is not defined yet.
    pub fn resolve(&mut self, name: &str) -> Result<u16, AsmError> {
        let pc = self.current();
        self.labels.resolve(name, pc, self.phase)
    }

    /// Encode one instruction. The operand's label (if any) is resolved
    /// first; the resulting value drives addressing-mode selection. Returns
    /// the number of bytes written, and leaves the cursor just past them.
    pub fn emit(&mut self, mnemonic: Mnemonic, operand: Operand) -> Result<u16, AsmError> {
        let value = match operand.payload() {
            OperandValue::Value(value) => *value,
            OperandValue::Label(name) => {
                let name = name.clone();
                self.resolve(&name)?
            }
        };

        if mnemonic.is_branch() {
            return self.emit_branch(mnemonic, value);
        }

        let mode = operand.select_mode(value)?;
        let entry = table::lookup(mnemonic, mode)?;
        match entry.length {
            2 => self.emit_entry(entry, &[lo(value)]),
            3 => self.emit_entry(entry, &[lo(value), hi(value)]),
            _ => self.emit_entry(entry, &[]),
        }
    }

    /// Encode an operand-less instruction (NOP, RTS, ASL-on-accumulator, ...).
    pub fn emit_implied(&mut self, mnemonic: Mnemonic) -> Result<u16, AsmError> {
        let entry = table::lookup(mnemonic, AddressMode::Implied)?;
        self.emit_entry(entry, &[])
    }

    /// Encode with an explicit addressing mode and raw operand bytes,
    /// bypassing mode selection. The byte count must match the table length.
    pub fn emit_with_mode(
        &mut self,
        mnemonic: Mnemonic,
        mode: AddressMode,
        operand_bytes: &[u8],
    ) -> Result<u16, AsmError> {
        let entry = table::lookup(mnemonic, mode)?;
        self.emit_entry(entry, operand_bytes)
    }

    fn emit_branch(&mut self, mnemonic: Mnemonic, target: u16) -> Result<u16, AsmError> {
        let entry = table::lookup(mnemonic, AddressMode::Relative)?;
        let offset = i32::from(target) - (i32::from(self.current()) + 2);
        let byte = match self.phase {
            // placeholder targets make the displacement meaningless here
            Phase::Discovery => offset as u8,
            Phase::Final => {
                if !(-128..=127).contains(&offset) {
                    return Err(AsmError::BranchOutOfRange { target, offset });
                }
                offset as i8 as u8
            }
        };
        self.emit_entry(entry, &[byte])
    }

    fn emit_entry(
        &mut self,
        entry: &InstructionEntry,
        operand_bytes: &[u8],
    ) -> Result<u16, AsmError> {
        let expected = usize::from(entry.length) - 1;
        if operand_bytes.len() != expected {
            return Err(AsmError::ArityError {
                mnemonic: entry.mnemonic,
                expected,
                got: operand_bytes.len(),
            });
        }
        self.write_byte(entry.opcode)?;
        for byte in operand_bytes {
            self.write_byte(*byte)?;
        }
        self.counts.instructions += 1;
        self.counts.cycles += u32::from(entry.cycles);
        Ok(u16::from(entry.length))
    }

    /// Emit raw data bytes at the cursor.
    pub fn data_bytes(&mut self, bytes: &[u8]) -> Result<u16, AsmError> {
        for byte in bytes {
            self.write_byte(*byte)?;
        }
        Ok(bytes.len() as u16)
    }

    /// Emit a 16-bit value low byte first.
    pub fn data_word(&mut self, value: u16) -> Result<u16, AsmError> {
        self.write_byte(lo(value))?;
        self.write_byte(hi(value))?;
        Ok(2)
    }

    fn write_byte(&mut self, value: u8) -> Result<(), AsmError> {
        let addr = self.current();
        let owner = self.current_owner();
        match self.image.store(addr, value, owner) {
            StoreResult::Stored => {
                self.processor.advance(1);
                self.counts.bytes += 1;
                Ok(())
            }
            StoreResult::Conflict(existing) => Err(AsmError::OwnershipConflict {
                addr,
                existing: self.owner_name(existing).to_string(),
                new: self.owner_name(owner).to_string(),
            }),
        }
    }

    /// Run `f` with writes attributed to `name`, nested under the current
    /// owner. The previous owner is restored on success and on error alike.
    pub fn with_owner<F>(&mut self, name: &str, f: F) -> Result<(), AsmError>
    where
        F: FnOnce(&mut Self) -> Result<(), AsmError>,
    {
        let parent = self.current_owner();
        let qualified = if parent == OwnerId(0) {
            name.to_string()
        } else {
            format!("{}.{}", self.owner_name(parent), name)
        };
        let id = self.intern_owner(&qualified);
        self.owner_stack.push(id);
        let result = f(self);
        self.owner_stack.pop();
        result
    }

    /// Compile a child unit with ownership scoped to it.
    pub fn run_unit(&mut self, unit: &dyn Unit) -> Result<(), AsmError> {
        debug!("unit `{}` at ${:04x}", unit.name(), self.current());
        self.with_owner(unit.name(), |ctx| unit.compile(ctx))
    }

    pub fn owner_name(&self, id: OwnerId) -> &str {
        &self.owner_names[id.0 as usize]
    }

    fn current_owner(&self) -> OwnerId {
        self.owner_stack.last().copied().unwrap_or(OwnerId(0))
    }

    fn intern_owner(&mut self, name: &str) -> OwnerId {
        if let Some(pos) = self.owner_names.iter().position(|owner| owner == name) {
            return OwnerId(pos as u32);
        }
        self.owner_names.push(name.to_string());
        OwnerId((self.owner_names.len() - 1) as u32)
    }

    /// Record a breakpoint at the cursor. Debug records are only collected
    /// during the final pass.
    pub fn breakpoint(&mut self) {
        if self.phase == Phase::Final {
            let addr = self.current();
            self.debug.add_breakpoint(addr);
        }
    }

    /// Record a watch over `count` bytes starting at `addr`.
    pub fn watch(&mut self, addr: u16, count: u16) {
        if self.phase == Phase::Final {
            self.debug.add_watch(addr, count);
        }
    }

    fn begin_pass(&mut self, phase: Phase) {
        self.phase = phase;
        self.processor.reset();
        self.image = ImageStore::new();
        self.counts = PassCounts::default();
        self.debug.clear();
        if phase == Phase::Discovery {
            self.labels = LabelTable::new();
        }
    }
}

/// The two-pass compilation driver.
pub struct Assembler {
    ctx: CompilationContext,
}

impl Assembler {
    pub fn new(start: u16) -> Self {
        Self {
            ctx: CompilationContext::new(start),
        }
    }

    /// Run `root` through both passes. Fails on the first error; on success
    /// the context holds the final image, labels and debug records.
    pub fn compile(&mut self, root: &dyn Unit) -> Result<PassCounts, AsmError> {
        let discovery = self.run_pass(Phase::Discovery, root)?;
        let final_counts = self.run_pass(Phase::Final, root)?;

        if discovery.instructions != final_counts.instructions
            || discovery.bytes != final_counts.bytes
        {
            return Err(AsmError::PassMismatch {
                discovery_instructions: discovery.instructions,
                discovery_bytes: discovery.bytes,
                final_instructions: final_counts.instructions,
                final_bytes: final_counts.bytes,
            });
        }

        info!(
            "assembled `{}`: {} instructions, {} bytes, {} cycles, {} labels",
            root.name(),
            final_counts.instructions,
            final_counts.bytes,
            final_counts.cycles,
            self.ctx.labels().len()
        );
        Ok(final_counts)
    }

    fn run_pass(&mut self, phase: Phase, root: &dyn Unit) -> Result<PassCounts, AsmError> {
        debug!(
            "{phase:?} pass from ${:04x}",
            self.ctx.processor().start()
        );
        self.ctx.begin_pass(phase);
        self.ctx.run_unit(root)?;
        Ok(self.ctx.counts())
    }

    pub fn context(&self) -> &CompilationContext {
        &self.ctx
    }
}
