// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

// Command-line options and output generation for assembled programs.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use clap::Parser;
use log::info;

use crate::assembler::{Assembler, PassCounts, Unit};
use crate::debug;
use crate::error::AsmError;
use crate::util::{hi, lo};

const VERSION: &str = "1.0";
const LONG_ABOUT: &str = "Two-pass 6502 assembler engine with a bundled demo program.

Outputs are opt-in: specify at least one of -p/--prg, -l/--labels, -r/--refs,
-b/--breakpoints, -w/--watches, or -m/--map.
Use -o/--outfile to set the output base name when filenames are omitted.";

#[derive(Parser, Debug)]
#[command(
    name = "forge65",
    version = VERSION,
    about = "Two-pass 6502 assembler engine",
    long_about = LONG_ABOUT
)]
pub struct Cli {
    #[arg(
        short = 'o',
        long = "outfile",
        value_name = "BASE",
        long_help = "Output filename base when other flags omit filenames. Defaults to the program name."
    )]
    pub outfile: Option<String>,
    #[arg(
        short = 'p',
        long = "prg",
        value_name = "FILE",
        num_args = 0..=1,
        default_missing_value = "",
        long_help = "Emit the program image: 2-byte little-endian load address followed by the populated range, gaps filled with 00. FILE is optional; when omitted, the output base is used and a .prg extension is added."
    )]
    pub prg_name: Option<String>,
    #[arg(
        short = 'l',
        long = "labels",
        value_name = "FILE",
        num_args = 0..=1,
        default_missing_value = "",
        long_help = "Emit the label/address listing. FILE is optional; when omitted, the output base is used and a .labels extension is added."
    )]
    pub labels_name: Option<String>,
    #[arg(
        short = 'r',
        long = "refs",
        value_name = "FILE",
        num_args = 0..=1,
        default_missing_value = "",
        long_help = "Emit the forward references recorded during the discovery pass. FILE is optional; when omitted, the output base is used and a .refs extension is added."
    )]
    pub refs_name: Option<String>,
    #[arg(
        short = 'b',
        long = "breakpoints",
        value_name = "FILE",
        num_args = 0..=1,
        default_missing_value = "",
        long_help = "Emit the breakpoint list in monitor syntax. FILE is optional; when omitted, the output base is used and a .break extension is added."
    )]
    pub breakpoints_name: Option<String>,
    #[arg(
        short = 'w',
        long = "watches",
        value_name = "FILE",
        num_args = 0..=1,
        default_missing_value = "",
        long_help = "Emit the watch list in monitor syntax. FILE is optional; when omitted, the output base is used and a .watch extension is added."
    )]
    pub watches_name: Option<String>,
    #[arg(
        short = 'm',
        long = "map",
        value_name = "FILE",
        num_args = 0..=1,
        default_missing_value = "",
        long_help = "Emit the memory map of populated ranges per owning unit. FILE is optional; when omitted, the output base is used and a .map extension is added."
    )]
    pub map_name: Option<String>,
}

/// Assemble `program` and write the outputs selected on the command line.
pub fn run(program: &dyn Unit, start: u16, cli: &Cli) -> Result<PassCounts, AsmError> {
    let any_output = cli.prg_name.is_some()
        || cli.labels_name.is_some()
        || cli.refs_name.is_some()
        || cli.breakpoints_name.is_some()
        || cli.watches_name.is_some()
        || cli.map_name.is_some();
    if !any_output {
        return Err(AsmError::Cli(
            "No outputs selected. Specify at least one of -p/--prg, -l/--labels, -r/--refs, \
             -b/--breakpoints, -w/--watches, or -m/--map"
                .to_string(),
        ));
    }

    let base = cli
        .outfile
        .clone()
        .unwrap_or_else(|| program.name().to_string());

    let mut assembler = Assembler::new(start);
    let counts = assembler.compile(program)?;
    let ctx = assembler.context();

    if let Some(path) = resolve_output_path(&base, cli.prg_name.clone(), "prg") {
        let mut file = File::create(&path)?;
        match ctx.image().extent() {
            Some((first, last)) => ctx.image().write_prg(&mut file, first, last)?,
            None => file.write_all(&[lo(start), hi(start)])?,
        }
        info!("wrote {path}");
    }
    if let Some(path) = resolve_output_path(&base, cli.labels_name.clone(), "labels") {
        debug::export_labels(ctx, File::create(&path)?)?;
        info!("wrote {path}");
    }
    if let Some(path) = resolve_output_path(&base, cli.refs_name.clone(), "refs") {
        debug::export_references(ctx, File::create(&path)?)?;
        info!("wrote {path}");
    }
    if let Some(path) = resolve_output_path(&base, cli.breakpoints_name.clone(), "break") {
        debug::export_breakpoints(ctx, File::create(&path)?)?;
        info!("wrote {path}");
    }
    if let Some(path) = resolve_output_path(&base, cli.watches_name.clone(), "watch") {
        debug::export_watches(ctx, File::create(&path)?)?;
        info!("wrote {path}");
    }
    if let Some(path) = resolve_output_path(&base, cli.map_name.clone(), "map") {
        debug::export_memory_map(ctx, File::create(&path)?)?;
        info!("wrote {path}");
    }

    Ok(counts)
}

fn resolve_output_path(base: &str, name: Option<String>, extension: &str) -> Option<String> {
    let name = name?;
    if name.is_empty() {
        return Some(format!("{base}.{extension}"));
    }
    if Path::new(&name).extension().is_some() {
        Some(name)
    } else {
        Some(format!("{name}.{extension}"))
    }
}

#[cfg(test)]
mod tests {
    use super::{resolve_output_path, run, Cli};
    use crate::assembler::{unit, Group};
    use crate::error::AsmError;
    use clap::Parser;

    #[test]
    fn cli_parses_outputs() {
        let cli = Cli::parse_from(["forge65", "-p", "-l", "-o", "out"]);
        assert_eq!(cli.prg_name, Some(String::new()));
        assert_eq!(cli.labels_name, Some(String::new()));
        assert_eq!(cli.outfile, Some("out".to_string()));
        assert_eq!(cli.breakpoints_name, None);
    }

    #[test]
    fn run_requires_an_output() {
        let cli = Cli::parse_from(["forge65"]);
        let program = Group::new("empty").with(unit("code", |_ctx| Ok(())));
        let err = run(&program, 0x1000, &cli).unwrap_err();
        assert!(matches!(err, AsmError::Cli(_)));
    }

    #[test]
    fn resolve_output_path_uses_base_on_empty_name() {
        assert_eq!(
            resolve_output_path("prog", Some(String::new()), "prg"),
            Some("prog.prg".to_string())
        );
    }

    #[test]
    fn resolve_output_path_preserves_extension() {
        assert_eq!(
            resolve_output_path("prog", Some("out.bin".to_string()), "prg"),
            Some("out.bin".to_string())
        );
    }

    #[test]
    fn resolve_output_path_appends_extension() {
        assert_eq!(
            resolve_output_path("prog", Some("out".to_string()), "prg"),
            Some("out.prg".to_string())
        );
    }

    #[test]
    fn resolve_output_path_skips_unrequested_outputs() {
        assert_eq!(resolve_output_path("prog", None, "prg"), None);
    }
}
