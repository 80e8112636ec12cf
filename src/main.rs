// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

// CLI entrypoint for forge65.

use clap::Parser;

use forge65::cli::{self, Cli};
use forge65::demo;

fn main() {
    let env = env_logger::Env::default().filter_or("FORGE65_LOG", "info");
    env_logger::init_from_env(env);

    let cli = Cli::parse();
    let program = demo::demo_program();
    if let Err(err) = cli::run(&program, demo::START, &cli) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
