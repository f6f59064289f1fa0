// Copyright (c) 2018 The rust-gpio-cdev Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Print information about GPIO chips and their lines.
//!
//! ```text
//! cargo run --example gpioinfo -- chips
//! cargo run --example gpioinfo -- lines --chip 0
//! ```

use std::path::Path;

use anyhow::Context;
use gpiochip_info::{chip_paths, resolve_chip, AsGpioChip, Chip};
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(about = "A tool to get information about GPIO chips and lines.")]
struct Cli {
    #[structopt(subcommand)]
    cmd: Option<Command>,
}

#[derive(Debug, StructOpt)]
enum Command {
    /// Lists the available chips.
    Chips,
    /// Lists the lines of one chip, or of every chip.
    Lines {
        /// A full device path, a name under /dev, or a chip number.
        #[structopt(short, long)]
        chip: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::from_args();

    match cli.cmd.unwrap_or(Command::Chips) {
        Command::Chips => print_chips(),
        Command::Lines { chip: Some(desc) } => print_lines(&resolve_chip(&desc)?),
        Command::Lines { chip: None } => {
            for path in chip_paths()? {
                print_lines(&path)?;
            }
            Ok(())
        }
    }
}

fn print_chips() -> anyhow::Result<()> {
    println!(
        "{:<20} {:<16} {:<24} {:>5}",
        "Chip", "Name", "Label", "Lines"
    );
    for path in chip_paths()? {
        let chip = Chip::open(&path)?;
        let info = chip.chip_info()?;
        println!(
            "{:<20} {:<16} {:<24} {:>5}",
            path.display(),
            info.name(),
            info.label(),
            info.num_lines()
        );
    }
    Ok(())
}

fn print_lines(path: &Path) -> anyhow::Result<()> {
    let chip = Chip::open(path)?;

    println!("Chip: {}", path.display());
    println!(
        "    {:>6} {:<20} {:<20} Flags",
        "Offset", "Name", "Consumer"
    );
    for info in chip.line_infos()? {
        let info = info.with_context(|| format!("reading lines of {}", path.display()))?;
        println!(
            "    {:>6} {:<20} {:<20} {}",
            info.offset(),
            info.name().unwrap_or_default(),
            info.consumer().unwrap_or_default(),
            info.flags()
        );
    }

    chip.close()?;
    Ok(())
}
