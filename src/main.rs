//! Main Program for Blockscramble
//! Run with `--help` for more instruction

// Copyright (C) 2023 Dheatly23
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Error};
use blockscramble::{
    image_io, key_path_for, scramble_with_key, seeded_rng, unscramble_with_key, Key, KeyFormat,
    DEFAULT_BLOCK_SIZE,
};
use clap::{ArgAction, Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version)]
struct Args {
    /// More logging (repeatable), RUST_LOG overrides
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scramble image blocks and write the key next to it
    Scramble {
        /// Input file
        input: PathBuf,

        /// Output file
        #[arg(short = 'o', long)]
        output: PathBuf,

        /// Block size
        #[arg(short = 'b', long, default_value_t = DEFAULT_BLOCK_SIZE, value_parser = parse_block_size)]
        block_size: usize,

        /// Random seed
        #[arg(long)]
        seed: Option<String>,

        /// Key file [default: <OUTPUT>.key.json]
        #[arg(short = 'k', long)]
        key: Option<PathBuf>,

        /// Write key as a bare index array, without geometry
        #[arg(long)]
        legacy_key: bool,
    },

    /// Restore a scrambled image with its key
    Unscramble {
        /// Scrambled input file
        input: PathBuf,

        /// Output file
        #[arg(short = 'o', long)]
        output: PathBuf,

        /// Block size [default: from key, or 32]
        #[arg(short = 'b', long, value_parser = parse_block_size)]
        block_size: Option<usize>,

        /// Key file [default: <INPUT>.key.json]
        #[arg(short = 'k', long)]
        key: Option<PathBuf>,
    },
}

fn parse_block_size(s: &str) -> Result<usize, String> {
    match s.parse() {
        Ok(0) => Err(blockscramble::Error::InvalidBlockSize(0).to_string()),
        Ok(v) => Ok(v),
        Err(e) => Err(format!("{e}")),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<(), Error> {
    let args = Args::parse();
    init_logging(args.verbose);

    match args.command {
        Command::Scramble {
            input,
            output,
            block_size,
            seed,
            key: key_path,
            legacy_key,
        } => {
            let mut random = seeded_rng(seed.as_deref());

            let im = image_io::load(&input)
                .with_context(|| format!("cannot read {}", input.display()))?;
            let (out, key) = scramble_with_key(image_io::as_array(&im)?, block_size, &mut random)?;

            // Key goes first, an image without its key can't be restored
            let key_path = key_path.unwrap_or_else(|| key_path_for(&output));
            let format = if legacy_key {
                KeyFormat::Legacy
            } else {
                KeyFormat::Full
            };
            key.save(&key_path, format)
                .with_context(|| format!("cannot write key {}", key_path.display()))?;

            if let Err(e) = image_io::save(&output, out.view(), im.color()) {
                if let Err(e) = fs::remove_file(&key_path) {
                    warn!("cannot remove key {}: {e}", key_path.display());
                }
                return Err(Error::new(e).context(format!("cannot write {}", output.display())));
            }
            info!("Scrambled image saved to {}", output.display());
            info!("Scrambling key saved to {}", key_path.display());
        }
        Command::Unscramble {
            input,
            output,
            block_size,
            key: key_path,
        } => {
            let key_path = key_path.unwrap_or_else(|| {
                let p = key_path_for(&input);
                info!("No key given, using {}", p.display());
                p
            });
            let key = Key::load(&key_path)?;

            let block_size = block_size.or(key.block_size()).unwrap_or_else(|| {
                warn!("Key has no block size, assuming {DEFAULT_BLOCK_SIZE}");
                DEFAULT_BLOCK_SIZE
            });

            let im = image_io::load(&input)
                .with_context(|| format!("cannot read {}", input.display()))?;
            let out = unscramble_with_key(image_io::as_array(&im)?, &key, Some(block_size))?;

            image_io::save(&output, out.view(), im.color())
                .with_context(|| format!("cannot write {}", output.display()))?;
            info!("Unscrambled image saved to {}", output.display());
        }
    }

    Ok(())
}
