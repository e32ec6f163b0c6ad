use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use dmgboy_core::{GameBoy, MachineConfig};

#[derive(Parser)]
#[command(version, about = "Run a DMG cartridge headlessly and dump the last frame")]
struct Args {
    /// Path to ROM file
    rom: PathBuf,

    /// Path to a 256-byte boot ROM; skipped when absent
    #[arg(long)]
    boot_rom: Option<PathBuf>,

    /// Number of frames to run
    #[arg(long, default_value_t = 60, conflicts_with = "mcycles")]
    frames: u32,

    /// Number of machine cycles to run instead of whole frames
    #[arg(long)]
    mcycles: Option<u64>,

    /// Write the final frame as raw RGB24 (160x144x3 bytes)
    #[arg(long)]
    out: Option<PathBuf>,

    /// Echo bytes shifted out of the serial port to stdout
    #[arg(long)]
    serial: bool,

    /// Start with zeroed WRAM/HRAM instead of the seeded pattern
    #[arg(long)]
    zero_ram: bool,
}

/// DMG-style grayscale: shade 0 is white, 3 is black.
fn shade_to_gray(shade: u8) -> u8 {
    match shade {
        0 => 0xFF,
        1 => 0xAA,
        2 => 0x55,
        _ => 0x00,
    }
}

fn frame_rgb24(frame: &[u8]) -> Vec<u8> {
    frame
        .iter()
        .flat_map(|&shade| {
            let gray = shade_to_gray(shade);
            [gray, gray, gray]
        })
        .collect()
}

/// Run the requested frames or cycle budget. Serial output goes to `serial`
/// when `--serial` is set. A CPU hang stops the run with its error.
fn run(gb: &mut GameBoy, args: &Args, serial: &mut impl Write) -> Result<()> {
    let mut echoed = 0;
    let mut echo_serial = |gb: &GameBoy| -> Result<()> {
        let output = gb.serial_output();
        if args.serial && output.len() > echoed {
            serial.write_all(&output[echoed..])?;
            serial.flush()?;
            echoed = output.len();
        }
        Ok(())
    };

    match args.mcycles {
        Some(budget) => {
            gb.run_mcycles(budget).context("emulation stopped")?;
            echo_serial(&*gb)?;
        }
        None => {
            for _ in 0..args.frames {
                gb.step_frame().context("emulation stopped")?;
                echo_serial(&*gb)?;
            }
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let rom = std::fs::read(&args.rom)
        .with_context(|| format!("failed to read ROM '{}'", args.rom.display()))?;
    log::info!("Playing ROM path: '{}'", args.rom.display());

    let boot_rom = args
        .boot_rom
        .as_ref()
        .map(|path| {
            std::fs::read(path)
                .with_context(|| format!("failed to read boot ROM '{}'", path.display()))
        })
        .transpose()?;

    let config = MachineConfig {
        boot_rom,
        seed_internal_ram: !args.zero_ram,
    };
    let mut gb = GameBoy::with_config(config, &rom).context("failed to start machine")?;

    run(&mut gb, &args, &mut std::io::stdout().lock())?;

    log::info!(
        "Ran {} machine cycles, {} frames",
        gb.cycles(),
        gb.frame_count()
    );

    if let Some(out) = &args.out {
        std::fs::write(out, frame_rgb24(gb.frame_buffer()))
            .with_context(|| format!("failed to write '{}'", out.display()))?;
    }
    Ok(())
}
