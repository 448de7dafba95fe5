//! Marquee simulator
//!
//! Runs scenario files and the counter demo against the controller model.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use marquee_bench::demo::counter_stream;
use marquee_bench::palette::{binary_string, generate};
use marquee_bench::{Bench, Scenario};
use marquee_core::palette::PALETTE;
use marquee_core::{CharCount, Config, Timing};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "marquee-sim")]
#[command(about = "Clocked simulator for the Marquee character ticker")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run scenario files
    Run {
        /// Scenario files (TOML)
        #[arg(required = true)]
        scenarios: Vec<PathBuf>,
    },
    /// Stream the counter demo and print every frame
    Demo {
        /// Numbers to send
        #[arg(long, default_value = "20")]
        count: u32,

        /// Character slots (2, 4 or 8)
        #[arg(long, default_value = "8")]
        chars: u8,

        /// Pause after each number in microseconds
        #[arg(long, default_value = "2000")]
        gap_us: u64,

        /// Draw character colors instead of following color commands
        #[arg(long)]
        random_colors: bool,
    },
    /// Print the palette as GRB bit strings
    Palette,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Run { scenarios } => run(&scenarios),
        Commands::Demo {
            count,
            chars,
            gap_us,
            random_colors,
        } => demo(count, chars, gap_us, !random_colors),
        Commands::Palette => {
            palette();
            Ok(())
        }
    }
}

fn run(paths: &[PathBuf]) -> Result<()> {
    let mut failed = 0;
    for path in paths {
        let scenario = Scenario::load(path)
            .with_context(|| format!("Failed to load scenario {}", path.display()))?;
        match scenario.run() {
            Ok(report) => println!(
                "PASS {} ({} steps, {} frames, {:.3} ms)",
                path.display(),
                report.steps,
                report.frames,
                report.ticks as f64 * 1e3 / f64::from(scenario.device.clock_hz)
            ),
            Err(error) => {
                println!("FAIL {}: {}", path.display(), error);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        bail!("{} of {} scenarios failed", failed, paths.len());
    }
    Ok(())
}

fn demo(count: u32, chars: u8, gap_us: u64, fixed_color: bool) -> Result<()> {
    let config = Config {
        num_chars: CharCount::try_from(chars)
            .map_err(|e| anyhow::anyhow!("{}", e))
            .context("Invalid --chars")?,
        fixed_color,
        ..Config::default()
    };
    let mut bench = Bench::new(config, &Timing::default());

    // Blank frame after reset
    let frame = bench.next_frame(20_000).context("No frame after reset")?;
    info!(text = %frame.text(), "reset frame");

    for (n, message) in counter_stream(count).enumerate() {
        bench.send(&message);
        let frame = bench
            .next_frame(20_000 + gap_us)
            .with_context(|| format!("No frame for number {}", n))?;
        println!("{:>5} [{}] {:?}", n, frame.text(), frame.lit_palette_indices());
        println!("{}", frame.render());
        bench.run_us(gap_us)?;
    }
    Ok(())
}

fn palette() {
    for (index, (generated, stored)) in generate().iter().zip(PALETTE.iter()).enumerate() {
        let mark = if generated == stored { "" } else { "  MISMATCH" };
        println!("{:>2} {}{}", index, binary_string(*generated), mark);
    }
}
