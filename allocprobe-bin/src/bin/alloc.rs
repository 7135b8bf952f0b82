use std::io::{self, Write};

use allocprobe_bin::allocator::{Strategy, run};
use allocprobe_bin::init_logging_with_progress;
use allocprobe_core::util::{Size, parse_mebibytes};
use anyhow::Result;
use clap::Parser;
use log::{debug, info};

const USAGE: &str = "alloc <malloc|mmap> <amount-in-mb>";
const EXAMPLE: &str = "example: ./alloc mmap 100";

/// CLI arguments for the `alloc` binary.
///
/// Exactly two positionals are accepted; help and version flags are disabled
/// so any other invocation is a usage error.
#[derive(Debug, Parser)]
#[command(
    name = "alloc",
    override_usage = USAGE,
    disable_help_flag = true,
    disable_version_flag = true
)]
struct CliArgs {
    /// The allocation strategy to use.
    #[arg(value_enum)]
    strategy: Strategy,
    /// The amount to allocate in MB. Parsed leniently: non-numeric input means 0.
    #[arg(allow_hyphen_values = true)]
    size_mb: String,
}

fn main() -> Result<()> {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            let _ = writeln!(io::stderr(), "usage: {}\n{}", USAGE, EXAMPLE);
            std::process::exit(e.exit_code());
        }
    };

    let progress = init_logging_with_progress()?;
    debug!("CLI args: {:?}", args);

    let size = Size::MB(parse_mebibytes(&args.size_mb));
    info!("Requested size: {}", size);

    let memory = run(
        args.strategy,
        size,
        io::stdin().lock(),
        io::stdout().lock(),
        Some(progress),
    )?;
    info!("Exiting with {} bytes still allocated", memory.len);
    Ok(())
}
