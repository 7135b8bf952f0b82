//! # Allocprobe
//!
//! `alloc` allocates a requested number of mebibytes with one of two
//! strategies, waits for the operator, writes `'w'` into every byte, waits
//! again and exits. Watch the process with `top`, `/proc/<pid>/status` or a
//! similar tool between the prompts.
//!
//! ```sh
//! cargo run --release --bin=alloc -- mmap 100
//! ```
//!
//! ## Modules
//!
//! - `allocator`: Maps the command line strategy to an allocator and runs the probe.
//!
//! ## External Crates
//!
//! - `log`: Used for logging throughout the crate. Set `RUST_LOG` to tune verbosity.
pub mod allocator;

use indicatif::MultiProgress;
use indicatif_log_bridge::LogWrapper;

/// Installs `env_logger` behind a progress-aware log bridge.
///
/// Log lines and progress bars share stderr; the returned [`MultiProgress`]
/// must be used for every bar so lines are not torn.
pub fn init_logging_with_progress() -> anyhow::Result<MultiProgress> {
    let logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).build();
    let progress = MultiProgress::new();
    LogWrapper::new(progress.clone(), logger).try_init()?;
    Ok(progress)
}
