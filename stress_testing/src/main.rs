//! Drives the bridge's exported symbols the way a managed caller would,
//! to check that results stay correct and nothing leaks under load.
//! Run with `--iterations` and `--threads` to change the load.

use anyhow::{bail, Result};
use clap::Parser;
use futures::future::try_join_all;
use gmp_bridge::big_number::EXPECTED_CONSTANT;
use gmp_bridge::{calculate_big_number, free_big_number, get_gmp_version, outstanding_big_numbers, setup_logging, BridgeStatus};
use std::ffi::CStr;
use tracing::info;

#[derive(Parser, Debug)]
#[command(about = "Stress the GMP bridge through its C ABI")]
struct Args {
    /// Sequential calls in the leak check.
    #[arg(long, default_value_t = 1000)]
    iterations: usize,

    /// Concurrent callers in the race check.
    #[arg(long, default_value_t = 8, value_parser = clap::value_parser!(u64).range(1..))]
    threads: u64,

    /// 0 = warn, 1 = info, 2 = debug, 3 = trace
    #[arg(long, default_value_t = 1)]
    verbosity: u32,
}

/// One round trip: compute, read, release.
fn call_once() -> Result<()> {
    let ptr = calculate_big_number();
    if ptr.is_null() {
        bail!("calculate_big_number returned null");
    }
    let digits = unsafe { CStr::from_ptr(ptr) }.to_string_lossy().to_string();
    let status = BridgeStatus::from_repr(free_big_number(ptr));
    if status != Some(BridgeStatus::Ok) {
        bail!("free_big_number failed: {status:?}");
    }
    if digits != EXPECTED_CONSTANT {
        bail!("Wrong value: {digits}");
    }
    Ok(())
}

fn leak_check(iterations: usize) -> Result<()> {
    let baseline = outstanding_big_numbers();
    for _ in 0..iterations {
        call_once()?;
    }
    let after = outstanding_big_numbers();
    if after != baseline {
        bail!("Outstanding strings went from {baseline} to {after} over {iterations} calls");
    }
    info!(iterations, "Leak check passed");
    Ok(())
}

async fn race_check(threads: u64, iterations: usize) -> Result<()> {
    if threads == 0 {
        bail!("Race check needs at least one thread");
    }
    let per_thread = (iterations / threads as usize).max(1);
    let workers = (0..threads).map(|_| {
        tokio::task::spawn_blocking(move || -> Result<()> {
            for _ in 0..per_thread {
                call_once()?;
            }
            Ok(())
        })
    });
    for result in try_join_all(workers).await? {
        result?;
    }
    info!(threads, per_thread, "Race check passed");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    if setup_logging(args.verbosity) != BridgeStatus::Ok as i32 {
        bail!("Could not set up logging");
    }

    let version = unsafe { CStr::from_ptr(get_gmp_version()) };
    info!("GMP version {}", version.to_string_lossy());

    leak_check(args.iterations)?;
    race_check(args.threads, args.iterations).await?;

    let leftover = outstanding_big_numbers();
    if leftover != 0 {
        bail!("{leftover} strings never released");
    }
    println!("All checks passed against GMP {}", version.to_string_lossy());
    Ok(())
}
