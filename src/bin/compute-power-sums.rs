//! The party-side harness: compute a power vector and fold it into the
//! shared accumulator
//!
//! Reads a job file (modulus, secret, opened difference, power count, and
//! the peer powers, one decimal per line) and performs the fold under the
//! accumulator's file barrier.

use std::{fs::File, io::BufReader, path::PathBuf, process::exit, time::Instant};

use clap::Parser;
use env_logger::Builder;
use powermix::{
    error::ShuffleError,
    shuffle::{FileBarrier, FileSumStore, PowerJob, SumAccumulator},
};
use tracing::log::{self, LevelFilter};

/// The command line interface of the harness
#[derive(Clone, Parser, Debug)]
struct Args {
    /// The power-sum job description file
    input_file: PathBuf,
    /// The shared accumulator state file
    accumulator_file: PathBuf,
}

fn main() {
    init_logger();
    let args = Args::parse();

    if let Err(e) = run(&args) {
        log::error!("power-sum computation failed: {e}");
        exit(1);
    }
}

/// Run the job behind the CLI
fn run(args: &Args) -> Result<(), ShuffleError> {
    let input =
        File::open(&args.input_file).map_err(|e| ShuffleError::Storage(e.to_string()))?;
    let job = PowerJob::parse(BufReader::new(input))?;
    log::info!(
        "parsed a {}-power job over a {}-bit field",
        job.b_pows.len(),
        job.field.bit_length(),
    );

    let compute_start = Instant::now();
    let powers = job.compute()?;
    log::info!("computed {} powers in {:?}", powers.len(), compute_start.elapsed());

    let store = FileSumStore::new(&args.accumulator_file);
    let barrier = FileBarrier::for_store(&args.accumulator_file);
    let mut accumulator = SumAccumulator::new(store, barrier);

    let fold_start = Instant::now();
    accumulator.fold(&powers)?;
    log::info!("folded into the accumulator in {:?}", fold_start.elapsed());

    Ok(())
}

/// Route log macros through env_logger, defaulting to info
fn init_logger() {
    Builder::new().filter_level(LevelFilter::Info).parse_default_env().init();
}
