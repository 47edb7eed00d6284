//! The solver harness: recover the shuffled messages from summed power
//! vectors
//!
//! Reads the field prime (decimal), the party count `n` (decimal), and then
//! `n` power sums (lower-case hex) from stdin, and prints the recovered
//! multiset. Exit codes mirror the embedding ABI: 0 success, 1 invalid
//! power sums, 100 internal error, 101 input error.

use std::{
    io::Read,
    process::exit,
};

use env_logger::Builder;
use num_bigint::BigUint;
use powermix::{
    algebra::{FieldContext, Scalar},
    error::ShuffleError,
    shuffle::solve,
};
use tracing::log::{self, LevelFilter};

/// Exit code for sums that describe no multiset
const EXIT_INVALID: i32 = 1;
/// Exit code for internal failures
const EXIT_INTERNAL_ERROR: i32 = 100;
/// Exit code for unreadable input
const EXIT_INPUT_ERROR: i32 = 101;

fn main() {
    Builder::new().filter_level(LevelFilter::Warn).parse_default_env().init();

    let mut input = String::new();
    if std::io::stdin().read_to_string(&mut input).is_err() {
        exit(EXIT_INPUT_ERROR);
    }

    exit(run(&input));
}

/// Parse stdin and run the solver, mapping outcomes to exit codes
fn run(input: &str) -> i32 {
    let mut tokens = input.split_whitespace();

    let Some(prime_text) = tokens.next() else {
        return EXIT_INPUT_ERROR;
    };
    let Ok(modulus) = prime_text.parse::<BigUint>() else {
        return EXIT_INPUT_ERROR;
    };
    if modulus <= BigUint::from(1u8) {
        return EXIT_INPUT_ERROR;
    }
    // The prime line fixes the round's field; the sums parse in the
    // thread default
    let field = FieldContext::new(modulus);
    field.install_default();

    let Some(n) = tokens.next().and_then(|t| t.parse::<usize>().ok()) else {
        return EXIT_INPUT_ERROR;
    };

    let mut sums = Vec::with_capacity(n);
    for _ in 0..n {
        let Some(token) = tokens.next() else {
            return EXIT_INPUT_ERROR;
        };
        match Scalar::from_hex_default(token) {
            Ok(sum) => sums.push(sum),
            Err(_) => return EXIT_INPUT_ERROR,
        }
    }

    match solve(&field, &sums) {
        Ok(messages) => {
            println!("Messages:");
            let rendered: String = messages.iter().map(|m| format!("{m}, ")).collect();
            println!("[{rendered}]");
            0
        },
        Err(ShuffleError::InvalidPowerSums) => EXIT_INVALID,
        Err(ShuffleError::MalformedInput(e)) => {
            log::warn!("rejected input: {e}");
            EXIT_INPUT_ERROR
        },
        Err(e) => {
            log::error!("solver failed: {e}");
            EXIT_INTERNAL_ERROR
        },
    }
}
