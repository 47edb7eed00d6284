//! The C ABI for embedding the shuffle solver
//!
//! All scalars cross the boundary as null-terminated lower-case hex strings
//! without a `0x` prefix. No panic is allowed to unwind into the caller;
//! everything is fenced behind `catch_unwind` and collapsed into the small
//! numeric return-code taxonomy.

use std::{
    ffi::{c_char, c_int, CStr},
    panic::catch_unwind,
};

use num_bigint::BigUint;
use num_traits::One;

use crate::{
    algebra::{FieldContext, Scalar},
    error::ShuffleError,
    shuffle,
};

/// Success
const RET_OK: c_int = 0;
/// The sums are not a proper power-sum sequence
const RET_INVALID: c_int = 1;
/// An internal error occurred
const RET_INTERNAL_ERROR: c_int = 100;
/// Illegal input values
const RET_INPUT_ERROR: c_int = 101;

/// Solve the power-sum equation system in the prime field `F_prime`
///
/// Recovers `messages[]` such that
/// `∀ 0 ≤ i < n: Σⱼ messages[j]^(i+1) = sums[i]`.
///
/// - `out_messages`: `n` caller-allocated buffers, each of at least
///   `strlen(prime) + 1` bytes; on success each receives one hex residue,
///   in ascending numeric order.
/// - `prime`: the field modulus (not checked for primality).
/// - `sums`: the `n` power sums.
///
/// Returns `0` on success, `1` when the sums are not a proper power-sum
/// sequence, `101` for illegal inputs, and `100` for internal errors.
///
/// # Safety
/// `prime` and the first `n` entries of `sums` must be valid null-terminated
/// strings; the first `n` entries of `out_messages` must point to writable
/// buffers of at least `strlen(prime) + 1` bytes.
#[no_mangle]
pub unsafe extern "C" fn solve(
    out_messages: *const *mut c_char,
    prime: *const c_char,
    sums: *const *const c_char,
    n: usize,
) -> c_int {
    catch_unwind(|| solve_inner(out_messages, prime, sums, n)).unwrap_or(RET_INTERNAL_ERROR)
}

/// The fallible body behind the unwind fence
fn solve_inner(
    out_messages: *const *mut c_char,
    prime: *const c_char,
    sums: *const *const c_char,
    n: usize,
) -> c_int {
    if out_messages.is_null() || prime.is_null() || sums.is_null() {
        return RET_INPUT_ERROR;
    }

    // SAFETY: the caller guarantees `prime` is a valid C string
    let prime_str = match unsafe { CStr::from_ptr(prime) }.to_str() {
        Ok(s) => s,
        Err(_) => return RET_INPUT_ERROR,
    };
    let Some(modulus) = parse_hex(prime_str) else {
        return RET_INPUT_ERROR;
    };
    if modulus <= BigUint::one() {
        return RET_INPUT_ERROR;
    }

    // The prime is the boundary's field; values after it parse in the
    // thread default
    let field = FieldContext::new(modulus);
    field.install_default();

    let mut parsed_sums = Vec::with_capacity(n);
    for i in 0..n {
        // SAFETY: the caller guarantees `sums` holds `n` valid C strings
        let entry = unsafe { *sums.add(i) };
        if entry.is_null() {
            return RET_INPUT_ERROR;
        }
        let Ok(text) = (unsafe { CStr::from_ptr(entry) }).to_str() else {
            return RET_INPUT_ERROR;
        };
        match Scalar::from_hex_default(text) {
            Ok(scalar) => parsed_sums.push(scalar),
            Err(_) => return RET_INPUT_ERROR,
        }
    }

    for i in 0..n {
        // SAFETY: the caller guarantees `out_messages` holds `n` pointers
        if unsafe { *out_messages.add(i) }.is_null() {
            return RET_INPUT_ERROR;
        }
    }

    let messages = match shuffle::solve(&field, &parsed_sums) {
        Ok(messages) => messages,
        Err(ShuffleError::InvalidPowerSums) => return RET_INVALID,
        Err(ShuffleError::MalformedInput(_)) => return RET_INPUT_ERROR,
        Err(_) => return RET_INTERNAL_ERROR,
    };

    for (i, message) in messages.iter().enumerate() {
        let hex = message.to_hex_string();
        // The buffer contract guarantees room for strlen(prime) + 1 bytes,
        // and a reduced residue can never need more digits than the modulus
        if hex.len() > prime_str.len() {
            return RET_INTERNAL_ERROR;
        }

        // SAFETY: each buffer holds at least strlen(prime) + 1 writable
        // bytes, checked to cover hex plus the terminator just above
        unsafe {
            let buffer = *out_messages.add(i);
            std::ptr::copy_nonoverlapping(hex.as_ptr(), buffer.cast(), hex.len());
            *buffer.add(hex.len()) = 0;
        }
    }

    RET_OK
}

/// Parse unprefixed hex into a big integer
fn parse_hex(s: &str) -> Option<BigUint> {
    if s.is_empty() {
        return None;
    }
    BigUint::parse_bytes(s.as_bytes(), 16)
}
