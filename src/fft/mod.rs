//! Radix-2 FFT over a prime field
//!
//! Evaluates a coefficient vector at the powers of a principal root of unity
//! `ω` of order `n`. Two accelerations over the textbook recursion: callers
//! that only need the first `k` outputs get a truncated butterfly, and
//! recursion bottoms out in a cached Vandermonde matrix multiply instead of
//! descending to single elements.
//!
//! There is no separate inverse transform: run the forward transform at
//! `ω⁻¹` and scale by `n⁻¹` (see `interpolate::interpolate_fft`).

mod vandermonde;

use std::sync::Arc;

use vandermonde::VandermondeMatrix;

use crate::{
    algebra::Scalar,
    error::AlgebraError,
};

/// The recursion size at which the FFT switches to a Vandermonde multiply
///
/// Chosen experimentally; the matrix costs `T²` multiplications but avoids
/// `T log T` levels of scalar shuffling and allocator traffic.
pub const VANDERMONDE_THRESHOLD: usize = 16;

/// Evaluate `coeffs` at `ω⁰ … ωⁿ⁻¹`, returning the first `k` values
/// (all `n` when `k` is `None`)
///
/// `n` must be a power of two and `coeffs` must fit the domain; shorter
/// inputs are zero-padded. `ω` is trusted to be a principal `n`-th root of
/// unity; use [`fft_checked`] to validate it first.
pub fn fft(
    coeffs: &[Scalar],
    omega: &Scalar,
    n: usize,
    k: Option<usize>,
) -> Result<Vec<Scalar>, AlgebraError> {
    if n == 0 || !n.is_power_of_two() {
        return Err(AlgebraError::BadLength(n));
    }
    if coeffs.len() > n {
        return Err(AlgebraError::BadLength(coeffs.len()));
    }
    let out_len = k.unwrap_or(n);
    if out_len > n {
        return Err(AlgebraError::BadLength(out_len));
    }

    let field = omega.field();
    let mut values = coeffs.to_vec();
    values.resize(n, field.zero());

    // The base-case matrix is keyed by the root of unity at the threshold
    // order, ω^(n/T)
    let base = if n >= VANDERMONDE_THRESHOLD {
        let omega_base = omega.pow((n / VANDERMONDE_THRESHOLD) as u64);
        Some(vandermonde::fetch(&omega_base, VANDERMONDE_THRESHOLD))
    } else {
        None
    };

    fft_in_place(&mut values, omega, out_len, base.as_ref());
    values.truncate(out_len);
    Ok(values)
}

/// [`fft`], after verifying that `ω` is a principal `n`-th root of unity
///
/// Fails with `NotRootOfUnity` unless `ωⁿ = 1` and, for `n > 1`,
/// `ω^(n/2) ≠ 1`.
pub fn fft_checked(
    coeffs: &[Scalar],
    omega: &Scalar,
    n: usize,
    k: Option<usize>,
) -> Result<Vec<Scalar>, AlgebraError> {
    if n == 0 || !n.is_power_of_two() {
        return Err(AlgebraError::BadLength(n));
    }

    let field = omega.field();
    let order_ok = omega.pow(n as u64) == field.one();
    let principal = n == 1 || omega.pow(n as u64 / 2) != field.one();
    if !order_ok || !principal {
        return Err(AlgebraError::NotRootOfUnity);
    }

    fft(coeffs, omega, n, k)
}

/// The recursive butterfly
///
/// `values` holds the (power-of-two sized) input slice and receives the
/// output; only indices below `out_limit` are guaranteed to be written.
fn fft_in_place(
    values: &mut Vec<Scalar>,
    omega: &Scalar,
    out_limit: usize,
    base: Option<&Arc<VandermondeMatrix>>,
) {
    let n = values.len();
    if n == 1 {
        return;
    }

    if let Some(matrix) = base {
        if n == VANDERMONDE_THRESHOLD {
            *values = apply_vandermonde(matrix, values);
            return;
        }
    }

    let field = omega.field();
    let mut even: Vec<Scalar> = values.iter().step_by(2).cloned().collect();
    let mut odd: Vec<Scalar> = values.iter().skip(1).step_by(2).cloned().collect();

    let omega_squared = omega * omega;
    fft_in_place(&mut even, &omega_squared, out_limit, base);
    fft_in_place(&mut odd, &omega_squared, out_limit, base);

    let mut twiddle = field.one();
    for k in 0..n / 2 {
        let term = &twiddle * &odd[k];
        if k < out_limit {
            values[k] = &even[k] + &term;
        }
        if k + n / 2 < out_limit {
            values[k + n / 2] = &even[k] - &term;
        }
        twiddle = twiddle * omega;
    }
}

/// Multiply the coefficient slice by the cached matrix
fn apply_vandermonde(matrix: &VandermondeMatrix, values: &[Scalar]) -> Vec<Scalar> {
    let field = values[0].field();
    matrix
        .iter()
        .map(|row| {
            let mut acc = field.zero();
            for (entry, value) in row.iter().zip(values.iter()) {
                acc = acc + entry * value;
            }
            acc
        })
        .collect()
}
