//! Reed–Solomon decoding by the extended Euclidean algorithm on polynomials
//!
//! Recovers a polynomial of degree `< k` from `n` evaluations of which up to
//! `⌊(n − k) / 2⌋` may be arbitrarily corrupted. The remainder sequence is
//! halted at the first remainder of degree below `(n + k) / 2`; the Bezout
//! cofactor at that point is the error locator.

use itertools::Itertools;

use crate::{
    algebra::{DensePolynomial, Scalar},
    error::AlgebraError,
    interpolate::{fnt_decode, interpolate},
};

/// A successful decoding: the sender's polynomial and the error locator
/// whose roots index the corrupted evaluations
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GaoDecoding {
    /// The recovered polynomial, of degree `< k`
    pub polynomial: DensePolynomial,
    /// The error locator; vanishes exactly on the corrupted evaluation
    /// points
    pub error_locator: DensePolynomial,
}

/// Run the extended Euclidean remainder sequence on `(p0, p1)`, halting at
/// the first remainder of degree `< threshold`
///
/// Returns `(g, u, v)` with `g = u·p0 + v·p1`. If either input is already
/// below the threshold the sequence does not advance.
pub fn partial_gcd(
    p0: &DensePolynomial,
    p1: &DensePolynomial,
    threshold: usize,
) -> Result<(DensePolynomial, DensePolynomial, DensePolynomial), AlgebraError> {
    let field = p0.field().clone();
    let below = |p: &DensePolynomial| p.degree().map(|d| d < threshold).unwrap_or(true);

    let mut r0 = p0.clone();
    let mut r1 = p1.clone();
    let mut s0 = DensePolynomial::one(field.clone());
    let mut s1 = DensePolynomial::zero(field.clone());
    let mut t0 = DensePolynomial::zero(field.clone());
    let mut t1 = DensePolynomial::one(field);

    if below(&r0) {
        return Ok((r0, s0, t0));
    }
    if below(&r1) {
        return Ok((r1, s1, t1));
    }

    loop {
        let (q, r2) = r0.divrem(&r1)?;
        let s2 = &s0 - &q * &s1;
        let t2 = &t0 - &q * &t1;

        if below(&r2) {
            return Ok((r2, s2, t2));
        }

        r0 = r1;
        r1 = r2;
        s0 = s1;
        s1 = s2;
        t0 = t1;
        t1 = t2;
    }
}

/// Decode the polynomial of degree `< k` behind the evaluations
/// `(xsᵢ, ysᵢ)`, tolerating up to `⌊(n − k) / 2⌋` corruptions
///
/// Fails with `MalformedInput` for `k ≥ n`, repeated evaluation points, or a
/// length mismatch, and with `DecodeFailed` when the evaluations are too
/// corrupted to identify a codeword (the caller may retry with more shares).
pub fn gao_interpolate(
    xs: &[Scalar],
    ys: &[Scalar],
    k: usize,
) -> Result<GaoDecoding, AlgebraError> {
    let n = xs.len();
    if ys.len() != n {
        return Err(AlgebraError::LengthMismatch { expected: n, actual: ys.len() });
    }
    if n == 0 || k >= n {
        return Err(AlgebraError::MalformedInput(format!(
            "threshold {k} does not leave redundancy among {n} evaluations"
        )));
    }
    if !xs.iter().all_unique() {
        return Err(AlgebraError::MalformedInput("repeated evaluation points".to_string()));
    }

    let field = xs[0].field().clone();
    let g0 = DensePolynomial::build_from_roots(field, xs);
    let g1 = interpolate(xs, ys)?;

    finish_decoding(&g0, &g1, k, n)
}

/// The FFT-backed decoder: evaluations live at domain indices `zs` of the
/// order-`order` subgroup generated by `ω`, letting interpolation run
/// through the fast path
pub fn gao_interpolate_fft(
    zs: &[usize],
    ys: &[Scalar],
    omega: &Scalar,
    k: usize,
    order: usize,
) -> Result<GaoDecoding, AlgebraError> {
    let n = zs.len();
    if ys.len() != n {
        return Err(AlgebraError::LengthMismatch { expected: n, actual: ys.len() });
    }
    if n == 0 || k >= n {
        return Err(AlgebraError::MalformedInput(format!(
            "threshold {k} does not leave redundancy among {n} evaluations"
        )));
    }
    if !zs.iter().all_unique() {
        return Err(AlgebraError::MalformedInput("repeated evaluation points".to_string()));
    }

    let field = omega.field().clone();
    let xs = zs.iter().map(|z| omega.pow(*z as u64)).collect_vec();
    let g0 = DensePolynomial::build_from_roots(field, &xs);
    let g1 = fnt_decode(zs, ys, omega, order)?;

    finish_decoding(&g0, &g1, k, n)
}

/// The shared tail of both decoders: the halted remainder sequence and the
/// divisibility test
fn finish_decoding(
    g0: &DensePolynomial,
    g1: &DensePolynomial,
    k: usize,
    n: usize,
) -> Result<GaoDecoding, AlgebraError> {
    let (g, _u, v) = partial_gcd(g0, g1, (n + k) / 2)?;

    let (f, r) = g.divrem(&v)?;
    let degree_ok = f.degree().map(|d| d < k).unwrap_or(true);
    if !r.is_zero() || !degree_ok {
        return Err(AlgebraError::DecodeFailed);
    }

    Ok(GaoDecoding { polynomial: f, error_locator: v })
}
