//! Recovering the shuffled multiset from summed power vectors
//!
//! With `sᵢ = Σⱼ mⱼⁱ` summed across all parties, Newton's identities
//! reconstruct the monic polynomial whose roots are the secrets; factoring
//! it over the field and reading off the roots yields the unordered
//! multiset without revealing which party contributed which message.

use num_bigint::BigUint;
use rand::thread_rng;
use tracing::log;

use crate::{
    algebra::{factor, DensePolynomial, FieldContext, Scalar},
    error::ShuffleError,
};

/// The largest accepted party count, a guard against accidental misuse
pub const MAX_PARTIES: usize = 4097;

/// Recover the sorted multiset `{m₁, …, mₙ}` from the power sums
/// `(s₁, …, sₙ)`
///
/// Fails with `MalformedInput` outside `2 ≤ n ≤ 4097` or when `p ≤ n`, and
/// with `InvalidPowerSums` when the sums do not describe any multiset of
/// field elements (the round should be aborted).
pub fn solve(field: &FieldContext, sums: &[Scalar]) -> Result<Vec<Scalar>, ShuffleError> {
    let n = sums.len();
    if n < 2 {
        return Err(ShuffleError::MalformedInput(format!("need at least 2 power sums, got {n}")));
    }
    if n > MAX_PARTIES {
        return Err(ShuffleError::MalformedInput(format!(
            "party count {n} exceeds the {MAX_PARTIES} guard"
        )));
    }
    if field.modulus() <= &BigUint::from(n) {
        return Err(ShuffleError::MalformedInput(
            "prime must exceed the party count".to_string(),
        ));
    }
    if sums.iter().any(|s| s.field() != field) {
        return Err(ShuffleError::MalformedInput(
            "power sums from a different field".to_string(),
        ));
    }

    let symmetric = newton_symmetric_poly(field, sums)?;
    log::debug!("reconstructed a degree-{n} symmetric polynomial");

    // The sums describe a multiset iff the polynomial splits into linear
    // factors whose multiplicities account for the full degree
    let mut rng = thread_rng();
    let factors = factor(&symmetric, &mut rng)?;

    let mut messages = Vec::with_capacity(n);
    for (irreducible, multiplicity) in factors.into_iter() {
        if irreducible.degree() != Some(1) || !irreducible.is_monic() {
            return Err(ShuffleError::InvalidPowerSums);
        }

        let root = -irreducible.coeff(0);
        messages.extend(std::iter::repeat(root).take(multiplicity));
    }
    if messages.len() != n {
        return Err(ShuffleError::InvalidPowerSums);
    }

    messages.sort();
    Ok(messages)
}

/// Apply Newton's identities to build the monic polynomial
/// `P(x) = ∏ⱼ (x − mⱼ)` from the power sums of its roots
///
/// The identity `i·eᵢ = Σⱼ (−1)^(j−1) eᵢ₋ⱼ sⱼ` is run with the signs folded
/// into a single `inv(−(i+1))` per step, so the iteration accumulates the
/// signed coefficients of `P` directly.
fn newton_symmetric_poly(
    field: &FieldContext,
    sums: &[Scalar],
) -> Result<DensePolynomial, ShuffleError> {
    let n = sums.len();
    let mut poly = DensePolynomial::zero(field.clone());
    poly.set_coeff(n, field.one());

    let mut coeffs: Vec<Scalar> = Vec::with_capacity(n);
    for i in 0..n {
        let mut c = sums[i].clone();
        for (k, j) in (0..i).rev().enumerate() {
            c = c + &coeffs[k] * &sums[j];
        }

        // Division by the step index, with the identity's alternating signs
        // folded in
        let step = -field.element_from_u64(i as u64 + 1);
        c = c * step.inverse()?;

        poly.set_coeff(n - i - 1, c.clone());
        coeffs.push(c);
    }

    Ok(poly)
}
