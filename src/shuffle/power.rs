//! The power-vector engine
//!
//! Computes `(a¹, a², …, aᵏ)` for a party's secret `a` given the publicly
//! opened difference `a − b` and the precomputed powers of a peer-chosen
//! random `b`. The diagonal recurrence applies
//! `aᵐ = bᵐ + (a − b) · Σⱼ aʲ · b^{m−1−j}` without ever materialising `b`
//! itself: only the opened value multiplies secret-dependent data.

use std::io::BufRead;

use itertools::Itertools;

use crate::{
    algebra::{FieldContext, Scalar},
    error::{AlgebraError, ShuffleError},
};

/// Compute the power vector `(a¹, …, aᵏ)`
///
/// `b_pows` holds `(b¹, …, bᵏ)`. When `a_minus_b` is not supplied it is
/// recovered as `a − b_pows[0]`. Fails with `LengthMismatch` when
/// `|b_pows| ≠ k`; every other step is total field arithmetic.
pub fn compute_powers(
    a: &Scalar,
    k: usize,
    b_pows: &[Scalar],
    a_minus_b: Option<Scalar>,
) -> Result<Vec<Scalar>, AlgebraError> {
    if b_pows.len() != k {
        return Err(AlgebraError::LengthMismatch { expected: k, actual: b_pows.len() });
    }
    if k == 0 {
        return Ok(Vec::new());
    }

    let field = a.field().clone();
    let a_minus_b = a_minus_b.unwrap_or_else(|| a - &b_pows[0]);

    let mut powers = Vec::with_capacity(k);
    // The previous diagonal, D⁰ = (1)
    let mut prev_diag = vec![field.one()];

    for m in 1..=k {
        let b_pow = &b_pows[m - 1];

        let mut diag = Vec::with_capacity(m + 1);
        diag.push(b_pow.clone());

        // Running prefix sum over the previous diagonal
        let mut sum = field.zero();
        for i in 1..=m {
            sum = sum + &prev_diag[i - 1];
            diag.push(&a_minus_b * &sum + b_pow);
        }

        powers.push(diag[m].clone());
        prev_diag = diag;
    }

    Ok(powers)
}

/// A parsed power-sum computation job, as consumed by the party harness
///
/// The input file carries, one decimal value per line: the field modulus,
/// the secret `a`, the opened `a − b`, the power count `k`, and then the `k`
/// powers of `b`.
#[derive(Clone, Debug)]
pub struct PowerJob {
    /// The field the job runs in
    pub field: FieldContext,
    /// The party's secret
    pub a: Scalar,
    /// The publicly opened difference `a − b`
    pub a_minus_b: Scalar,
    /// The precomputed powers `(b¹, …, bᵏ)`
    pub b_pows: Vec<Scalar>,
}

impl PowerJob {
    /// Parse a job from its line-oriented file format
    ///
    /// The leading modulus line becomes the thread's default field; every
    /// following value is read in it.
    pub fn parse<R: BufRead>(reader: R) -> Result<Self, ShuffleError> {
        let mut lines = reader.lines();
        let mut next_line = |what: &str| -> Result<String, ShuffleError> {
            lines
                .next()
                .ok_or_else(|| ShuffleError::MalformedInput(format!("missing {what}")))?
                .map_err(|e| ShuffleError::Storage(e.to_string()))
        };

        let field = parse_field(&next_line("field modulus")?)?;
        field.install_default();

        let a = parse_scalar(&next_line("secret a")?)?;
        let a_minus_b = parse_scalar(&next_line("opened a - b")?)?;

        let k: usize = next_line("power count")?
            .trim()
            .parse()
            .map_err(|_| ShuffleError::MalformedInput("unreadable power count".to_string()))?;

        let b_pows = (0..k)
            .map(|i| parse_scalar(&next_line(&format!("power {} of b", i + 1))?))
            .try_collect()?;

        Ok(Self { field, a, a_minus_b, b_pows })
    }

    /// Run the power engine on this job
    pub fn compute(&self) -> Result<Vec<Scalar>, AlgebraError> {
        compute_powers(&self.a, self.b_pows.len(), &self.b_pows, Some(self.a_minus_b.clone()))
    }
}

/// Parse a decimal field modulus
fn parse_field(line: &str) -> Result<FieldContext, ShuffleError> {
    let modulus = line
        .trim()
        .parse::<num_bigint::BigUint>()
        .map_err(|e| ShuffleError::MalformedInput(format!("unreadable modulus: {e}")))?;
    if modulus <= num_bigint::BigUint::from(1u8) {
        return Err(ShuffleError::MalformedInput("modulus is not a field".to_string()));
    }

    Ok(FieldContext::new(modulus))
}

/// Parse a decimal field element in the thread's default field
fn parse_scalar(line: &str) -> Result<Scalar, ShuffleError> {
    Scalar::from_decimal_default(line).map_err(ShuffleError::from)
}

#[cfg(test)]
mod test {
    use std::io::Cursor;

    use itertools::Itertools;
    use rand::thread_rng;

    use crate::{
        algebra::test_fields::{fp_224bit, fp_small},
        error::AlgebraError,
    };

    use super::{compute_powers, PowerJob};

    /// Tests the worked tiny-prime example: p = 23, a = 7, b = 5
    #[test]
    fn test_small_prime_example() {
        let field = fp_small();
        let a = field.element_from_u64(7);
        let a_minus_b = field.element_from_u64(2);
        let b_pows = [5u64, 2, 10, 4].map(|x| field.element_from_u64(x)).to_vec();

        let powers = compute_powers(&a, 4, &b_pows, Some(a_minus_b)).unwrap();
        let expected = [7u64, 3, 21, 9].map(|x| field.element_from_u64(x)).to_vec();
        assert_eq!(powers, expected);
    }

    /// Tests the recurrence against direct exponentiation, with and without
    /// the opened value supplied
    #[test]
    fn test_matches_direct_powers() {
        let mut rng = thread_rng();
        let field = fp_224bit();

        for k in [1usize, 2, 7, 33] {
            let a = field.random_element(&mut rng);
            let b = field.random_element(&mut rng);
            let b_pows = (1..=k as u64).map(|i| b.pow(i)).collect_vec();
            let expected = (1..=k as u64).map(|i| a.pow(i)).collect_vec();

            let opened = &a - &b;
            let with_opened = compute_powers(&a, k, &b_pows, Some(opened)).unwrap();
            assert_eq!(with_opened, expected);

            let without_opened = compute_powers(&a, k, &b_pows, None).unwrap();
            assert_eq!(without_opened, expected);
        }
    }

    /// Tests the power-count guard
    #[test]
    fn test_length_mismatch() {
        let field = fp_small();
        let a = field.element_from_u64(7);
        let b_pows = vec![field.element_from_u64(5)];

        assert_eq!(
            compute_powers(&a, 3, &b_pows, None),
            Err(AlgebraError::LengthMismatch { expected: 3, actual: 1 }),
        );
    }

    /// Tests parsing of the harness input format
    #[test]
    fn test_job_parsing() {
        let input = "23\n7\n2\n4\n5\n2\n10\n4\n";
        let job = PowerJob::parse(Cursor::new(input)).unwrap();

        let field = fp_small();
        assert_eq!(job.field, field);
        assert_eq!(job.a, field.element_from_u64(7));
        assert_eq!(job.a_minus_b, field.element_from_u64(2));
        assert_eq!(job.b_pows.len(), 4);

        let powers = job.compute().unwrap();
        assert_eq!(powers[3], field.element_from_u64(9));
    }

    /// Tests that truncated input files are rejected
    #[test]
    fn test_job_parsing_truncated() {
        let input = "23\n7\n2\n4\n5\n2\n";
        assert!(PowerJob::parse(Cursor::new(input)).is_err());
    }
}
