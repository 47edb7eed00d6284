//! Polynomial interpolation: classical Lagrange and the FFT-backed fast path
//!
//! The fast path is split in two phases. `fnt_decode_step1` depends only on
//! the evaluation positions, so batched interpolation over many value
//! vectors pays for it once; `fnt_decode_step2` does the per-vector work.

use itertools::Itertools;

use crate::{
    algebra::{DensePolynomial, Scalar},
    error::AlgebraError,
    fft::fft,
};

/// Interpolate the unique polynomial of degree `< |xs|` through the points
/// `(xsᵢ, ysᵢ)` by schoolbook Lagrange
///
/// Fails with `DuplicatePoint` when two evaluation positions coincide.
pub fn interpolate(xs: &[Scalar], ys: &[Scalar]) -> Result<DensePolynomial, AlgebraError> {
    if xs.len() != ys.len() {
        return Err(AlgebraError::LengthMismatch { expected: xs.len(), actual: ys.len() });
    }
    let Some(first) = xs.first() else {
        return Err(AlgebraError::MalformedInput("no evaluation points".to_string()));
    };

    let field = first.field().clone();
    let master = DensePolynomial::build_from_roots(field.clone(), xs);

    let mut result = DensePolynomial::zero(field.clone());
    for (x, y) in xs.iter().zip(ys.iter()) {
        // The Lagrange numerator for x is the master polynomial with the
        // (x - xᵢ) factor divided back out
        let (numerator, _) = master.divrem(&DensePolynomial::new(
            field.clone(),
            vec![-x, field.one()],
        ))?;

        let denominator = numerator.eval(x);
        if denominator.is_zero() {
            return Err(AlgebraError::DuplicatePoint);
        }

        let weight = y * denominator.inverse()?;
        result = result + numerator * weight;
    }

    Ok(result)
}

/// Position-only phase of the fast interpolator
///
/// Over the domain `{ωⁱ : 0 ≤ i < n}`, for the selected positions `zs`,
/// builds `A(x) = ∏ᵢ (x − ω^{zsᵢ})` and the inverted derivative evaluations
/// `Ad_inv[i] = A′(ω^{zsᵢ})⁻¹`. A zero derivative evaluation means two
/// positions coincide and fails with `DuplicatePoint`.
pub fn fnt_decode_step1(
    zs: &[usize],
    omega: &Scalar,
    n: usize,
) -> Result<(DensePolynomial, Vec<Scalar>), AlgebraError> {
    if let Some(out_of_range) = zs.iter().find(|z| **z >= n) {
        return Err(AlgebraError::MalformedInput(format!(
            "position {out_of_range} outside the domain of order {n}"
        )));
    }

    let field = omega.field().clone();
    let roots = zs.iter().map(|z| omega.pow(*z as u64)).collect_vec();
    let a = DensePolynomial::build_from_roots(field, &roots);

    // Evaluate A' over the whole domain, then gather the zs positions
    let a_deriv = a.derivative();
    let deriv_evals = fft(a_deriv.coeffs(), omega, n, None)?;

    let mut ad_inv = Vec::with_capacity(zs.len());
    for z in zs.iter() {
        let eval = &deriv_evals[*z];
        if eval.is_zero() {
            return Err(AlgebraError::DuplicatePoint);
        }
        ad_inv.push(eval.inverse()?);
    }

    Ok((a, ad_inv))
}

/// Per-value phase of the fast interpolator
///
/// Combines the step-1 output with the values `ys` at the `zs` positions and
/// returns the unique interpolating polynomial of degree `< |zs|`.
pub fn fnt_decode_step2(
    a: &DensePolynomial,
    ad_inv: &[Scalar],
    zs: &[usize],
    ys: &[Scalar],
    omega: &Scalar,
    n: usize,
) -> Result<DensePolynomial, AlgebraError> {
    let k = zs.len();
    if ys.len() != k {
        return Err(AlgebraError::LengthMismatch { expected: k, actual: ys.len() });
    }
    if ad_inv.len() != k {
        return Err(AlgebraError::LengthMismatch { expected: k, actual: ad_inv.len() });
    }

    let field = omega.field().clone();

    // N(x) = Σᵢ (yᵢ · Ad_inv[i]) · x^{zsᵢ}
    let mut n_coeffs = vec![field.zero(); n];
    for ((z, y), inv) in zs.iter().zip(ys.iter()).zip(ad_inv.iter()) {
        n_coeffs[*z] = y * inv;
    }

    // Evaluate N over the inverse-order domain; only the first k + 1 values
    // feed the quotient below
    let omega_inv = omega.inverse()?;
    let out_len = if k < n { k + 1 } else { n };
    let n_rev_evals = fft(&n_coeffs, &omega_inv, n, Some(out_len))?;

    // Q(x) = Σᵢ −N(ω^{−(i+1)}) · xⁱ
    let q_coeffs = (0..k).map(|i| -&n_rev_evals[(i + 1) % n]).collect_vec();
    let q = DensePolynomial::new(field, q_coeffs);

    Ok(q.mul_trunc(a, k))
}

/// Fast interpolation over a roots-of-unity domain in one call
///
/// Batched callers should run step 1 once per position set and step 2 per
/// value vector instead.
pub fn fnt_decode(
    zs: &[usize],
    ys: &[Scalar],
    omega: &Scalar,
    n: usize,
) -> Result<DensePolynomial, AlgebraError> {
    let (a, ad_inv) = fnt_decode_step1(zs, omega, n)?;
    fnt_decode_step2(&a, &ad_inv, zs, ys, omega, n)
}

/// Recover the polynomial of degree `< n` with `f(ωⁱ) = ysᵢ` for all `i`
///
/// This is the inverse transform: a forward FFT at `ω⁻¹` scaled by `n⁻¹`.
pub fn interpolate_fft(ys: &[Scalar], omega: &Scalar) -> Result<DensePolynomial, AlgebraError> {
    let n = ys.len();
    let field = omega.field().clone();

    let omega_inv = omega.inverse()?;
    let scaled = fft(ys, &omega_inv, n, None)?;

    let n_inv = field.element_from_u64(n as u64).inverse()?;
    let coeffs = scaled.into_iter().map(|c| c * &n_inv).collect_vec();
    Ok(DensePolynomial::new(field, coeffs))
}

/// Interpolate on the even subdomain `{ω²ⁱ}` and re-evaluate on the full
/// `2n`-point domain `{ωⁱ}`
///
/// `ω` must be a principal `2n`-th root of unity. This is the erasure
/// extension step of robust share reconstruction.
pub fn interp_extrap(xs: &[Scalar], omega: &Scalar) -> Result<Vec<Scalar>, AlgebraError> {
    let n = xs.len();
    let omega_squared = omega * omega;

    let poly = interpolate_fft(xs, &omega_squared)?;
    fft(poly.coeffs(), omega, 2 * n, None)
}

#[cfg(test)]
mod test {
    use itertools::Itertools;
    use rand::{thread_rng, Rng};

    use crate::{
        algebra::{
            poly::poly_test_helpers::random_poly,
            test_fields::{fp_224bit, fp_24bit},
            DensePolynomial,
        },
        error::AlgebraError,
        fft::fft,
    };

    use super::{
        fnt_decode, fnt_decode_step1, fnt_decode_step2, interp_extrap, interpolate,
        interpolate_fft,
    };

    /// Tests that classical interpolation passes through its points
    #[test]
    fn test_classical_interpolation() {
        let mut rng = thread_rng();
        for field in [fp_24bit(), fp_224bit()] {
            let n = 12;
            let mut xs = Vec::new();
            while xs.len() < n {
                let x = field.random_element(&mut rng);
                if !xs.contains(&x) {
                    xs.push(x);
                }
            }
            let ys = (0..n).map(|_| field.random_element(&mut rng)).collect_vec();

            let poly = interpolate(&xs, &ys).unwrap();
            assert!(poly.degree().map(|d| d < n).unwrap_or(true));
            for (x, y) in xs.iter().zip(ys.iter()) {
                assert_eq!(&poly.eval(x), y);
            }
        }
    }

    /// Tests that duplicated evaluation positions are rejected
    #[test]
    fn test_classical_duplicate_point() {
        let field = fp_24bit();
        let x = field.element_from_u64(5);
        let xs = vec![x.clone(), x];
        let ys = vec![field.element_from_u64(1), field.element_from_u64(2)];

        assert_eq!(interpolate(&xs, &ys), Err(AlgebraError::DuplicatePoint));
    }

    /// Tests the fast interpolator against the classical one on a subset of
    /// a roots-of-unity domain
    #[test]
    fn test_fnt_matches_classical() {
        let mut rng = thread_rng();
        let field = fp_24bit();
        let n = 32;
        let omega = field.find_root_of_unity(n, &mut rng).unwrap();

        // A scattered subset of domain positions
        let zs = vec![0usize, 3, 4, 7, 11, 18, 30];
        let ys = (0..zs.len()).map(|_| field.random_element(&mut rng)).collect_vec();

        let fast = fnt_decode(&zs, &ys, &omega, n).unwrap();

        let xs = zs.iter().map(|z| omega.pow(*z as u64)).collect_vec();
        let classical = interpolate(&xs, &ys).unwrap();
        assert_eq!(fast, classical);
    }

    /// Tests that a full-domain position set (k = n) interpolates exactly
    #[test]
    fn test_fnt_full_domain() {
        let mut rng = thread_rng();
        let field = fp_24bit();
        let n = 16;
        let omega = field.find_root_of_unity(n, &mut rng).unwrap();

        let zs = (0..n).collect_vec();
        let ys = (0..n).map(|_| field.random_element(&mut rng)).collect_vec();

        let poly = fnt_decode(&zs, &ys, &omega, n).unwrap();
        for (z, y) in zs.iter().zip(ys.iter()) {
            assert_eq!(&poly.eval(&omega.pow(*z as u64)), y);
        }
    }

    /// Tests step 1's duplicate detection
    #[test]
    fn test_fnt_duplicate_position() {
        let mut rng = thread_rng();
        let field = fp_24bit();
        let n = 16;
        let omega = field.find_root_of_unity(n, &mut rng).unwrap();

        let zs = vec![1usize, 5, 5];
        assert_eq!(fnt_decode_step1(&zs, &omega, n), Err(AlgebraError::DuplicatePoint));
    }

    /// Tests the index-reflection identity: the truncated inverse-order FFT
    /// read at `(i+1) mod n` agrees with a full forward FFT read at
    /// `n − i − 1`
    #[test]
    fn test_step2_index_reflection() {
        let mut rng = thread_rng();
        let field = fp_24bit();
        let n = 32;
        let omega = field.find_root_of_unity(n, &mut rng).unwrap();

        let zs = vec![0usize, 2, 5, 9, 14, 21];
        let k = zs.len();
        let ys = (0..k).map(|_| field.random_element(&mut rng)).collect_vec();

        let (a, ad_inv) = fnt_decode_step1(&zs, &omega, n).unwrap();
        let fast = fnt_decode_step2(&a, &ad_inv, &zs, &ys, &omega, n).unwrap();

        // Reference form: evaluate N over the *forward* domain in full and
        // read the reflected index
        let mut n_coeffs = vec![field.zero(); n];
        for ((z, y), inv) in zs.iter().zip(ys.iter()).zip(ad_inv.iter()) {
            n_coeffs[*z] = y * inv;
        }
        let n_evals = fft(&n_coeffs, &omega, n, None).unwrap();
        let q_coeffs = (0..k).map(|i| -&n_evals[n - i - 1]).collect_vec();
        let q = DensePolynomial::new(field, q_coeffs);
        let reference = q.mul_trunc(&a, k);

        assert_eq!(fast, reference);
    }

    /// Tests the inverse-FFT interpolation convenience
    #[test]
    fn test_interpolate_fft() {
        let mut rng = thread_rng();
        let field = fp_24bit();
        let n = 64;
        let omega = field.find_root_of_unity(n, &mut rng).unwrap();

        let poly = random_poly(&field, n, &mut rng);
        let evals = fft(poly.coeffs(), &omega, n, None).unwrap();

        assert_eq!(interpolate_fft(&evals, &omega).unwrap(), poly);
    }

    /// Tests even-subdomain interpolation followed by full-domain evaluation
    #[test]
    fn test_interp_extrap() {
        let mut rng = thread_rng();
        let field = fp_24bit();
        let n = 16;
        let omega = field.find_root_of_unity(2 * n, &mut rng).unwrap();

        // Degree < n polynomial known on the even powers
        let degree = rng.gen_range(0..n);
        let poly = DensePolynomial::random(field.clone(), degree, None, &mut rng);
        let omega_squared = &omega * &omega;
        let evens = fft(poly.coeffs(), &omega_squared, n, None).unwrap();

        let extended = interp_extrap(&evens, &omega).unwrap();
        let expected = fft(poly.coeffs(), &omega, 2 * n, None).unwrap();
        assert_eq!(extended, expected);
    }
}
