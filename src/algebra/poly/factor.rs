//! Univariate factorisation over prime fields
//!
//! The pipeline is the classical one: strip multiplicities with a squarefree
//! decomposition, split the squarefree parts by the degree of their
//! irreducible factors, then isolate individual factors with randomized
//! equal-degree splitting.

use num_bigint::BigUint;
use num_traits::One;
use rand::RngCore;

use crate::{
    algebra::{DensePolynomial, FieldContext},
    error::AlgebraError,
};

/// Factor a nonzero polynomial into monic irreducible factors, each paired
/// with its multiplicity
///
/// The factors are returned sorted by degree, then by coefficients, so the
/// output is deterministic despite the randomized splitting step. Constant
/// polynomials factor into the empty product.
pub fn factor<R: RngCore>(
    poly: &DensePolynomial,
    rng: &mut R,
) -> Result<Vec<(DensePolynomial, usize)>, AlgebraError> {
    if poly.is_zero() {
        return Err(AlgebraError::MalformedInput("cannot factor the zero polynomial".to_string()));
    }

    let monic = poly.make_monic()?;
    let mut factors = Vec::new();
    for (squarefree, multiplicity) in squarefree_decomposition(&monic)? {
        for (product, degree) in distinct_degree_split(&squarefree)? {
            for irreducible in equal_degree_split(&product, degree, rng)? {
                factors.push((irreducible, multiplicity));
            }
        }
    }

    factors.sort_by(|(a, _), (b, _)| {
        a.degree().cmp(&b.degree()).then_with(|| a.coeffs().cmp(b.coeffs()))
    });
    Ok(factors)
}

/// Decompose a monic polynomial into pairwise-coprime squarefree parts, each
/// paired with the multiplicity its irreducible factors carry in the input
///
/// Valid whenever the degree is below the characteristic, which the shuffle
/// solver guarantees (`n < p`).
fn squarefree_decomposition(
    poly: &DensePolynomial,
) -> Result<Vec<(DensePolynomial, usize)>, AlgebraError> {
    if poly.degree().unwrap_or(0) == 0 {
        return Ok(Vec::new());
    }

    let derivative = poly.derivative();
    let mut repeated = DensePolynomial::gcd(poly, &derivative)?;
    // All distinct irreducible factors, each once
    let mut distinct = poly.divrem(&repeated)?.0;

    let mut parts = Vec::new();
    let mut multiplicity = 1;
    while distinct.degree().unwrap_or(0) > 0 {
        let with_higher_multiplicity = DensePolynomial::gcd(&distinct, &repeated)?;
        let exactly_here = distinct.divrem(&with_higher_multiplicity)?.0;
        if exactly_here.degree().unwrap_or(0) > 0 {
            parts.push((exactly_here, multiplicity));
        }

        repeated = repeated.divrem(&with_higher_multiplicity)?.0;
        distinct = with_higher_multiplicity;
        multiplicity += 1;
    }

    if repeated.degree().unwrap_or(0) > 0 {
        // Only reachable for p-th powers, which need degree >= p
        return Err(AlgebraError::MalformedInput(
            "polynomial degree is not below the field characteristic".to_string(),
        ));
    }

    Ok(parts)
}

/// Split a monic squarefree polynomial into products of irreducibles grouped
/// by degree, returned as `(product, degree)` pairs
fn distinct_degree_split(
    poly: &DensePolynomial,
) -> Result<Vec<(DensePolynomial, usize)>, AlgebraError> {
    let field = poly.field().clone();
    let p = field.modulus().clone();
    let x = x_poly(&field);

    let mut remaining = poly.clone();
    let mut frobenius = x.clone();
    let mut degree = 0;
    let mut out = Vec::new();

    while remaining.degree().unwrap_or(0) > 0 {
        degree += 1;
        if 2 * degree > remaining.degree().unwrap_or(0) {
            // Whatever is left is a single irreducible
            let d = remaining.degree().expect("remaining is nonconstant");
            out.push((remaining, d));
            break;
        }

        // Advance x -> x^(p^degree) mod remaining
        frobenius = poly_pow_mod(&frobenius, &p, &remaining)?;
        let split = DensePolynomial::gcd(&(&frobenius - &x), &remaining)?;
        if split.degree().unwrap_or(0) > 0 {
            remaining = remaining.divrem(&split)?.0;
            frobenius = frobenius.divrem(&remaining)?.1;
            out.push((split, degree));
        }
    }

    Ok(out)
}

/// Split a monic product of `degree`-degree irreducibles into the individual
/// irreducibles (Cantor–Zassenhaus)
///
/// Requires an odd modulus, which holds for every field the solver accepts
/// (`p > n ≥ 2` and `p` prime).
fn equal_degree_split<R: RngCore>(
    poly: &DensePolynomial,
    degree: usize,
    rng: &mut R,
) -> Result<Vec<DensePolynomial>, AlgebraError> {
    let field = poly.field().clone();
    let poly_degree = poly.degree().unwrap_or(0);
    if poly_degree == degree {
        return Ok(vec![poly.clone()]);
    }

    // (p^degree - 1) / 2
    let exponent = (field.modulus().pow(degree as u32) - BigUint::one()) >> 1;
    let one = DensePolynomial::one(field.clone());

    loop {
        let candidate = DensePolynomial::random(field.clone(), poly_degree - 1, None, rng);
        if candidate.degree().is_none() {
            continue;
        }

        // A common factor with the candidate already splits the input
        let shared = DensePolynomial::gcd(&candidate, poly)?;
        let splitter = if shared.degree().unwrap_or(0) > 0 {
            shared
        } else {
            let power = poly_pow_mod(&candidate, &exponent, poly)?;
            DensePolynomial::gcd(&(&power - &one), poly)?
        };

        let split_degree = splitter.degree().unwrap_or(0);
        if split_degree == 0 || split_degree == poly_degree {
            continue;
        }

        let (cofactor, _) = poly.divrem(&splitter)?;
        let mut out = equal_degree_split(&splitter, degree, rng)?;
        out.extend(equal_degree_split(&cofactor.make_monic()?, degree, rng)?);
        return Ok(out);
    }
}

/// Modular exponentiation of polynomials: `base^exp mod modulus`
pub fn poly_pow_mod(
    base: &DensePolynomial,
    exp: &BigUint,
    modulus: &DensePolynomial,
) -> Result<DensePolynomial, AlgebraError> {
    let field = base.field().clone();
    let (_, mut acc) = DensePolynomial::one(field).divrem(modulus)?;
    let (_, reduced_base) = base.divrem(modulus)?;

    for i in (0..exp.bits()).rev() {
        acc = {
            let (_, r) = (&acc * &acc).divrem(modulus)?;
            r
        };
        if exp.bit(i) {
            acc = {
                let (_, r) = (&acc * &reduced_base).divrem(modulus)?;
                r
            };
        }
    }

    Ok(acc)
}

/// The polynomial `x`
fn x_poly(field: &FieldContext) -> DensePolynomial {
    DensePolynomial::new(field.clone(), vec![field.zero(), field.one()])
}

#[cfg(test)]
mod test {
    use itertools::Itertools;
    use rand::thread_rng;

    use crate::algebra::test_fields::{fp_101, fp_24bit};

    use super::{factor, DensePolynomial};

    /// Tests recovery of distinct linear factors with multiplicities
    #[test]
    fn test_factor_linears_with_multiplicity() {
        let mut rng = thread_rng();
        let field = fp_101();

        // (x - 3)^2 (x - 17) (x - 42)^3
        let r3 = field.element_from_u64(3);
        let r17 = field.element_from_u64(17);
        let r42 = field.element_from_u64(42);
        let poly = DensePolynomial::build_from_roots(
            field.clone(),
            &[
                r3.clone(),
                r3.clone(),
                r17.clone(),
                r42.clone(),
                r42.clone(),
                r42.clone(),
            ],
        );

        let factors = factor(&poly, &mut rng).unwrap();
        assert_eq!(factors.len(), 3);
        for (irreducible, _) in factors.iter() {
            assert_eq!(irreducible.degree(), Some(1));
            assert!(irreducible.is_monic());
        }

        let mut roots = factors
            .iter()
            .flat_map(|(f, mult)| std::iter::repeat(-f.coeff(0)).take(*mult))
            .collect_vec();
        roots.sort();
        assert_eq!(roots, vec![r3.clone(), r3, r17, r42.clone(), r42.clone(), r42]);
    }

    /// Tests that an irreducible quadratic survives as a single factor
    #[test]
    fn test_factor_irreducible_quadratic() {
        let mut rng = thread_rng();
        // 101 = 1 mod 4, so -1 is a QR; use x^2 - g for a non-residue g
        // instead: 2 is a non-residue mod 101
        let field = fp_101();
        let poly = DensePolynomial::new(
            field.clone(),
            vec![-field.element_from_u64(2), field.zero(), field.one()],
        );

        let factors = factor(&poly, &mut rng).unwrap();
        assert_eq!(factors.len(), 1);
        assert_eq!(factors[0].0.degree(), Some(2));
        assert_eq!(factors[0].1, 1);
    }

    /// Tests that the refactored product reproduces the input
    #[test]
    fn test_factor_reassembles() {
        let mut rng = thread_rng();
        let field = fp_24bit();

        for _ in 0..10 {
            let roots = (0..6).map(|_| field.random_element(&mut rng)).collect_vec();
            let poly = DensePolynomial::build_from_roots(field.clone(), &roots);

            let factors = factor(&poly, &mut rng).unwrap();
            let mut product = DensePolynomial::one(field.clone());
            for (irreducible, multiplicity) in factors.iter() {
                for _ in 0..*multiplicity {
                    product = &product * irreducible;
                }
            }

            assert_eq!(product, poly);
        }
    }
}
