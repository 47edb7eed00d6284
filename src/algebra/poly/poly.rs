//! Defines the dense polynomial representation over a runtime prime field

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    ops::{Add, Mul, Neg, Sub},
};

use itertools::Itertools;
use rand::RngCore;

use crate::{
    algebra::{macros::*, FieldContext, Scalar},
    error::AlgebraError,
};

// ------------------
// | Implementation |
// ------------------

/// A dense univariate polynomial over a prime field
///
/// The `i`th coefficient is the coefficient of `x^i`. The coefficient vector
/// never carries trailing zeros; the zero polynomial is the empty vector.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DensePolynomial {
    /// The coefficients, lowest degree first, trailing zeros trimmed
    coeffs: Vec<Scalar>,
    /// The field the coefficients live in
    field: FieldContext,
}

impl DensePolynomial {
    /// Construct a polynomial from a coefficient vector, trimming trailing
    /// zeros
    ///
    /// # Panics
    /// Panics if any coefficient lives in a different field than `field`.
    pub fn new(field: FieldContext, coeffs: Vec<Scalar>) -> Self {
        for coeff in coeffs.iter() {
            assert_eq!(coeff.field(), &field, "coefficient from a different field");
        }

        let mut poly = Self { coeffs, field };
        poly.trim();
        poly
    }

    /// The zero polynomial (additive identity)
    pub fn zero(field: FieldContext) -> Self {
        Self { coeffs: Vec::new(), field }
    }

    /// The one polynomial (multiplicative identity)
    pub fn one(field: FieldContext) -> Self {
        let one = field.one();
        Self { coeffs: vec![one], field }
    }

    /// The constant polynomial with the given value
    pub fn constant(value: Scalar) -> Self {
        let field = value.field().clone();
        Self::new(field, vec![value])
    }

    /// Compute `∏ᵢ (x − rootsᵢ)`
    pub fn build_from_roots(field: FieldContext, roots: &[Scalar]) -> Self {
        let mut product = Self::one(field);
        for root in roots.iter() {
            // Multiply by (x - root): each coefficient picks up the one
            // below it, minus its own root-scaled copy
            let old = &product.coeffs;
            let len = old.len();
            let mut coeffs = Vec::with_capacity(len + 1);
            for j in 0..=len {
                let shifted =
                    if j > 0 { old[j - 1].clone() } else { product.field.zero() };
                let scaled =
                    if j < len { &old[j] * root } else { product.field.zero() };
                coeffs.push(shifted - scaled);
            }

            product = Self { coeffs, field: product.field };
        }

        product
    }

    /// Sample a uniform polynomial of exactly the given degree bound, with an
    /// optionally pinned constant term
    ///
    /// Used to sample sharing polynomials: `degree` hides the secret placed
    /// at the constant term.
    pub fn random<R: RngCore>(
        field: FieldContext,
        degree: usize,
        y0: Option<Scalar>,
        rng: &mut R,
    ) -> Self {
        let mut coeffs = (0..=degree).map(|_| field.random_element(rng)).collect_vec();
        if let Some(y0) = y0 {
            coeffs[0] = y0;
        }

        Self::new(field, coeffs)
    }

    /// The field the polynomial is defined over
    pub fn field(&self) -> &FieldContext {
        &self.field
    }

    /// The degree, or `None` for the zero polynomial
    pub fn degree(&self) -> Option<usize> {
        self.coeffs.len().checked_sub(1)
    }

    /// Whether this is the zero polynomial
    pub fn is_zero(&self) -> bool {
        self.coeffs.is_empty()
    }

    /// The coefficient vector, lowest degree first
    pub fn coeffs(&self) -> &[Scalar] {
        &self.coeffs
    }

    /// The coefficient of `x^i`; zero beyond the degree
    pub fn coeff(&self, i: usize) -> Scalar {
        self.coeffs.get(i).cloned().unwrap_or_else(|| self.field.zero())
    }

    /// The leading coefficient, or `None` for the zero polynomial
    pub fn leading_coeff(&self) -> Option<&Scalar> {
        self.coeffs.last()
    }

    /// Set the coefficient of `x^i`, extending with zeros as needed
    pub fn set_coeff(&mut self, i: usize, value: Scalar) {
        assert_eq!(value.field(), &self.field, "coefficient from a different field");
        if i >= self.coeffs.len() {
            if value.is_zero() {
                return;
            }
            self.coeffs.resize_with(i + 1, || self.field.zero());
        }

        self.coeffs[i] = value;
        self.trim();
    }

    /// Evaluate the polynomial at a point by Horner's rule
    pub fn eval(&self, point: &Scalar) -> Scalar {
        let mut res = self.field.zero();
        for coeff in self.coeffs.iter().rev() {
            res = res * point + coeff;
        }

        res
    }

    /// The formal derivative
    pub fn derivative(&self) -> Self {
        let coeffs = self
            .coeffs
            .iter()
            .enumerate()
            .skip(1)
            .map(|(i, coeff)| self.field.element_from_u64(i as u64) * coeff)
            .collect_vec();

        Self::new(self.field.clone(), coeffs)
    }

    /// The first `m` coefficients of `self * rhs`
    pub fn mul_trunc(&self, rhs: &Self, m: usize) -> Self {
        assert_eq!(self.field, rhs.field, "polynomials over different fields");
        if self.is_zero() || rhs.is_zero() || m == 0 {
            return Self::zero(self.field.clone());
        }

        let out_len = m.min(self.coeffs.len() + rhs.coeffs.len() - 1);
        let mut coeffs = vec![self.field.zero(); out_len];
        for (i, a) in self.coeffs.iter().enumerate() {
            if i >= out_len {
                break;
            }
            for (j, b) in rhs.coeffs.iter().take(out_len - i).enumerate() {
                coeffs[i + j] = &coeffs[i + j] + a * b;
            }
        }

        Self::new(self.field.clone(), coeffs)
    }

    /// Euclidean division: returns `(q, r)` with `self = q * rhs + r` and
    /// `deg(r) < deg(rhs)`
    ///
    /// Fails with `DivisionByZero` when `rhs` is zero and `NonInvertible`
    /// when its leading coefficient is not a unit (unreachable over a prime
    /// field, kept to honor the general-field contract).
    pub fn divrem(&self, rhs: &Self) -> Result<(Self, Self), AlgebraError> {
        assert_eq!(self.field, rhs.field, "polynomials over different fields");
        if rhs.is_zero() {
            return Err(AlgebraError::DivisionByZero);
        }

        let divisor_deg = rhs.degree().unwrap_or(0);
        let lead_inv = rhs.leading_coeff().ok_or(AlgebraError::DivisionByZero)?.inverse()?;

        let mut rem = self.coeffs.clone();
        if rem.len() < rhs.coeffs.len() {
            return Ok((Self::zero(self.field.clone()), self.clone()));
        }

        let mut quotient = vec![self.field.zero(); rem.len() - divisor_deg];
        while rem.len() >= rhs.coeffs.len() {
            let shift = rem.len() - rhs.coeffs.len();
            let factor = rem.last().expect("remainder is non-empty") * &lead_inv;
            for (i, coeff) in rhs.coeffs.iter().enumerate() {
                rem[shift + i] = &rem[shift + i] - &factor * coeff;
            }
            quotient[shift] = factor;

            // The cancelled leading term and any new trailing zeros
            while rem.last().map(Scalar::is_zero).unwrap_or(false) {
                rem.pop();
            }
        }

        Ok((
            Self::new(self.field.clone(), quotient),
            Self::new(self.field.clone(), rem),
        ))
    }

    /// Scale the polynomial so its leading coefficient is one
    ///
    /// Fails with `DivisionByZero` on the zero polynomial.
    pub fn make_monic(&self) -> Result<Self, AlgebraError> {
        let lead = self.leading_coeff().ok_or(AlgebraError::DivisionByZero)?;
        if lead.is_one() {
            return Ok(self.clone());
        }

        let lead_inv = lead.inverse()?;
        let coeffs = self.coeffs.iter().map(|c| c * &lead_inv).collect_vec();
        Ok(Self { coeffs, field: self.field.clone() })
    }

    /// Whether the polynomial is monic
    pub fn is_monic(&self) -> bool {
        self.leading_coeff().map(Scalar::is_one).unwrap_or(false)
    }

    /// The monic greatest common divisor of two polynomials
    ///
    /// `gcd(0, 0)` is the zero polynomial.
    pub fn gcd(a: &Self, b: &Self) -> Result<Self, AlgebraError> {
        let mut r0 = a.clone();
        let mut r1 = b.clone();
        while !r1.is_zero() {
            let (_, rem) = r0.divrem(&r1)?;
            r0 = r1;
            r1 = rem;
        }

        if r0.is_zero() {
            Ok(r0)
        } else {
            r0.make_monic()
        }
    }

    /// Drop trailing zero coefficients
    fn trim(&mut self) {
        while self.coeffs.last().map(Scalar::is_zero).unwrap_or(false) {
            self.coeffs.pop();
        }
    }
}

impl Display for DensePolynomial {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        if self.is_zero() {
            return write!(f, "0");
        }

        let terms = self
            .coeffs
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.is_zero())
            .map(|(i, c)| if i == 0 { format!("{c}") } else { format!("{c} x^{i}") })
            .join(" + ");
        write!(f, "{terms}")
    }
}

// --------------
// | Arithmetic |
// --------------

// === Addition === //

impl Add<&DensePolynomial> for &DensePolynomial {
    type Output = DensePolynomial;

    fn add(self, rhs: &DensePolynomial) -> Self::Output {
        assert_eq!(self.field, rhs.field, "polynomials over different fields");
        let max_len = self.coeffs.len().max(rhs.coeffs.len());
        let coeffs = (0..max_len).map(|i| self.coeff(i) + rhs.coeff(i)).collect_vec();

        DensePolynomial::new(self.field.clone(), coeffs)
    }
}
impl_borrow_variants!(DensePolynomial, Add, add, +, DensePolynomial);

// === Subtraction === //

impl Sub<&DensePolynomial> for &DensePolynomial {
    type Output = DensePolynomial;

    fn sub(self, rhs: &DensePolynomial) -> Self::Output {
        assert_eq!(self.field, rhs.field, "polynomials over different fields");
        let max_len = self.coeffs.len().max(rhs.coeffs.len());
        let coeffs = (0..max_len).map(|i| self.coeff(i) - rhs.coeff(i)).collect_vec();

        DensePolynomial::new(self.field.clone(), coeffs)
    }
}
impl_borrow_variants!(DensePolynomial, Sub, sub, -, DensePolynomial);

// === Multiplication === //

impl Mul<&DensePolynomial> for &DensePolynomial {
    type Output = DensePolynomial;

    fn mul(self, rhs: &DensePolynomial) -> Self::Output {
        if self.is_zero() || rhs.is_zero() {
            return DensePolynomial::zero(self.field.clone());
        }

        self.mul_trunc(rhs, self.coeffs.len() + rhs.coeffs.len() - 1)
    }
}
impl_borrow_variants!(DensePolynomial, Mul, mul, *, DensePolynomial);

/// Scaling by a field element
impl Mul<&Scalar> for &DensePolynomial {
    type Output = DensePolynomial;

    fn mul(self, rhs: &Scalar) -> Self::Output {
        let coeffs = self.coeffs.iter().map(|c| c * rhs).collect_vec();
        DensePolynomial::new(self.field.clone(), coeffs)
    }
}
impl_borrow_variants!(DensePolynomial, Mul, mul, *, Scalar);

// === Negation === //

impl Neg for &DensePolynomial {
    type Output = DensePolynomial;

    fn neg(self) -> Self::Output {
        let coeffs = self.coeffs.iter().map(|c| -c).collect_vec();
        DensePolynomial { coeffs, field: self.field.clone() }
    }
}
impl_borrow_variants!(DensePolynomial, Neg, neg, -);

#[cfg(test)]
mod test {
    use itertools::Itertools;
    use rand::{thread_rng, Rng};

    use crate::algebra::{
        poly::poly_test_helpers::random_poly,
        test_fields::{fp_224bit, fp_24bit, fp_small},
    };

    use super::DensePolynomial;

    /// Tests the Euclidean division identity `f = q·g + r`, `deg r < deg g`
    #[test]
    fn test_divrem_identity() {
        let mut rng = thread_rng();
        let field = fp_24bit();

        for _ in 0..50 {
            let f = random_poly(&field, 64, &mut rng);
            let g = random_poly(&field, 32, &mut rng);
            if g.is_zero() {
                continue;
            }

            let (q, r) = f.divrem(&g).unwrap();
            assert_eq!(&q * &g + &r, f);
            assert!(r.is_zero() || r.degree().unwrap() < g.degree().unwrap());
        }
    }

    /// Tests that dividing by zero is rejected
    #[test]
    fn test_division_by_zero() {
        let mut rng = thread_rng();
        let field = fp_small();
        let f = random_poly(&field, 8, &mut rng);

        assert!(f.divrem(&DensePolynomial::zero(field)).is_err());
    }

    /// Tests that a root-built polynomial vanishes exactly on its roots
    #[test]
    fn test_build_from_roots() {
        let mut rng = thread_rng();
        let field = fp_24bit();

        let roots = (0..10).map(|_| field.random_element(&mut rng)).collect_vec();
        let poly = DensePolynomial::build_from_roots(field.clone(), &roots);

        assert_eq!(poly.degree(), Some(roots.len()));
        assert!(poly.is_monic());
        for root in roots.iter() {
            assert!(poly.eval(root).is_zero());
        }

        // A point off the root set evaluates nonzero with high probability
        let probe = field.element_from_u64(u64::MAX);
        if !roots.contains(&probe) {
            assert!(!poly.eval(&probe).is_zero());
        }
    }

    /// Tests that the truncated product is a prefix of the full product
    #[test]
    fn test_mul_trunc() {
        let mut rng = thread_rng();
        let field = fp_224bit();

        let a = random_poly(&field, 20, &mut rng);
        let b = random_poly(&field, 20, &mut rng);
        let full = &a * &b;

        for m in [0, 1, 7, 20, 64] {
            let truncated = a.mul_trunc(&b, m);
            for i in 0..m {
                assert_eq!(truncated.coeff(i), full.coeff(i));
            }
            assert!(truncated.degree().map(|d| d < m).unwrap_or(true));
        }
    }

    /// Tests coefficient access and normalization through `set_coeff`
    #[test]
    fn test_set_coeff_normalization() {
        let field = fp_small();
        let mut poly = DensePolynomial::zero(field.clone());

        poly.set_coeff(3, field.element_from_u64(5));
        assert_eq!(poly.degree(), Some(3));
        assert_eq!(poly.coeff(3), field.element_from_u64(5));
        assert!(poly.coeff(10).is_zero());

        // Zeroing the lead trims back down
        poly.set_coeff(3, field.zero());
        assert!(poly.is_zero());
    }

    /// Tests the derivative on a hand-expanded example
    #[test]
    fn test_derivative() {
        let field = fp_small();
        // 3 + 4x + 5x^2 -> 4 + 10x
        let poly = DensePolynomial::new(
            field.clone(),
            vec![
                field.element_from_u64(3),
                field.element_from_u64(4),
                field.element_from_u64(5),
            ],
        );

        let expected = DensePolynomial::new(
            field.clone(),
            vec![field.element_from_u64(4), field.element_from_u64(10)],
        );
        assert_eq!(poly.derivative(), expected);
    }

    /// Tests gcd against a known common factor
    #[test]
    fn test_gcd_common_factor() {
        let mut rng = thread_rng();
        let field = fp_24bit();

        let common = DensePolynomial::build_from_roots(
            field.clone(),
            &[field.random_element(&mut rng), field.random_element(&mut rng)],
        );
        let a = &common * &random_poly_nonzero(&field, &mut rng);
        let b = &common * &random_poly_nonzero(&field, &mut rng);

        let gcd = DensePolynomial::gcd(&a, &b).unwrap();

        // The common factor divides the gcd, and the gcd divides both inputs
        let (_, rem) = gcd.divrem(&common.make_monic().unwrap()).unwrap();
        assert!(rem.is_zero());
        let (_, r_a) = a.divrem(&gcd).unwrap();
        let (_, r_b) = b.divrem(&gcd).unwrap();
        assert!(r_a.is_zero() && r_b.is_zero());
    }

    /// A nonzero random polynomial of small degree
    fn random_poly_nonzero(
        field: &crate::algebra::FieldContext,
        rng: &mut impl Rng,
    ) -> DensePolynomial {
        loop {
            let poly = random_poly(field, 6, rng);
            if !poly.is_zero() {
                return poly;
            }
        }
    }
}
