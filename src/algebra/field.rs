//! Runtime prime-field contexts
//!
//! Every scalar and polynomial in the kernel carries a handle to the field it
//! lives in, so two fields with different moduli can coexist in one process.
//! The process-global modulus of older MPC stacks survives only as a
//! thread-local *default* installed at an API boundary.

use std::{
    cell::RefCell,
    fmt::{Debug, Display, Formatter, Result as FmtResult},
    hash::{Hash, Hasher},
    sync::Arc,
};

use num_bigint::{BigUint, RandBigInt};
use num_traits::{One, Zero};
use rand::RngCore;

use crate::error::AlgebraError;

use super::Scalar;

thread_local! {
    /// The field implicitly used by boundary conveniences on this thread
    static DEFAULT_FIELD: RefCell<Option<FieldContext>> = const { RefCell::new(None) };
}

/// A prime field `F_p` with a runtime-chosen modulus
///
/// Cloning is cheap; all clones share the modulus allocation. Equality is
/// equality of moduli, so contexts built independently from the same prime
/// interoperate.
#[derive(Clone)]
pub struct FieldContext {
    /// The prime modulus, shared by every element of the field
    modulus: Arc<BigUint>,
}

impl FieldContext {
    /// Construct a field from its prime modulus
    ///
    /// Primality is not checked; callers feed the kernel the modulus their
    /// protocol negotiated.
    ///
    /// # Panics
    /// Panics if `modulus < 2`, which is not a field for any argument.
    pub fn new(modulus: BigUint) -> Self {
        assert!(modulus > BigUint::one(), "field modulus must be at least 2");
        Self { modulus: Arc::new(modulus) }
    }

    /// The field modulus
    pub fn modulus(&self) -> &BigUint {
        &self.modulus
    }

    /// The bit length of the modulus
    pub fn bit_length(&self) -> u64 {
        self.modulus.bits()
    }

    /// Install this field as the thread's default
    pub fn install_default(&self) {
        DEFAULT_FIELD.with(|cell| *cell.borrow_mut() = Some(self.clone()));
    }

    /// The thread's default field, if one has been installed
    pub fn current() -> Result<Self, AlgebraError> {
        DEFAULT_FIELD
            .with(|cell| cell.borrow().clone())
            .ok_or(AlgebraError::FieldUninitialized)
    }

    /// Clear the thread's default field
    pub fn clear_default() {
        DEFAULT_FIELD.with(|cell| *cell.borrow_mut() = None);
    }

    /// Build a field element from a value, reducing it into `[0, p)`
    pub fn element(&self, value: BigUint) -> Scalar {
        Scalar::new(value, self.clone())
    }

    /// Build a field element from a `u64`
    pub fn element_from_u64(&self, value: u64) -> Scalar {
        self.element(BigUint::from(value))
    }

    /// The additive identity of this field
    pub fn zero(&self) -> Scalar {
        self.element(BigUint::zero())
    }

    /// The multiplicative identity of this field
    pub fn one(&self) -> Scalar {
        self.element(BigUint::one())
    }

    /// Sample a uniform field element
    pub fn random_element<R: RngCore>(&self, rng: &mut R) -> Scalar {
        self.element(rng.gen_biguint_below(&self.modulus))
    }

    /// Find a principal `n`-th root of unity for a power-of-two `n`
    ///
    /// Rejection-samples `x^((p-1)/n)` until the result has exact order `n`,
    /// i.e. `ω^n = 1` and `ω^(n/2) ≠ 1`. Requires `n | p - 1`; fails with
    /// `MalformedInput` when the subgroup does not exist.
    pub fn find_root_of_unity<R: RngCore>(
        &self,
        n: usize,
        rng: &mut R,
    ) -> Result<Scalar, AlgebraError> {
        if n == 0 || n & (n - 1) != 0 {
            return Err(AlgebraError::BadLength(n));
        }
        let group_order = self.modulus.as_ref() - BigUint::one();
        let n_big = BigUint::from(n);
        if (&group_order % &n_big) != BigUint::zero() {
            return Err(AlgebraError::MalformedInput(format!(
                "no subgroup of order {n}: {n} does not divide p - 1"
            )));
        }

        let cofactor = &group_order / &n_big;
        if n == 1 {
            return Ok(self.one());
        }
        loop {
            let sample = self.random_element(rng);
            if sample.is_zero() {
                continue;
            }

            // A nonzero cofactor power always satisfies ω^n = 1; exact order
            // n is equivalent to ω^(n/2) ≠ 1 when n is a power of two
            let candidate = sample.pow_biguint(&cofactor);
            if candidate.pow(n as u64 / 2) != self.one() {
                return Ok(candidate);
            }
        }
    }
}

impl PartialEq for FieldContext {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.modulus, &other.modulus) || self.modulus == other.modulus
    }
}
impl Eq for FieldContext {}

impl Hash for FieldContext {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.modulus.hash(state);
    }
}

impl Debug for FieldContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("FieldContext").field("modulus", &self.modulus).finish()
    }
}

impl Display for FieldContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "F_{}", self.modulus)
    }
}

#[cfg(test)]
mod test {
    use num_bigint::BigUint;
    use rand::thread_rng;

    use crate::algebra::test_fields::{fp_224bit, fp_24bit, fp_small};

    use super::FieldContext;

    /// Tests that the thread-local default round trips and clears
    #[test]
    fn test_default_field_install() {
        FieldContext::clear_default();
        assert!(FieldContext::current().is_err());

        let field = fp_small();
        field.install_default();
        assert_eq!(FieldContext::current().unwrap(), field);

        FieldContext::clear_default();
        assert!(FieldContext::current().is_err());
    }

    /// Tests the modulus bit-length accessor
    #[test]
    fn test_bit_length() {
        // 23 = 10111
        assert_eq!(fp_small().bit_length(), 5);
        assert_eq!(fp_24bit().bit_length(), 25);
        assert_eq!(fp_224bit().bit_length(), 224);
    }

    /// Tests that contexts built from the same modulus compare equal
    #[test]
    fn test_context_identity() {
        let f1 = FieldContext::new(BigUint::from(23u64));
        let f2 = FieldContext::new(BigUint::from(23u64));
        let f3 = FieldContext::new(BigUint::from(29u64));

        assert_eq!(f1, f2);
        assert_ne!(f1, f3);
    }

    /// Tests root-of-unity search over an NTT-friendly prime
    #[test]
    fn test_find_root_of_unity() {
        let mut rng = thread_rng();
        let field = fp_24bit();

        for log_n in 1..=10u32 {
            let n = 1usize << log_n;
            let omega = field.find_root_of_unity(n, &mut rng).unwrap();

            assert_eq!(omega.pow(n as u64), field.one());
            assert_ne!(omega.pow(n as u64 / 2), field.one());
        }
    }

    /// Tests that a missing subgroup is reported rather than looping
    #[test]
    fn test_find_root_of_unity_no_subgroup() {
        let mut rng = thread_rng();
        // 23 - 1 = 22 has no subgroup of order 4
        let field = fp_small();
        assert!(field.find_root_of_unity(4, &mut rng).is_err());
    }
}
