//! Defines the scalar type that forms the basis of the kernel's algebra

// ----------------------------
// | Scalar Field Definitions |
// ----------------------------

use std::{
    cmp::Ordering,
    fmt::{Display, Formatter, Result as FmtResult},
    ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign},
};

use num_bigint::BigUint;
use num_traits::{Num, One, Zero};
use serde::{Deserialize, Serialize};

use crate::{
    algebra::{macros::*, FieldContext},
    error::AlgebraError,
};

// ---------------------
// | Scalar Definition |
// ---------------------

/// A field element: a canonical residue in `[0, p)` together with a handle to
/// the field it lives in
///
/// Arithmetic between scalars of different fields is a programming error and
/// panics; data-level modulus mismatches are reported by the protocol layer.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Scalar {
    /// The canonical residue
    value: BigUint,
    /// The field the residue is reduced in
    field: FieldContext,
}

impl Scalar {
    /// Construct a scalar from a value, reducing it modulo the field's prime
    pub fn new(value: BigUint, field: FieldContext) -> Self {
        let value = value % field.modulus();
        Self { value, field }
    }

    /// The field this scalar lives in
    pub fn field(&self) -> &FieldContext {
        &self.field
    }

    /// The canonical residue
    pub fn residue(&self) -> &BigUint {
        &self.value
    }

    /// Clone out the residue as a `BigUint`
    pub fn to_biguint(&self) -> BigUint {
        self.value.clone()
    }

    /// Whether this is the additive identity
    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    /// Whether this is the multiplicative identity
    pub fn is_one(&self) -> bool {
        self.value.is_one()
    }

    /// Compute the multiplicative inverse
    ///
    /// Fails with `NonInvertible` iff the scalar is zero; every other residue
    /// of a prime field is a unit.
    pub fn inverse(&self) -> Result<Scalar, AlgebraError> {
        if self.is_zero() {
            return Err(AlgebraError::NonInvertible);
        }

        // Fermat: x^(p-2) = x^(-1) for prime p
        let exp = self.field.modulus() - BigUint::from(2u8);
        Ok(self.pow_biguint(&exp))
    }

    /// Raise the scalar to a `u64` power
    pub fn pow(&self, exp: u64) -> Scalar {
        self.pow_biguint(&BigUint::from(exp))
    }

    /// Raise the scalar to an arbitrary non-negative power
    pub fn pow_biguint(&self, exp: &BigUint) -> Scalar {
        let value = self.value.modpow(exp, self.field.modulus());
        Scalar { value, field: self.field.clone() }
    }

    /// Parse a scalar from a decimal string, reducing into the field
    pub fn from_decimal_string(s: &str, field: &FieldContext) -> Result<Self, AlgebraError> {
        Self::from_radix_string(s, 10, field)
    }

    /// Parse a scalar from a hexadecimal string, reducing into the field
    pub fn from_hex_string(s: &str, field: &FieldContext) -> Result<Self, AlgebraError> {
        let trimmed = s.trim_start_matches("0x");
        Self::from_radix_string(trimmed, 16, field)
    }

    /// Parse a decimal scalar in the thread's default field
    ///
    /// Boundary parsers install the negotiated field once and read every
    /// subsequent value through this; fails with `FieldUninitialized` when
    /// no default has been installed.
    pub fn from_decimal_default(s: &str) -> Result<Self, AlgebraError> {
        Self::from_decimal_string(s, &FieldContext::current()?)
    }

    /// Parse a hexadecimal scalar in the thread's default field
    pub fn from_hex_default(s: &str) -> Result<Self, AlgebraError> {
        Self::from_hex_string(s, &FieldContext::current()?)
    }

    /// Render the residue as lower-case hex with no prefix
    pub fn to_hex_string(&self) -> String {
        self.value.to_str_radix(16)
    }

    /// Parse a scalar from a string in the given radix
    fn from_radix_string(s: &str, radix: u32, field: &FieldContext) -> Result<Self, AlgebraError> {
        let value = BigUint::from_str_radix(s.trim(), radix)
            .map_err(|e| AlgebraError::MalformedInput(e.to_string()))?;
        Ok(Self::new(value, field.clone()))
    }
}

impl Display for Scalar {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.value)
    }
}

impl Serialize for Scalar {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let value_bytes = self.value.to_bytes_be();
        let modulus_bytes = self.field.modulus().to_bytes_be();
        (value_bytes, modulus_bytes).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Scalar {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (value_bytes, modulus_bytes) = <(Vec<u8>, Vec<u8>)>::deserialize(deserializer)?;
        let modulus = BigUint::from_bytes_be(&modulus_bytes);
        if modulus <= BigUint::one() {
            return Err(serde::de::Error::custom("serialized modulus is not a field"));
        }

        let field = FieldContext::new(modulus);
        Ok(Scalar::new(BigUint::from_bytes_be(&value_bytes), field))
    }
}

// --------------
// | Arithmetic |
// --------------

/// Panic helper for operations that mix fields
fn assert_same_field(lhs: &Scalar, rhs: &Scalar) {
    assert_eq!(lhs.field, rhs.field, "scalars from different fields cannot be combined");
}

// === Addition === //

impl Add<&Scalar> for &Scalar {
    type Output = Scalar;

    fn add(self, rhs: &Scalar) -> Self::Output {
        assert_same_field(self, rhs);
        Scalar::new(&self.value + &rhs.value, self.field.clone())
    }
}
impl_borrow_variants!(Scalar, Add, add, +, Scalar);

// === AddAssign === //

impl AddAssign<Scalar> for Scalar {
    fn add_assign(&mut self, rhs: Scalar) {
        *self = &*self + rhs;
    }
}

impl AddAssign<&Scalar> for Scalar {
    fn add_assign(&mut self, rhs: &Scalar) {
        *self = &*self + rhs;
    }
}

// === Subtraction === //

impl Sub<&Scalar> for &Scalar {
    type Output = Scalar;

    fn sub(self, rhs: &Scalar) -> Self::Output {
        assert_same_field(self, rhs);
        let p = self.field.modulus();
        let value = (p + &self.value - &rhs.value) % p;
        Scalar { value, field: self.field.clone() }
    }
}
impl_borrow_variants!(Scalar, Sub, sub, -, Scalar);

// === SubAssign === //

impl SubAssign<Scalar> for Scalar {
    fn sub_assign(&mut self, rhs: Scalar) {
        *self = &*self - rhs;
    }
}

impl SubAssign<&Scalar> for Scalar {
    fn sub_assign(&mut self, rhs: &Scalar) {
        *self = &*self - rhs;
    }
}

// === Multiplication === //

impl Mul<&Scalar> for &Scalar {
    type Output = Scalar;

    fn mul(self, rhs: &Scalar) -> Self::Output {
        assert_same_field(self, rhs);
        Scalar::new(&self.value * &rhs.value, self.field.clone())
    }
}
impl_borrow_variants!(Scalar, Mul, mul, *, Scalar);

// === MulAssign === //

impl MulAssign<Scalar> for Scalar {
    fn mul_assign(&mut self, rhs: Scalar) {
        *self = &*self * rhs;
    }
}

impl MulAssign<&Scalar> for Scalar {
    fn mul_assign(&mut self, rhs: &Scalar) {
        *self = &*self * rhs;
    }
}

// === Negation === //

impl Neg for &Scalar {
    type Output = Scalar;

    fn neg(self) -> Self::Output {
        let p = self.field.modulus();
        let value = (p - &self.value) % p;
        Scalar { value, field: self.field.clone() }
    }
}
impl_borrow_variants!(Scalar, Neg, neg, -);

// ------------
// | Ordering |
// ------------

impl PartialOrd for Scalar {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Scalar {
    /// Order by canonical residue
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}
