//! Errors defined across the polynomial kernel and the shuffle protocol layer
use std::{error::Error, fmt::Display};

/// Errors raised by the field, polynomial, FFT, interpolation, and decoding
/// layers
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AlgebraError {
    /// A field operation was attempted before a default field was installed
    FieldUninitialized,
    /// The zero element was inverted
    NonInvertible,
    /// A polynomial was divided by the zero polynomial
    DivisionByZero,
    /// An FFT length that is not a power of two, or an input longer than the
    /// evaluation domain
    BadLength(usize),
    /// The supplied element is not a root of unity of the claimed order
    NotRootOfUnity,
    /// Two evaluation positions coincide
    DuplicatePoint,
    /// A vector had a different length than the operation requires
    LengthMismatch {
        /// The length the operation expected
        expected: usize,
        /// The length it received
        actual: usize,
    },
    /// The remainder/degree test of the decoder failed; the caller may retry
    /// with more shares
    DecodeFailed,
    /// Structurally invalid input to a decoder or interpolator
    MalformedInput(String),
}

impl Display for AlgebraError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlgebraError::FieldUninitialized => {
                write!(f, "no default field installed for this thread")
            },
            AlgebraError::NonInvertible => write!(f, "zero has no multiplicative inverse"),
            AlgebraError::DivisionByZero => write!(f, "polynomial division by zero"),
            AlgebraError::BadLength(n) => write!(f, "invalid length {n} for the evaluation domain"),
            AlgebraError::NotRootOfUnity => write!(f, "element is not a root of unity"),
            AlgebraError::DuplicatePoint => write!(f, "duplicate evaluation point"),
            AlgebraError::LengthMismatch { expected, actual } => {
                write!(f, "length mismatch: expected {expected}, got {actual}")
            },
            AlgebraError::DecodeFailed => write!(f, "decoding failed"),
            AlgebraError::MalformedInput(e) => write!(f, "malformed input: {e}"),
        }
    }
}
impl Error for AlgebraError {}

/// Errors raised by the shuffle protocol surface: the power engine, the sum
/// accumulator, the solver, and their harnesses
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ShuffleError {
    /// An error bubbled up from the polynomial kernel
    Algebra(AlgebraError),
    /// A fold was attempted against accumulator state recorded under a
    /// different modulus or vector length
    AccumulatorMismatch(String),
    /// The summed power vector does not describe any multiset of field
    /// elements; the round should be aborted
    InvalidPowerSums,
    /// Structurally invalid harness or solver input
    MalformedInput(String),
    /// The injected store or barrier failed
    Storage(String),
    /// An invariant that should be unreachable was violated
    Internal(String),
}

impl Display for ShuffleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShuffleError::Algebra(e) => write!(f, "algebra error: {e}"),
            ShuffleError::AccumulatorMismatch(e) => write!(f, "accumulator mismatch: {e}"),
            ShuffleError::InvalidPowerSums => write!(f, "not a valid power-sum sequence"),
            ShuffleError::MalformedInput(e) => write!(f, "malformed input: {e}"),
            ShuffleError::Storage(e) => write!(f, "storage error: {e}"),
            ShuffleError::Internal(e) => write!(f, "internal error: {e}"),
        }
    }
}
impl Error for ShuffleError {}

impl From<AlgebraError> for ShuffleError {
    fn from(e: AlgebraError) -> Self {
        ShuffleError::Algebra(e)
    }
}
