#![deny(missing_docs)]
#![deny(clippy::missing_docs_in_private_items)]

//! The finite-field polynomial kernel of an honest-majority MPC toolkit
//!
//! The crate provides the algebra behind an anonymous-broadcast shuffle:
//! power-sum encodings of secret messages, the Reed–Solomon-style machinery
//! those encodings lean on (FFT over a prime field, Lagrange and FFT-backed
//! interpolation, Gao decoding of corrupted evaluations), and the shared
//! accumulator that aggregates per-party results under a cross-process
//! exclusion barrier.
//!
//! Fields carry a runtime-chosen prime modulus: every [`algebra::Scalar`]
//! and [`algebra::DensePolynomial`] holds a handle to its
//! [`algebra::FieldContext`], so concurrent protocols over different primes
//! never interfere. Networking, share distribution, and round scheduling
//! live in the surrounding toolkit; this crate only computes.

pub mod algebra;
pub mod decode;
pub mod error;
pub mod ffi;
pub mod fft;
pub mod interpolate;
pub mod shuffle;

pub use error::{AlgebraError, ShuffleError};
