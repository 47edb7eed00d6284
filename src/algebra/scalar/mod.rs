//! Scalar types over runtime prime fields

#![allow(clippy::module_inception)]

mod scalar;

pub use scalar::*;
