//! Defines the algebraic types of the kernel: field contexts, scalars, and
//! dense polynomials

mod field;
pub mod poly;
mod scalar;

pub use field::*;
pub use poly::*;
pub use scalar::*;

pub(crate) mod macros;
