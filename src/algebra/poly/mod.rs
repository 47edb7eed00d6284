//! Dense polynomial types over runtime prime fields

#![allow(clippy::module_inception)]

mod factor;
mod poly;

pub use factor::*;
pub use poly::*;
