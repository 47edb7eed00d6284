//! Defines macros useful for creating arithmetic implementations

/// Given an implementation of an arithmetic trait on two borrowed references,
/// this macro implements the same arithmetic on the owned and partially-owned
/// variants
macro_rules! impl_borrow_variants {
    // Unary operation
    ($target:ty, $trait:ident, $fn_name:ident, $op:tt) => {
        impl $trait for $target {
            type Output = $target;

            fn $fn_name(self) -> Self::Output {
                $op &self
            }
        }
    };

    // Binary operation, output type same as left hand side
    ($lhs:ty, $trait:ident, $fn_name:ident, $op:tt, $rhs:ty) => {
        /// lhs borrowed, rhs owned
        impl<'a> $trait<$rhs> for &'a $lhs {
            type Output = $lhs;

            fn $fn_name(self, rhs: $rhs) -> Self::Output {
                self $op &rhs
            }
        }

        /// lhs owned, rhs borrowed
        impl<'a> $trait<&'a $rhs> for $lhs {
            type Output = $lhs;

            fn $fn_name(self, rhs: &'a $rhs) -> Self::Output {
                &self $op rhs
            }
        }

        /// lhs owned, rhs owned
        impl $trait<$rhs> for $lhs {
            type Output = $lhs;

            fn $fn_name(self, rhs: $rhs) -> Self::Output {
                &self $op &rhs
            }
        }
    };
}

pub(crate) use impl_borrow_variants;
