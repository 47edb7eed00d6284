//! The Vandermonde micro-kernel cache backing the FFT base case
//!
//! Matrices are keyed by `(n, ω residue, modulus)` so that fields with
//! different moduli can never observe each other's entries; a single mutex
//! guards lookup and insertion.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use num_bigint::BigUint;
use once_cell::sync::Lazy;

use crate::algebra::Scalar;

/// A dense `n×n` matrix with `V[i][j] = ωⁱʲ`
pub(crate) type VandermondeMatrix = Vec<Vec<Scalar>>;

/// The cache key: evaluation length, root-of-unity residue, field modulus
type CacheKey = (usize, BigUint, BigUint);

/// The process-wide matrix cache
static VANDERMONDE_CACHE: Lazy<Mutex<HashMap<CacheKey, Arc<VandermondeMatrix>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// Fetch the `n×n` Vandermonde matrix for `ω`, building it on first use
pub(crate) fn fetch(omega: &Scalar, n: usize) -> Arc<VandermondeMatrix> {
    let key = (n, omega.to_biguint(), omega.field().modulus().clone());

    let mut cache = VANDERMONDE_CACHE.lock().expect("vandermonde cache poisoned");
    if let Some(matrix) = cache.get(&key) {
        return matrix.clone();
    }

    let matrix = Arc::new(build(omega, n));
    cache.insert(key, matrix.clone());
    matrix
}

/// Build the matrix of powers row by row
fn build(omega: &Scalar, n: usize) -> VandermondeMatrix {
    let field = omega.field();

    // Points ω^0, ω^1, ..., ω^(n-1)
    let mut points = Vec::with_capacity(n);
    points.push(field.one());
    for i in 1..n {
        points.push(&points[i - 1] * omega);
    }

    points
        .into_iter()
        .map(|point| {
            let mut row = Vec::with_capacity(n);
            let mut power = field.one();
            for _ in 0..n {
                row.push(power.clone());
                power = power * &point;
            }
            row
        })
        .collect()
}

#[cfg(test)]
mod test {
    use rand::thread_rng;

    use crate::algebra::test_fields::{fp_224bit, fp_24bit};

    use super::fetch;

    /// Tests the matrix contents against direct exponentiation
    #[test]
    fn test_matrix_entries() {
        let mut rng = thread_rng();
        let field = fp_24bit();
        let omega = field.find_root_of_unity(8, &mut rng).unwrap();

        let matrix = fetch(&omega, 8);
        for (i, row) in matrix.iter().enumerate() {
            for (j, entry) in row.iter().enumerate() {
                assert_eq!(*entry, omega.pow((i * j) as u64));
            }
        }
    }

    /// Tests that equal-residue roots in different fields get distinct entries
    #[test]
    fn test_cache_keyed_by_modulus() {
        let mut rng = thread_rng();
        let f1 = fp_24bit();
        let f2 = fp_224bit();

        let w1 = f1.find_root_of_unity(4, &mut rng).unwrap();
        let w2 = f2.find_root_of_unity(4, &mut rng).unwrap();

        let m1 = fetch(&w1, 4);
        let m2 = fetch(&w2, 4);
        assert_eq!(m1[1][1], w1);
        assert_eq!(m2[1][1], w2);
    }
}
