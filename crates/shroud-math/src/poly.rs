//! Dense polynomials and inner products over `F`.

use crate::field::{Field, F};

/// A polynomial stored as its coefficient vector, lowest degree first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DensePoly {
    coefficients: Vec<F>,
}

impl DensePoly {
    pub fn new(coefficients: Vec<F>) -> DensePoly {
        DensePoly { coefficients }
    }

    /// Flattens a row-major matrix into coefficients: entry `(i, j)` becomes
    /// the coefficient of degree `i * cols + j`.
    pub fn from_matrix(matrix: &[Vec<F>]) -> DensePoly {
        let coefficients = matrix.iter().flatten().copied().collect();
        DensePoly { coefficients }
    }

    pub fn coefficients(&self) -> &[F] {
        &self.coefficients
    }

    /// Horner evaluation at `point`.
    pub fn evaluate(&self, field: &Field, point: F) -> F {
        let mut acc = F::ZERO;
        for &c in self.coefficients.iter().rev() {
            acc = field.add(field.mul(acc, point), c);
        }
        acc
    }
}

/// `Σ v[i]·r[i]`. Panics if the lengths differ.
pub fn inner_product(v: &[F], r: &[F], field: &Field) -> F {
    assert_eq!(v.len(), r.len(), "vector lengths do not match");
    let mut sum = F::ZERO;
    for (&vi, &ri) in v.iter().zip(r) {
        sum = field.add(sum, field.mul(vi, ri));
    }
    sum
}
