//! LU factorisation with partial pivoting and a single-sweep Gauss-Seidel
//! solver for warm-started approximate solves.
//!
//! The factorisation has no singularity guard: a zero pivot propagates
//! non-finite values into `solve`/`invert` results.

use super::matrix::{Matrix, Vector};

/// Packed `L`/`U` factors of a row-permuted square matrix.
#[derive(Debug, Clone, Copy)]
pub struct Lu<const N: usize> {
    /// Strictly-lower part holds `L` (unit diagonal implied), upper part holds `U`.
    factors: Matrix<N, N>,
    /// `permutation[i]` is the source row now stored at row `i`.
    permutation: [usize; N],
    /// `true` when an odd number of row swaps was performed.
    odd_swaps: bool,
}

impl<const N: usize> Matrix<N, N> {
    pub fn lu(&self) -> Lu<N> {
        Lu::decompose(self)
    }
}

impl<const N: usize> Lu<N> {
    pub fn decompose(matrix: &Matrix<N, N>) -> Self {
        let mut factors = *matrix;
        let mut permutation = [0usize; N];
        for (i, slot) in permutation.iter_mut().enumerate() {
            *slot = i;
        }
        let mut odd_swaps = false;

        for k in 0..N {
            let mut pivot_row = k;
            let mut pivot_abs = factors[(k, k)].abs();
            for r in (k + 1)..N {
                let candidate = factors[(r, k)].abs();
                if candidate > pivot_abs {
                    pivot_abs = candidate;
                    pivot_row = r;
                }
            }

            if pivot_row != k {
                for c in 0..N {
                    let tmp = factors[(k, c)];
                    factors[(k, c)] = factors[(pivot_row, c)];
                    factors[(pivot_row, c)] = tmp;
                }
                permutation.swap(k, pivot_row);
                odd_swaps = !odd_swaps;
            }

            let pivot = factors[(k, k)];
            for r in (k + 1)..N {
                let factor = factors[(r, k)] / pivot;
                factors[(r, k)] = factor;
                for c in (k + 1)..N {
                    factors[(r, c)] -= factor * factors[(k, c)];
                }
            }
        }

        Self {
            factors,
            permutation,
            odd_swaps,
        }
    }

    pub fn permutation(&self) -> &[usize; N] {
        &self.permutation
    }

    pub fn odd_swaps(&self) -> bool {
        self.odd_swaps
    }

    pub fn determinant(&self) -> f32 {
        let product: f32 = self.factors.diagonal().iter().product();
        if self.odd_swaps {
            -product
        } else {
            product
        }
    }

    /// Solves `A x = b` by forward and back substitution.
    pub fn solve(&self, rhs: &Vector<N>) -> Vector<N> {
        let mut x = Vector::<N>::zeros();
        for i in 0..N {
            let mut sum = rhs[self.permutation[i]];
            for j in 0..i {
                sum -= self.factors[(i, j)] * x[j];
            }
            x[i] = sum;
        }
        for i in (0..N).rev() {
            let mut sum = x[i];
            for j in (i + 1)..N {
                sum -= self.factors[(i, j)] * x[j];
            }
            x[i] = sum / self.factors[(i, i)];
        }
        x
    }

    pub fn invert(&self) -> Matrix<N, N> {
        let mut inverse = Matrix::<N, N>::zeros();
        for col in 0..N {
            let mut unit = Vector::<N>::zeros();
            unit[col] = 1.0;
            let solved = self.solve(&unit);
            for row in 0..N {
                inverse[(row, col)] = solved[row];
            }
        }
        inverse
    }
}

/// Performs exactly one Gauss-Seidel sweep on `A x = b`, updating `x` in place.
///
/// `x` doubles as the warm-start seed: callers keep it between sweeps.
pub fn gauss_seidel_step<const N: usize>(a: &Matrix<N, N>, b: &Vector<N>, x: &mut Vector<N>) {
    for i in 0..N {
        let mut sum = b[i];
        for j in 0..N {
            if j != i {
                sum -= a[(i, j)] * x[j];
            }
        }
        x[i] = sum / a[(i, i)];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn sample() -> Matrix<4, 4> {
        Matrix::from_rows([
            [0.5, 3.0, -1.0, 2.0],
            [4.0, 1.0, 0.0, -2.0],
            [1.0, -1.0, 5.0, 0.5],
            [2.0, 0.0, 1.0, 6.0],
        ])
    }

    #[test]
    fn solve_recovers_known_solution() {
        let a = sample();
        let x = Vector::<4>::from_array([1.0, -2.0, 0.5, 3.0]);
        let b = a * x;
        let solved = a.lu().solve(&b);
        for i in 0..4 {
            assert_abs_diff_eq!(solved[i], x[i], epsilon = 1e-4);
        }
    }

    #[test]
    fn inverse_times_matrix_is_identity() {
        let a = sample();
        let product = a.lu().invert() * a;
        let identity = Matrix::<4, 4>::identity();
        for r in 0..4 {
            for c in 0..4 {
                assert_abs_diff_eq!(product[(r, c)], identity[(r, c)], epsilon = 1e-4);
            }
        }
    }

    #[test]
    fn determinant_sign_follows_swap_parity() {
        // Needs exactly one row swap: the first pivot sits in row 1.
        let a = Matrix::<2, 2>::from_rows([[1.0, 2.0], [3.0, 4.0]]);
        let lu = a.lu();
        assert!(lu.odd_swaps());
        assert_eq!(lu.permutation(), &[1, 0]);
        assert_abs_diff_eq!(lu.determinant(), -2.0, epsilon = 1e-5);

        let swapped = Matrix::<2, 2>::from_rows([[3.0, 4.0], [1.0, 2.0]]);
        let lu = swapped.lu();
        assert!(!lu.odd_swaps());
        assert_abs_diff_eq!(lu.determinant(), 2.0, epsilon = 1e-5);
    }

    #[test]
    fn singular_matrix_is_not_guarded() {
        let singular = Matrix::<2, 2>::from_rows([[1.0, 2.0], [2.0, 4.0]]);
        let solved = singular.lu().solve(&Vector::from_array([1.0, 1.0]));
        assert!(!solved.is_finite());
    }

    #[test]
    fn gauss_seidel_converges_on_diagonally_dominant_system() {
        let a = Matrix::<3, 3>::from_rows([[4.0, 1.0, 0.0], [1.0, 5.0, 1.0], [0.0, 1.0, 3.0]]);
        let expected = Vector::<3>::from_array([1.0, 2.0, -1.0]);
        let b = a * expected;

        let mut x = Vector::<3>::zeros();
        gauss_seidel_step(&a, &b, &mut x);
        let first_error = (x - expected).norm_squared();
        for _ in 0..30 {
            gauss_seidel_step(&a, &b, &mut x);
        }
        let final_error = (x - expected).norm_squared();

        assert!(final_error < first_error);
        assert!(final_error < 1e-8, "error {final_error}");
    }
}
