//! Fixed-size dense matrices for the small systems assembled by the constraint
//! projectors (6×6 strain systems, 6×9 Jacobians, Kronecker products).
//!
//! `glam` covers 3D vectors and 3×3 rotations; anything larger lives here.

use std::ops::{Add, AddAssign, Index, IndexMut, Mul, Neg, Sub, SubAssign};

use glam::{Mat3, Vec3};

/// Row-major `R`×`C` matrix of `f32`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix<const R: usize, const C: usize> {
    data: [[f32; C]; R],
}

/// Column vector.
pub type Vector<const N: usize> = Matrix<N, 1>;

impl<const R: usize, const C: usize> Default for Matrix<R, C> {
    fn default() -> Self {
        Self::zeros()
    }
}

impl<const R: usize, const C: usize> Matrix<R, C> {
    pub fn zeros() -> Self {
        Self {
            data: [[0.0; C]; R],
        }
    }

    pub fn from_rows(data: [[f32; C]; R]) -> Self {
        Self { data }
    }

    pub fn rows(&self) -> &[[f32; C]; R] {
        &self.data
    }

    pub fn transpose(&self) -> Matrix<C, R> {
        let mut out = Matrix::<C, R>::zeros();
        for r in 0..R {
            for c in 0..C {
                out.data[c][r] = self.data[r][c];
            }
        }
        out
    }

    /// Copies the `BR`×`BC` block whose top-left corner sits at `(row, col)`.
    pub fn block<const BR: usize, const BC: usize>(
        &self,
        row: usize,
        col: usize,
    ) -> Matrix<BR, BC> {
        debug_assert!(row + BR <= R && col + BC <= C, "block out of range");
        let mut out = Matrix::<BR, BC>::zeros();
        for r in 0..BR {
            for c in 0..BC {
                out.data[r][c] = self.data[row + r][col + c];
            }
        }
        out
    }

    /// Overwrites the block whose top-left corner sits at `(row, col)`.
    pub fn set_block<const BR: usize, const BC: usize>(
        &mut self,
        row: usize,
        col: usize,
        block: &Matrix<BR, BC>,
    ) {
        debug_assert!(row + BR <= R && col + BC <= C, "block out of range");
        for r in 0..BR {
            for c in 0..BC {
                self.data[row + r][col + c] = block.data[r][c];
            }
        }
    }

    /// Stacks `other` below `self`.
    pub fn concat_rows<const R2: usize, const RO: usize>(
        &self,
        other: &Matrix<R2, C>,
    ) -> Matrix<RO, C> {
        const { assert!(RO == R + R2, "row concatenation size mismatch") };
        let mut out = Matrix::<RO, C>::zeros();
        out.set_block(0, 0, self);
        out.set_block(R, 0, other);
        out
    }

    /// Places `other` to the right of `self`.
    pub fn concat_cols<const C2: usize, const CO: usize>(
        &self,
        other: &Matrix<R, C2>,
    ) -> Matrix<R, CO> {
        const { assert!(CO == C + C2, "column concatenation size mismatch") };
        let mut out = Matrix::<R, CO>::zeros();
        out.set_block(0, 0, self);
        out.set_block(0, C, other);
        out
    }

    /// Kronecker product `self ⊗ rhs`.
    pub fn kronecker<const R2: usize, const C2: usize, const RO: usize, const CO: usize>(
        &self,
        rhs: &Matrix<R2, C2>,
    ) -> Matrix<RO, CO> {
        const { assert!(RO == R * R2 && CO == C * C2, "kronecker size mismatch") };
        let mut out = Matrix::<RO, CO>::zeros();
        for r in 0..R {
            for c in 0..C {
                let scale = self.data[r][c];
                if scale == 0.0 {
                    continue;
                }
                for r2 in 0..R2 {
                    for c2 in 0..C2 {
                        out.data[r * R2 + r2][c * C2 + c2] = scale * rhs.data[r2][c2];
                    }
                }
            }
        }
        out
    }

    /// Frobenius inner product (the dot product for vectors).
    pub fn dot(&self, other: &Self) -> f32 {
        let mut sum = 0.0;
        for r in 0..R {
            for c in 0..C {
                sum += self.data[r][c] * other.data[r][c];
            }
        }
        sum
    }

    pub fn norm_squared(&self) -> f32 {
        self.dot(self)
    }

    /// Product `self * rhs` for a pair whose result is known to be symmetric
    /// (e.g. `J · W · Jᵀ`). Only the upper triangle is evaluated.
    pub fn mul_symmetric(&self, rhs: &Matrix<C, R>) -> Matrix<R, R> {
        let mut out = Matrix::<R, R>::zeros();
        for r in 0..R {
            for c in r..R {
                let mut sum = 0.0;
                for k in 0..C {
                    sum += self.data[r][k] * rhs.data[k][c];
                }
                out.data[r][c] = sum;
                out.data[c][r] = sum;
            }
        }
        out
    }

    pub fn is_finite(&self) -> bool {
        self.data.iter().flatten().all(|v| v.is_finite())
    }
}

impl<const N: usize> Matrix<N, N> {
    pub fn identity() -> Self {
        let mut out = Self::zeros();
        for i in 0..N {
            out.data[i][i] = 1.0;
        }
        out
    }

    pub fn from_diagonal(diagonal: [f32; N]) -> Self {
        let mut out = Self::zeros();
        for (i, value) in diagonal.into_iter().enumerate() {
            out.data[i][i] = value;
        }
        out
    }

    pub fn diagonal(&self) -> [f32; N] {
        let mut out = [0.0; N];
        for (i, value) in out.iter_mut().enumerate() {
            *value = self.data[i][i];
        }
        out
    }
}

impl<const N: usize> Vector<N> {
    pub fn from_array(values: [f32; N]) -> Self {
        let mut out = Self::zeros();
        for (i, value) in values.into_iter().enumerate() {
            out.data[i][0] = value;
        }
        out
    }

    pub fn to_array(&self) -> [f32; N] {
        let mut out = [0.0; N];
        for (i, value) in out.iter_mut().enumerate() {
            *value = self.data[i][0];
        }
        out
    }

    /// Reads three consecutive entries starting at `offset` as a `Vec3`.
    pub fn vec3_at(&self, offset: usize) -> Vec3 {
        Vec3::new(
            self.data[offset][0],
            self.data[offset + 1][0],
            self.data[offset + 2][0],
        )
    }
}

impl Matrix<3, 3> {
    pub fn from_mat3(m: Mat3) -> Self {
        // glam stores columns; transpose into rows.
        let cols = m.to_cols_array_2d();
        let mut out = Self::zeros();
        for (c, col) in cols.iter().enumerate() {
            for (r, value) in col.iter().enumerate() {
                out.data[r][c] = *value;
            }
        }
        out
    }

    pub fn to_mat3(&self) -> Mat3 {
        Mat3::from_cols(self.column3(0), self.column3(1), self.column3(2))
    }

    pub fn from_cols3(a: Vec3, b: Vec3, c: Vec3) -> Self {
        Self::from_rows([[a.x, b.x, c.x], [a.y, b.y, c.y], [a.z, b.z, c.z]])
    }

    pub fn column3(&self, col: usize) -> Vec3 {
        Vec3::new(self.data[0][col], self.data[1][col], self.data[2][col])
    }
}

impl<const R: usize, const C: usize> Index<(usize, usize)> for Matrix<R, C> {
    type Output = f32;

    fn index(&self, (row, col): (usize, usize)) -> &f32 {
        &self.data[row][col]
    }
}

impl<const R: usize, const C: usize> IndexMut<(usize, usize)> for Matrix<R, C> {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut f32 {
        &mut self.data[row][col]
    }
}

impl<const N: usize> Index<usize> for Vector<N> {
    type Output = f32;

    fn index(&self, row: usize) -> &f32 {
        &self.data[row][0]
    }
}

impl<const N: usize> IndexMut<usize> for Vector<N> {
    fn index_mut(&mut self, row: usize) -> &mut f32 {
        &mut self.data[row][0]
    }
}

impl<const R: usize, const C: usize> Add for Matrix<R, C> {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self += rhs;
        self
    }
}

impl<const R: usize, const C: usize> AddAssign for Matrix<R, C> {
    fn add_assign(&mut self, rhs: Self) {
        for r in 0..R {
            for c in 0..C {
                self.data[r][c] += rhs.data[r][c];
            }
        }
    }
}

impl<const R: usize, const C: usize> Sub for Matrix<R, C> {
    type Output = Self;

    fn sub(mut self, rhs: Self) -> Self {
        self -= rhs;
        self
    }
}

impl<const R: usize, const C: usize> SubAssign for Matrix<R, C> {
    fn sub_assign(&mut self, rhs: Self) {
        for r in 0..R {
            for c in 0..C {
                self.data[r][c] -= rhs.data[r][c];
            }
        }
    }
}

impl<const R: usize, const C: usize> Neg for Matrix<R, C> {
    type Output = Self;

    fn neg(self) -> Self {
        self * -1.0
    }
}

impl<const R: usize, const C: usize> Mul<f32> for Matrix<R, C> {
    type Output = Self;

    fn mul(mut self, rhs: f32) -> Self {
        for row in self.data.iter_mut() {
            for value in row.iter_mut() {
                *value *= rhs;
            }
        }
        self
    }
}

impl<const R: usize, const C: usize, const K: usize> Mul<Matrix<C, K>> for Matrix<R, C> {
    type Output = Matrix<R, K>;

    fn mul(self, rhs: Matrix<C, K>) -> Matrix<R, K> {
        let mut out = Matrix::<R, K>::zeros();
        for r in 0..R {
            for k in 0..C {
                let lhs = self.data[r][k];
                if lhs == 0.0 {
                    continue;
                }
                for c in 0..K {
                    out.data[r][c] += lhs * rhs.data[k][c];
                }
            }
        }
        out
    }
}
