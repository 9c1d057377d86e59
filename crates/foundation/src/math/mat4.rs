//! Column-major 4×4 matrices.
//!
//! Element `(row, col)` lives at index `col * 4 + row`, matching the layout
//! GLSL `mat4` uniforms expect. Builder methods multiply on the right, so
//! `m.translate(t).rotate_x(a)` yields `m · T(t) · Rx(a)` and a vector
//! transformed by the result sees the rotation first.

use super::Vec3;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Mat4(pub [f64; 16]);

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mat4 {
    pub const IDENTITY: Self = Self([
        1.0, 0.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    ]);

    pub fn from_cols(cols: [[f64; 4]; 4]) -> Self {
        let mut m = [0.0; 16];
        for (c, col) in cols.iter().enumerate() {
            m[c * 4..c * 4 + 4].copy_from_slice(col);
        }
        Self(m)
    }

    #[inline]
    pub fn col(&self, c: usize) -> [f64; 4] {
        let m = &self.0;
        [m[c * 4], m[c * 4 + 1], m[c * 4 + 2], m[c * 4 + 3]]
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.0[col * 4 + row]
    }

    /// Narrow to `f32` for GPU upload, keeping column-major order.
    pub fn to_cols_array_f32(&self) -> [f32; 16] {
        self.0.map(|v| v as f32)
    }

    /// `self · other`.
    pub fn mul(&self, other: &Self) -> Self {
        let mut out = [0.0; 16];
        for col in 0..4 {
            for row in 0..4 {
                out[col * 4 + row] = (0..4).map(|k| self.get(row, k) * other.get(k, col)).sum();
            }
        }
        Self(out)
    }

    /// `self · T(v)`.
    pub fn translate(self, v: Vec3) -> Self {
        let [c0, c1, c2, c3] = [self.col(0), self.col(1), self.col(2), self.col(3)];
        let mut t = [0.0; 4];
        for (i, t) in t.iter_mut().enumerate() {
            *t = c0[i] * v.x + c1[i] * v.y + c2[i] * v.z + c3[i];
        }
        Self::from_cols([c0, c1, c2, t])
    }

    /// `self · Rx(rad)`.
    pub fn rotate_x(self, rad: f64) -> Self {
        let (s, c) = rad.sin_cos();
        let [c0, c1, c2, c3] = [self.col(0), self.col(1), self.col(2), self.col(3)];
        let mut y = [0.0; 4];
        let mut z = [0.0; 4];
        for (i, (y, z)) in y.iter_mut().zip(z.iter_mut()).enumerate() {
            *y = c1[i] * c + c2[i] * s;
            *z = c2[i] * c - c1[i] * s;
        }
        Self::from_cols([c0, y, z, c3])
    }

    /// `self · Rz(rad)`.
    pub fn rotate_z(self, rad: f64) -> Self {
        let (s, c) = rad.sin_cos();
        let [c0, c1, c2, c3] = [self.col(0), self.col(1), self.col(2), self.col(3)];
        let mut x = [0.0; 4];
        let mut y = [0.0; 4];
        for (i, (x, y)) in x.iter_mut().zip(y.iter_mut()).enumerate() {
            *x = c0[i] * c + c1[i] * s;
            *y = c1[i] * c - c0[i] * s;
        }
        Self::from_cols([x, y, c2, c3])
    }

    /// Right-handed perspective with OpenGL clip depth in `[-1, 1]`.
    pub fn perspective_rh_gl(fov_y_rad: f64, aspect: f64, near: f64, far: f64) -> Self {
        let f = 1.0 / (0.5 * fov_y_rad).tan();
        let nf = 1.0 / (near - far);

        Self::from_cols([
            [f / aspect, 0.0, 0.0, 0.0],
            [0.0, f, 0.0, 0.0],
            [0.0, 0.0, (far + near) * nf, -1.0],
            [0.0, 0.0, 2.0 * far * near * nf, 0.0],
        ])
    }

    /// Transform `(p, 1)` and return the homogeneous result.
    pub fn transform_point(&self, p: Vec3) -> [f64; 4] {
        let mut out = [0.0; 4];
        for (row, o) in out.iter_mut().enumerate() {
            *o = self.get(row, 0) * p.x + self.get(row, 1) * p.y + self.get(row, 2) * p.z
                + self.get(row, 3);
        }
        out
    }
}
