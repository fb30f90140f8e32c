/// Row-major 3×3 matrix acting on homogeneous pixel coordinates.
///
/// `[a, b, c, d, e, f, g, h, i]` maps `(x, y)` to
/// `((a·x + b·y + c) / w, (d·x + e·y + f) / w)` with `w = g·x + h·y + i`.
/// For an affine matrix the last row is `[0, 0, 1]` and `w` is always 1.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Affine {
    m: [f64; 9],
}

const EPSILON: f64 = 1e-12;

impl Affine {
    pub const IDENTITY: Self = Self {
        m: [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0],
    };

    pub fn from_row_major(values: [f32; 9]) -> Self {
        Self {
            m: values.map(f64::from),
        }
    }

    pub fn scale(sx: f64, sy: f64) -> Self {
        Self {
            m: [sx, 0.0, 0.0, 0.0, sy, 0.0, 0.0, 0.0, 1.0],
        }
    }

    pub fn translate(tx: f64, ty: f64) -> Self {
        Self {
            m: [1.0, 0.0, tx, 0.0, 1.0, ty, 0.0, 0.0, 1.0],
        }
    }

    /// Row-major values, narrowed to the `f32` wire representation.
    pub fn to_row_major(&self) -> [f32; 9] {
        self.m.map(|v| v as f32)
    }

    pub fn determinant(&self) -> f64 {
        let [a, b, c, d, e, f, g, h, i] = self.m;
        a * (e * i - f * h) - b * (d * i - f * g) + c * (d * h - e * g)
    }

    /// The inverse matrix, or `None` if this one is singular or not finite.
    pub fn inverse(&self) -> Option<Self> {
        let det = self.determinant();
        if !det.is_finite() || det.abs() < EPSILON {
            return None;
        }
        let [a, b, c, d, e, f, g, h, i] = self.m;
        let inv = [
            e * i - f * h,
            c * h - b * i,
            b * f - c * e,
            f * g - d * i,
            a * i - c * g,
            c * d - a * f,
            d * h - e * g,
            b * g - a * h,
            a * e - b * d,
        ];
        Some(Self {
            m: inv.map(|v| v / det),
        })
    }

    /// Map a point. Returns `None` for points at infinity.
    pub fn apply(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        let [a, b, c, d, e, f, g, h, i] = self.m;
        let w = g * x + h * y + i;
        if w.abs() < EPSILON {
            return None;
        }
        Some(((a * x + b * y + c) / w, (d * x + e * y + f) / w))
    }

    /// `self` followed by `other`.
    pub fn then(&self, other: &Self) -> Self {
        let mut out = [0.0; 9];
        for row in 0..3 {
            for col in 0..3 {
                out[row * 3 + col] = (0..3)
                    .map(|k| other.m[row * 3 + k] * self.m[k * 3 + col])
                    .sum();
            }
        }
        Self { m: out }
    }
}

impl Default for Affine {
    fn default() -> Self {
        Self::IDENTITY
    }
}
