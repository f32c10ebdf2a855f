//! Triangular and trapezoidal membership functions.

use super::FuzzyError;

/// Maps a crisp scalar to a degree of truth in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MembershipFunction {
    /// 0 outside [a, c], ramps to 1 at the apex b
    Triangle { a: f32, b: f32, c: f32 },
    /// 0 outside [a, d], 1 on the plateau [b, c], linear slopes between
    Trapezoid { a: f32, b: f32, c: f32, d: f32 },
}

impl MembershipFunction {
    pub fn triangle(a: f32, b: f32, c: f32) -> Result<Self, FuzzyError> {
        validate(&[a, b, c])?;
        Ok(Self::Triangle { a, b, c })
    }

    pub fn trapezoid(a: f32, b: f32, c: f32, d: f32) -> Result<Self, FuzzyError> {
        validate(&[a, b, c, d])?;
        Ok(Self::Trapezoid { a, b, c, d })
    }

    /// Corner points as a trapezoid (a triangle has b == c)
    fn corners(&self) -> (f32, f32, f32, f32) {
        match *self {
            Self::Triangle { a, b, c } => (a, b, b, c),
            Self::Trapezoid { a, b, c, d } => (a, b, c, d),
        }
    }

    /// Closed interval where the degree can be non-zero
    pub fn support(&self) -> (f32, f32) {
        let (a, _, _, d) = self.corners();
        (a, d)
    }

    pub fn degree(&self, x: f32) -> f32 {
        let (a, b, c, d) = self.corners();
        if x.is_nan() || x < a || x > d {
            return 0.0;
        }
        let degree = if x < b {
            (x - a) / (b - a)
        } else if x <= c {
            1.0
        } else {
            (d - x) / (d - c)
        };
        degree.clamp(0.0, 1.0)
    }
}

fn validate(points: &[f32]) -> Result<(), FuzzyError> {
    if points.iter().any(|p| !p.is_finite()) {
        return Err(FuzzyError::NonFinitePoints(points.to_vec()));
    }
    if points.windows(2).any(|pair| pair[0] > pair[1]) {
        return Err(FuzzyError::NotMonotone(points.to_vec()));
    }
    if points.first() == points.last() {
        return Err(FuzzyError::ZeroWidth(points.to_vec()));
    }
    Ok(())
}
