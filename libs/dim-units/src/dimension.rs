//! Seven-axis dimension vectors.
//!
//! A dimension is the exponent tuple `(L, M, T, I, Θ, N, J)` over length,
//! mass, time, electric current, thermodynamic temperature, amount of
//! substance and luminous intensity. Arithmetic on quantities maps to
//! componentwise arithmetic on these exponents.

use crate::error::{Error, Result};
use std::fmt;
use std::ops::{Add, Sub};

/// Number of base axes.
pub const AXES: usize = 7;

/// Tolerance used when a fractional exponent must land on integers.
const INT_EPSILON: f64 = 1e-9;

/// Exponent vector over the seven base axes, in the order
/// length, mass, time, current, temperature, amount, luminous intensity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Dimension(pub [i32; AXES]);

impl Dimension {
    /// The dimensionless identity.
    pub const ZERO: Dimension = Dimension([0; AXES]);

    pub const LENGTH: Dimension = Dimension([1, 0, 0, 0, 0, 0, 0]);
    pub const MASS: Dimension = Dimension([0, 1, 0, 0, 0, 0, 0]);
    pub const TIME: Dimension = Dimension([0, 0, 1, 0, 0, 0, 0]);
    pub const CURRENT: Dimension = Dimension([0, 0, 0, 1, 0, 0, 0]);
    pub const TEMPERATURE: Dimension = Dimension([0, 0, 0, 0, 1, 0, 0]);
    pub const AMOUNT: Dimension = Dimension([0, 0, 0, 0, 0, 1, 0]);
    pub const LUMINOSITY: Dimension = Dimension([0, 0, 0, 0, 0, 0, 1]);

    pub fn new(l: i32, m: i32, t: i32, i: i32, th: i32, n: i32, j: i32) -> Self {
        Dimension([l, m, t, i, th, n, j])
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&e| e == 0)
    }

    /// Raise every exponent by the integer power `k`.
    pub fn pow(self, k: i32) -> Self {
        let mut out = self.0;
        for e in &mut out {
            *e *= k;
        }
        Dimension(out)
    }

    /// Raise every exponent by a fractional power.
    ///
    /// Succeeds only when every resulting component rounds to an integer
    /// within `1e-9`; `(16 m^2)^0.5` is fine, `(1 m)^0.5` is not.
    pub fn powf(self, k: f64) -> Result<Self> {
        let mut out = [0i32; AXES];
        for (slot, &e) in out.iter_mut().zip(self.0.iter()) {
            let scaled = f64::from(e) * k;
            let rounded = scaled.round();
            if (scaled - rounded).abs() > INT_EPSILON {
                return Err(Error::NonIntegerDim);
            }
            *slot = rounded as i32;
        }
        Ok(Dimension(out))
    }

    /// Sum of absolute exponents; the normalizer's measure of how far a
    /// dimension is from a single named unit.
    pub fn complexity(&self) -> u32 {
        self.0.iter().map(|e| e.unsigned_abs()).sum()
    }

    /// `Some(axis)` when the dimension is exactly one base axis at
    /// exponent 1, i.e. a basis vector.
    pub fn single_axis(&self) -> Option<usize> {
        let mut axis = None;
        for (i, &e) in self.0.iter().enumerate() {
            match e {
                0 => {}
                1 if axis.is_none() => axis = Some(i),
                _ => return None,
            }
        }
        axis
    }
}

impl Add for Dimension {
    type Output = Dimension;

    fn add(self, rhs: Dimension) -> Dimension {
        let mut out = self.0;
        for (e, r) in out.iter_mut().zip(rhs.0.iter()) {
            *e += r;
        }
        Dimension(out)
    }
}

impl Sub for Dimension {
    type Output = Dimension;

    fn sub(self, rhs: Dimension) -> Dimension {
        let mut out = self.0;
        for (e, r) in out.iter_mut().zip(rhs.0.iter()) {
            *e -= r;
        }
        Dimension(out)
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, e) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{e}")?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pow_scales_every_axis() {
        let accel = Dimension::new(1, 0, -2, 0, 0, 0, 0);
        assert_eq!(accel.pow(2), Dimension::new(2, 0, -4, 0, 0, 0, 0));
        assert_eq!(accel.pow(0), Dimension::ZERO);
    }

    #[test]
    fn powf_requires_integer_result() {
        let area = Dimension::new(2, 0, 0, 0, 0, 0, 0);
        assert_eq!(area.powf(0.5).unwrap(), Dimension::LENGTH);
        assert_eq!(Dimension::LENGTH.powf(0.5), Err(Error::NonIntegerDim));
    }

    #[test]
    fn single_axis_rejects_higher_exponents() {
        assert_eq!(Dimension::MASS.single_axis(), Some(1));
        assert_eq!(Dimension::new(2, 0, 0, 0, 0, 0, 0).single_axis(), None);
        assert_eq!(Dimension::new(1, 0, -1, 0, 0, 0, 0).single_axis(), None);
        assert_eq!(Dimension::ZERO.single_axis(), None);
    }
}
