// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Polar-form helpers on top of `num::Complex`.  The generalized
//! iteration raises `z` to a real, possibly fractional, power, which
//! only makes sense in polar coordinates.

use num::Complex;

/// The only complex type the renderer uses.
pub type Complex64 = Complex<f64>;

/// Polar operations needed by the escape iterator.
pub trait Polar {
    /// Distance from the origin.
    fn radius(&self) -> f64;
    /// Squared distance from the origin; cheaper, and all the escape
    /// test needs.
    fn radius_squared(&self) -> f64;
    /// Angle from the positive real axis.  `atan2(0, 0)` is zero.
    fn argument(&self) -> f64;
    /// Raise to a real exponent: `(r^power, arg * power)` converted
    /// back to rectangular form.
    fn pow(&self, power: f64) -> Self;
}

impl Polar for Complex64 {
    #[inline]
    fn radius(&self) -> f64 {
        self.radius_squared().sqrt()
    }

    #[inline]
    fn radius_squared(&self) -> f64 {
        self.re * self.re + self.im * self.im
    }

    #[inline]
    fn argument(&self) -> f64 {
        self.im.atan2(self.re)
    }

    #[inline]
    fn pow(&self, power: f64) -> Self {
        let rad = self.radius().powf(power);
        let arg = self.argument() * power;
        Complex::new(rad * arg.cos(), rad * arg.sin())
    }
}
