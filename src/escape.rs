// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The escape-time iterator.
//!
//! Both sets come from the same map, `z <- z^power + a`.  For the
//! Mandelbrot set the pixel's point is `a` and `z` starts at the
//! origin; for a Julia set the pixel's point is the starting `z` and
//! `a` is a constant shared by the whole image.  The number of
//! iterations a point survives before leaving the circle of radius
//! two is what gets coloured.

use complex::{Complex64, Polar};
use num::Complex;

/// How a point fared under iteration.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum IterationResult {
    /// Left the escape circle on this (zero-based) iteration.
    Escaped(usize),
    /// Never left within the iteration limit; part of the set.
    Inside,
}

impl IterationResult {
    /// True for points that belong to the set.
    pub fn is_inside(self) -> bool {
        self == IterationResult::Inside
    }
}

/// Which role the sampled point plays in the iteration.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Orientation {
    /// The point is `c`; iteration starts from the origin.
    Mandelbrot,
    /// The point is the starting `z`; the given constant is added
    /// every step.
    Julia(Complex64),
}

const ESCAPE_RADIUS_SQUARED: f64 = 4.0;

/// This is our classic iterator function, generalized to real
/// powers.  It either returns the iteration on which `point` escaped,
/// or `Inside`.  A NaN or infinite orbit counts as escaped, so this
/// always finishes after at most `max_iterations` steps.
pub fn iterate(
    point: Complex64,
    power: f64,
    max_iterations: usize,
    orientation: Orientation,
) -> IterationResult {
    let (mut z, add) = match orientation {
        // A `c` outside the circle counts as escaped without iterating.
        Orientation::Mandelbrot => {
            if !(point.radius_squared() < ESCAPE_RADIUS_SQUARED) {
                return IterationResult::Escaped(0);
            }
            (Complex::new(0.0, 0.0), point)
        }
        // Not for a starting `z`: below power one it can fall back in.
        Orientation::Julia(constant) => (point, constant),
    };

    for i in 0..max_iterations {
        z = z.pow(power) + add;
        if !(z.radius_squared() < ESCAPE_RADIUS_SQUARED) {
            return IterationResult::Escaped(i);
        }
    }
    IterationResult::Inside
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_is_in_the_mandelbrot_set() {
        let r = iterate(Complex::new(0.0, 0.0), 2.0, 100, Orientation::Mandelbrot);
        assert!(r.is_inside());
    }

    #[test]
    fn far_points_escape_immediately() {
        let r = iterate(Complex::new(2.0, 2.0), 2.0, 100, Orientation::Mandelbrot);
        assert_eq!(r, IterationResult::Escaped(0));
        let r = iterate(Complex::new(0.0, 2.0), 0.5, 100, Orientation::Mandelbrot);
        assert_eq!(r, IterationResult::Escaped(0));
    }

    #[test]
    fn julia_points_outside_the_circle_are_iterated() {
        let k = Orientation::Julia(Complex::new(0.0, 0.0));
        // 3 -> 1.73 -> 1.32 -> ... -> 1 under the square root.
        assert!(iterate(Complex::new(3.0, 0.0), 0.5, 50, k).is_inside());
        // With squaring it still leaves on the first step.
        assert_eq!(
            iterate(Complex::new(-3.0, 0.0), 2.0, 50, k),
            IterationResult::Escaped(0)
        );
        // Exactly on the circle is not a free escape either.
        assert!(iterate(Complex::new(2.0, 0.0), 0.5, 50, k).is_inside());
    }

    #[test]
    fn one_escapes_on_the_second_step() {
        // 0 -> 1 -> 2: the second value sits on the circle.
        let r = iterate(Complex::new(1.0, 0.0), 2.0, 100, Orientation::Mandelbrot);
        assert_eq!(r, IterationResult::Escaped(1));
    }

    #[test]
    fn minus_one_cycles_forever() {
        let r = iterate(Complex::new(-1.0, 0.0), 2.0, 500, Orientation::Mandelbrot);
        assert!(r.is_inside());
    }

    #[test]
    fn julia_with_zero_constant_is_the_unit_disc() {
        let k = Orientation::Julia(Complex::new(0.0, 0.0));
        assert!(iterate(Complex::new(0.5, 0.5), 2.0, 200, k).is_inside());
        assert!(!iterate(Complex::new(1.1, 0.0), 2.0, 200, k).is_inside());
    }

    #[test]
    fn pathological_powers_terminate() {
        let points = [
            Complex::new(0.0, 0.0),
            Complex::new(1e-300, -1e-300),
            Complex::new(0.3, 0.4),
            Complex::new(-1.99, 0.0),
        ];
        let powers = [0.0, -1.0, -2.5, 0.5, 1e6, -1e6, std::f64::NAN];
        for point in points.iter() {
            for power in powers.iter() {
                for &orientation in [
                    Orientation::Mandelbrot,
                    Orientation::Julia(Complex::new(-0.8, 0.156)),
                ]
                .iter()
                {
                    match iterate(*point, *power, 64, orientation) {
                        IterationResult::Escaped(n) => assert!(n < 64),
                        IterationResult::Inside => (),
                    }
                }
            }
        }
    }

    #[test]
    fn negative_power_at_origin_counts_as_escaped() {
        let r = iterate(
            Complex::new(0.0, 0.0),
            -2.0,
            10,
            Orientation::Julia(Complex::new(0.0, 0.0)),
        );
        assert_eq!(r, IterationResult::Escaped(0));
    }

    #[test]
    fn zero_iterations_means_inside() {
        let r = iterate(Complex::new(0.1, 0.1), 2.0, 0, Orientation::Mandelbrot);
        assert!(r.is_inside());
    }
}
