//! Contains the PlaneMapper struct, which describes a relationship
//! between a rectangle on the integral plane with an origin at 0,0,
//! and a window on the complex plane described by a center and a
//! zoom level.  Larger zoom means a smaller window; every step of
//! zoom halves the visible extent.
use complex::Complex64;
use num::Complex;

/// Describes the width and height of an integral plane that is assumed to start at
/// 0,0 and all values are assumed to be non-negative integers.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IntegralPlane(pub usize, pub usize);

/// Describes the x, y of a pixel in the integral plane.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pixel(pub usize, pub usize);

/// Maps pixels on the integral plane to points on the complex plane,
/// and mouse drags on the former to pans on the latter.  The window
/// follows the image aspect ratio.
#[derive(Copy, Clone, Debug)]
pub struct PlaneMapper {
    /// The size of the integral cartesian plane.
    pub integral_plane: IntegralPlane,
    // Size of one pixel on the complex plane, per axis.
    grid_factors: (f64, f64),
    // The complex point that pixel 0,0 lands on.
    origin: Complex64,
}

impl PlaneMapper {
    /// Constructor.  Takes the size of the image, the zoom level, and
    /// the point of the complex plane that should sit in the middle of
    /// the image.
    pub fn new(width: usize, height: usize, zoom: f64, center_x: f64, center_y: f64) -> PlaneMapper {
        let wcomp = 2.0_f64.powf(2.0 - zoom);
        let hcomp = (height as f64 / width.max(1) as f64) * wcomp;

        // A one pixel wide image still spans the window; clamp the
        // denominator rather than divide by zero.
        let grid_factors = (
            wcomp / (width.max(2) - 1) as f64,
            hcomp / (height.max(2) - 1) as f64,
        );

        PlaneMapper {
            integral_plane: IntegralPlane(width, height),
            grid_factors,
            origin: Complex::new(center_x - wcomp / 2.0, center_y - hcomp / 2.0),
        }
    }

    /// The total number of points in the integral grid.
    pub fn len(&self) -> usize {
        self.integral_plane.0 * self.integral_plane.1
    }

    /// Describes that the integral plane is of a size.
    pub fn is_empty(&self) -> bool {
        self.integral_plane.0 == 0 || self.integral_plane.1 == 0
    }

    /// Given a pixel on the integral cartesian plane, map it to the
    /// equivalent point on the complex cartesian plane.
    #[inline]
    pub fn pixel_to_point(&self, pixel: &Pixel) -> Complex64 {
        Complex::new(
            (pixel.0 as f64) * self.grid_factors.0 + self.origin.re,
            (pixel.1 as f64) * self.grid_factors.1 + self.origin.im,
        )
    }

    /// How far the complex plane moves horizontally when the mouse
    /// is dragged `pixels` pixels.
    pub fn drag_distance_x(&self, pixels: f64) -> f64 {
        pixels * self.grid_factors.0
    }

    /// How far the complex plane moves vertically when the mouse is
    /// dragged `pixels` pixels.
    pub fn drag_distance_y(&self, pixels: f64) -> f64 {
        pixels * self.grid_factors.1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn corners_are_symmetric_about_center() {
        for &(zoom, cx, cy) in &[(0.0, 0.0, 0.0), (3.5, -0.75, 0.1), (-2.0, 1.0, -1.0)] {
            let pm = PlaneMapper::new(640, 480, zoom, cx, cy);
            let ul = pm.pixel_to_point(&Pixel(0, 0));
            let lr = pm.pixel_to_point(&Pixel(639, 479));
            assert!(close((ul.re + lr.re) / 2.0, cx));
            assert!(close((ul.im + lr.im) / 2.0, cy));
        }
    }

    #[test]
    fn zoom_zero_spans_four_units() {
        let pm = PlaneMapper::new(5, 5, 0.0, 0.0, 0.0);
        assert_eq!(pm.pixel_to_point(&Pixel(0, 0)), Complex::new(-2.0, -2.0));
        assert_eq!(pm.pixel_to_point(&Pixel(2, 2)), Complex::new(0.0, 0.0));
        assert_eq!(pm.pixel_to_point(&Pixel(4, 4)), Complex::new(2.0, 2.0));
    }

    #[test]
    fn each_zoom_step_halves_the_window() {
        let wide = PlaneMapper::new(100, 100, 1.0, 0.0, 0.0);
        let narrow = PlaneMapper::new(100, 100, 2.0, 0.0, 0.0);
        let w = wide.pixel_to_point(&Pixel(99, 0)).re - wide.pixel_to_point(&Pixel(0, 0)).re;
        let n = narrow.pixel_to_point(&Pixel(99, 0)).re - narrow.pixel_to_point(&Pixel(0, 0)).re;
        assert!(close(w, 2.0 * n));
    }

    #[test]
    fn window_follows_image_aspect_ratio() {
        let pm = PlaneMapper::new(800, 400, 0.0, 0.0, 0.0);
        let ul = pm.pixel_to_point(&Pixel(0, 0));
        let lr = pm.pixel_to_point(&Pixel(799, 399));
        assert!(close(ul.re, -2.0) && close(lr.re, 2.0));
        assert!(close(ul.im, -1.0) && close(lr.im, 1.0));
    }

    #[test]
    fn single_pixel_images_do_not_divide_by_zero() {
        let pm = PlaneMapper::new(1, 1, 0.0, 0.5, -0.5);
        let p = pm.pixel_to_point(&Pixel(0, 0));
        assert!(p.re.is_finite() && p.im.is_finite());
        assert!(pm.drag_distance_x(10.0).is_finite());
        assert!(pm.drag_distance_y(10.0).is_finite());
    }

    #[test]
    fn dragging_a_full_width_covers_the_window() {
        let pm = PlaneMapper::new(401, 401, 0.0, 0.0, 0.0);
        assert!(close(pm.drag_distance_x(400.0), 4.0));
        assert!(close(pm.drag_distance_y(-400.0), -4.0));
    }

    #[test]
    fn len_and_is_empty() {
        let pm = PlaneMapper::new(4, 3, 0.0, 0.0, 0.0);
        assert_eq!(pm.len(), 12);
        assert!(!pm.is_empty());
        assert!(PlaneMapper::new(0, 3, 0.0, 0.0, 0.0).is_empty());
    }
}
