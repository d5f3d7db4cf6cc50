//! Immutable render parameters.  The caller builds one of these
//! every time something changes and hands it over; the renderer never
//! sees the caller's live state.

use colour::ColourMode;
use error::RenderError;
use fragment::{FractalKind, RenderRequest};
use std::fmt;

/// The two independently rendered views.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum View {
    /// The left-hand, Mandelbrot view.
    Mandelbrot,
    /// The right-hand, Julia view.
    Julia,
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            View::Mandelbrot => f.write_str("mandelbrot"),
            View::Julia => f.write_str("julia"),
        }
    }
}

/// Camera state for one view.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Viewport {
    /// Real part of the point in the middle of the image.
    pub center_x: f64,
    /// Imaginary part of the point in the middle of the image.
    pub center_y: f64,
    /// Zoom level; each step halves the visible window.
    pub zoom: f64,
}

impl Viewport {
    /// A camera looking at `center_x + center_y*i` at `zoom`.
    pub fn new(center_x: f64, center_y: f64, zoom: f64) -> Self {
        Viewport {
            center_x,
            center_y,
            zoom,
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport::new(0.0, 0.0, 0.0)
    }
}

/// One complete set of parameters for one render of one view.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Snapshot {
    /// The camera.
    pub viewport: Viewport,
    /// Target width in pixels.
    pub width: usize,
    /// Target height in pixels.
    pub height: usize,
    /// Exponent of the iterated map.
    pub power: f64,
    /// Iteration limit per pixel.
    pub max_iterations: usize,
    /// How to colour the result.
    pub colour_mode: ColourMode,
    /// Mandelbrot, or Julia with its constant.
    pub kind: FractalKind,
}

impl Snapshot {
    /// The view this snapshot renders into.
    pub fn view(&self) -> View {
        self.kind.view()
    }

    /// Rejects snapshots that cannot produce an image.
    pub fn validate(&self) -> Result<(), RenderError> {
        self.fragment(0, 1).validate()
    }

    /// The request for fragment `index` of `count`.
    pub fn fragment(&self, index: usize, count: usize) -> RenderRequest {
        RenderRequest {
            viewport: self.viewport,
            width: self.width,
            height: self.height,
            power: self.power,
            max_iterations: self.max_iterations,
            colour_mode: self.colour_mode,
            kind: self.kind,
            fragment_index: index,
            fragment_count: count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num::Complex;

    fn snapshot(kind: FractalKind) -> Snapshot {
        Snapshot {
            viewport: Viewport::default(),
            width: 8,
            height: 6,
            power: 2.0,
            max_iterations: 64,
            colour_mode: ColourMode::GrayScale,
            kind,
        }
    }

    #[test]
    fn kind_picks_the_view() {
        assert_eq!(snapshot(FractalKind::Mandelbrot).view(), View::Mandelbrot);
        assert_eq!(
            snapshot(FractalKind::Julia(Complex::new(0.1, 0.2))).view(),
            View::Julia
        );
    }

    #[test]
    fn fragments_carry_every_parameter() {
        let snap = snapshot(FractalKind::Julia(Complex::new(-0.4, 0.6)));
        let req = snap.fragment(2, 5);
        assert_eq!(req.viewport, snap.viewport);
        assert_eq!((req.width, req.height), (8, 6));
        assert_eq!(req.kind, snap.kind);
        assert_eq!((req.fragment_index, req.fragment_count), (2, 5));
    }

    #[test]
    fn zero_sized_snapshots_are_rejected() {
        let mut snap = snapshot(FractalKind::Mandelbrot);
        snap.height = 0;
        assert_eq!(
            snap.validate(),
            Err(RenderError::DegenerateGeometry {
                width: 8,
                height: 0
            })
        );
    }
}
