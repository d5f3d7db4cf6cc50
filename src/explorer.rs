//! The state behind the two fractal views: where each camera is,
//! and the parameters both views share.  Mouse gestures and text
//! edits come in here; snapshots for the scheduler come out.
//!
//! The Julia view always renders the Julia set for the point at the
//! center of the Mandelbrot view, so panning the Mandelbrot view
//! invalidates both images.

use colour::ColourMode;
use complex::Complex64;
use error::RenderError;
use fragment::FractalKind;
use num::Complex;
use planes::PlaneMapper;
use snapshot::{Snapshot, View, Viewport};
use std::str::FromStr;

/// Zoom change per unit of scroll wheel travel.
pub const ZOOM_PER_SCROLL: f64 = 0.02;
/// Iteration limit before anything else is chosen.
pub const DEFAULT_ITERATIONS: usize = 128;
/// Exponent before anything else is chosen.
pub const DEFAULT_POWER: f64 = 2.0;

/// Everything the user can change.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Explorer {
    /// The Mandelbrot camera.
    pub mandelbrot: Viewport,
    /// The Julia camera.
    pub julia: Viewport,
    /// Exponent of the iterated map, shared by both views.
    pub power: f64,
    /// Iteration limit, shared by both views.
    pub max_iterations: usize,
    /// Colouring, shared by both views.
    pub colour_mode: ColourMode,
}

impl Default for Explorer {
    fn default() -> Self {
        Explorer {
            mandelbrot: Viewport::default(),
            julia: Viewport::default(),
            power: DEFAULT_POWER,
            max_iterations: DEFAULT_ITERATIONS,
            colour_mode: ColourMode::default(),
        }
    }
}

impl Explorer {
    /// The camera of `view`.
    pub fn viewport(&self, view: View) -> Viewport {
        match view {
            View::Mandelbrot => self.mandelbrot,
            View::Julia => self.julia,
        }
    }

    fn viewport_mut(&mut self, view: View) -> &mut Viewport {
        match view {
            View::Mandelbrot => &mut self.mandelbrot,
            View::Julia => &mut self.julia,
        }
    }

    /// The constant the Julia view iterates with.
    pub fn julia_constant(&self) -> Complex64 {
        Complex::new(self.mandelbrot.center_x, self.mandelbrot.center_y)
    }

    /// Views that must be redrawn after `view` changes.
    pub fn affected_by(view: View) -> &'static [View] {
        match view {
            View::Mandelbrot => &[View::Mandelbrot, View::Julia],
            View::Julia => &[View::Julia],
        }
    }

    /// The mouse was dragged `dx, dy` pixels over `view`, which is
    /// `width x height` pixels on screen.  The plane follows the
    /// mouse.  Returns the views to redraw.
    pub fn drag(&mut self, view: View, dx: f64, dy: f64, width: usize, height: usize) -> &'static [View] {
        let camera = self.viewport_mut(view);
        let plane = PlaneMapper::new(width, height, camera.zoom, camera.center_x, camera.center_y);
        camera.center_x -= plane.drag_distance_x(dx);
        camera.center_y -= plane.drag_distance_y(dy);
        Explorer::affected_by(view)
    }

    /// The scroll wheel moved `delta` units over `view`.  Zooming the
    /// Mandelbrot view leaves its center, and so the Julia constant,
    /// alone.
    pub fn scroll(&mut self, view: View, delta: f64) -> &'static [View] {
        self.viewport_mut(view).zoom += delta * ZOOM_PER_SCROLL;
        match view {
            View::Mandelbrot => &[View::Mandelbrot],
            View::Julia => &[View::Julia],
        }
    }

    /// Sets the iteration limit from text.  On bad input the last good
    /// value stays.
    pub fn set_iterations_text(&mut self, text: &str) -> Result<usize, RenderError> {
        match usize::from_str(text.trim()) {
            Ok(n) if n > 0 => {
                self.max_iterations = n;
                Ok(n)
            }
            _ => Err(RenderError::InvalidInput(format!(
                "iterations must be a positive integer, not {:?}",
                text
            ))),
        }
    }

    /// Sets the exponent from text.  On bad input the last good value
    /// stays.
    pub fn set_power_text(&mut self, text: &str) -> Result<f64, RenderError> {
        match f64::from_str(text.trim()) {
            Ok(p) if p.is_finite() => {
                self.power = p;
                Ok(p)
            }
            _ => Err(RenderError::InvalidInput(format!(
                "power must be a finite number, not {:?}",
                text
            ))),
        }
    }

    /// Sets one coordinate of a camera from text.  On bad input the
    /// last good value stays.
    pub fn set_viewport_text(
        &mut self,
        view: View,
        field: ViewportField,
        text: &str,
    ) -> Result<f64, RenderError> {
        let value = match f64::from_str(text.trim()) {
            Ok(v) if v.is_finite() => v,
            _ => {
                return Err(RenderError::InvalidInput(format!(
                    "{} {:?} must be a finite number, not {:?}",
                    view, field, text
                )))
            }
        };
        let camera = self.viewport_mut(view);
        match field {
            ViewportField::CenterX => camera.center_x = value,
            ViewportField::CenterY => camera.center_y = value,
            ViewportField::Zoom => camera.zoom = value,
        }
        Ok(value)
    }

    /// The parameters for rendering `view` at `width x height`.
    pub fn snapshot(&self, view: View, width: usize, height: usize) -> Snapshot {
        let kind = match view {
            View::Mandelbrot => FractalKind::Mandelbrot,
            View::Julia => FractalKind::Julia(self.julia_constant()),
        };
        Snapshot {
            viewport: self.viewport(view),
            width,
            height,
            power: self.power,
            max_iterations: self.max_iterations,
            colour_mode: self.colour_mode,
            kind,
        }
    }
}

/// The editable coordinates of a camera.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ViewportField {
    /// Real part of the center.
    CenterX,
    /// Imaginary part of the center.
    CenterY,
    /// Zoom level.
    Zoom,
}
