// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Renders one fragment of an image.
//!
//! A render is split into `fragment_count` fragments by dealing the
//! rows out round-robin: fragment `i` owns rows `i`, `i + n`,
//! `i + 2n`, and so on.  Dealing rows instead of cutting the image
//! into bands means a half-finished render already covers the whole
//! picture at a coarser resolution.  `ImageBuffer::merge` undoes the
//! deal.

use buffer::ImageBuffer;
use cancellation::{CancellationChecker, NeverCancel};
use colour::ColourMode;
use complex::Complex64;
use error::RenderError;
use escape::{iterate, Orientation};
use planes::{Pixel, PlaneMapper};
use snapshot::{View, Viewport};

/// Which of the two sets to draw.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum FractalKind {
    /// The generalized Mandelbrot set.
    Mandelbrot,
    /// The Julia set for the given constant.
    Julia(Complex64),
}

impl FractalKind {
    /// The display slot this kind of fractal renders into.
    pub fn view(self) -> View {
        match self {
            FractalKind::Mandelbrot => View::Mandelbrot,
            FractalKind::Julia(_) => View::Julia,
        }
    }

    fn orientation(self) -> Orientation {
        match self {
            FractalKind::Mandelbrot => Orientation::Mandelbrot,
            FractalKind::Julia(constant) => Orientation::Julia(constant),
        }
    }
}

/// Everything needed to compute one fragment of one render.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RenderRequest {
    /// The camera.
    pub viewport: Viewport,
    /// Width of the whole image, not the fragment.
    pub width: usize,
    /// Height of the whole image, not the fragment.
    pub height: usize,
    /// Exponent of the iterated map.
    pub power: f64,
    /// Iteration limit per pixel.
    pub max_iterations: usize,
    /// How to colour the result.
    pub colour_mode: ColourMode,
    /// Mandelbrot, or Julia with its constant.
    pub kind: FractalKind,
    /// Which fragment this is.
    pub fragment_index: usize,
    /// How many fragments the render was split into.
    pub fragment_count: usize,
}

impl RenderRequest {
    /// Checks the request describes real work.
    pub fn validate(&self) -> Result<(), RenderError> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::DegenerateGeometry {
                width: self.width,
                height: self.height,
            });
        }
        if self.max_iterations == 0 {
            return Err(RenderError::InvalidIterations);
        }
        if self.fragment_index >= self.fragment_count {
            return Err(RenderError::InvalidFragment {
                index: self.fragment_index,
                count: self.fragment_count,
            });
        }
        Ok(())
    }

    /// The plane mapping for the whole image this fragment belongs to.
    pub fn plane(&self) -> PlaneMapper {
        PlaneMapper::new(
            self.width,
            self.height,
            self.viewport.zoom,
            self.viewport.center_x,
            self.viewport.center_y,
        )
    }
}

/// Rows owned by fragment `index` out of `count` in an image `height`
/// rows tall.  Leading fragments absorb the remainder.
pub fn fragment_height(height: usize, index: usize, count: usize) -> usize {
    height / count + if index < height % count { 1 } else { 0 }
}

/// The image row that local row `local` of fragment `index` samples.
#[inline]
pub fn fragment_row(local: usize, index: usize, count: usize) -> usize {
    local * count + index
}

/// Renders the fragment described by `request`.
pub fn render_fragment(request: &RenderRequest) -> Result<ImageBuffer, RenderError> {
    render_fragment_with(request, &NeverCancel).map(Option::unwrap_or_default)
}

/// Renders the fragment described by `request`, checking `checker`
/// between rows.  Returns `Ok(None)` if the render was cancelled.
pub fn render_fragment_with<C>(
    request: &RenderRequest,
    checker: &C,
) -> Result<Option<ImageBuffer>, RenderError>
where
    C: CancellationChecker,
{
    request.validate()?;

    let plane = request.plane();
    let orientation = request.kind.orientation();
    let rows = fragment_height(
        request.height,
        request.fragment_index,
        request.fragment_count,
    );
    let mut img = ImageBuffer::new(request.width, rows);

    for y in 0..rows {
        if checker.is_cancelled() {
            return Ok(None);
        }
        let row = fragment_row(y, request.fragment_index, request.fragment_count);
        for x in 0..request.width {
            let point = plane.pixel_to_point(&Pixel(x, row));
            let held = iterate(point, request.power, request.max_iterations, orientation);
            let pixel = request.colour_mode.pixel_for(held, request.max_iterations);
            img.set_pixel(x, y, &pixel)?;
        }
    }
    Ok(Some(img))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cancellation::CancelToken;
    use num::Complex;

    fn request(width: usize, height: usize, index: usize, count: usize) -> RenderRequest {
        RenderRequest {
            viewport: Viewport::new(-0.5, 0.0, 0.5),
            width,
            height,
            power: 2.0,
            max_iterations: 40,
            colour_mode: ColourMode::ColourFade,
            kind: FractalKind::Mandelbrot,
            fragment_index: index,
            fragment_count: count,
        }
    }

    #[test]
    fn heights_add_up() {
        for height in 0..20 {
            for count in 1..7 {
                let total: usize = (0..count).map(|i| fragment_height(height, i, count)).sum();
                assert_eq!(total, height);
            }
        }
    }

    #[test]
    fn leading_fragments_take_the_remainder() {
        assert_eq!(fragment_height(10, 0, 4), 3);
        assert_eq!(fragment_height(10, 1, 4), 3);
        assert_eq!(fragment_height(10, 2, 4), 2);
        assert_eq!(fragment_height(10, 3, 4), 2);
        assert_eq!(fragment_height(2, 3, 4), 0);
    }

    #[test]
    fn rows_are_dealt_round_robin() {
        let rows: Vec<usize> = (0..3).map(|y| fragment_row(y, 1, 4)).collect();
        assert_eq!(rows, vec![1, 5, 9]);
    }

    #[test]
    fn fragment_rows_match_the_whole_render() {
        let whole = render_fragment(&request(13, 11, 0, 1)).unwrap();
        let count = 3;
        for index in 0..count {
            let part = render_fragment(&request(13, 11, index, count)).unwrap();
            assert_eq!(part.height(), fragment_height(11, index, count));
            for y in 0..part.height() {
                assert_eq!(part.row(y), whole.row(fragment_row(y, index, count)));
            }
        }
    }

    #[test]
    fn split_then_merge_reproduces_the_whole_render() {
        let whole = render_fragment(&request(17, 9, 0, 1)).unwrap();
        for count in 1..12 {
            let parts: Vec<ImageBuffer> = (0..count)
                .map(|index| render_fragment(&request(17, 9, index, count)).unwrap())
                .collect();
            assert_eq!(ImageBuffer::merge(&parts).unwrap(), whole);
        }
    }

    #[test]
    fn four_by_four_corner_is_white_in_either_split() {
        let mut req = request(4, 4, 0, 1);
        req.viewport = Viewport::new(0.0, 0.0, 0.0);
        req.max_iterations = 50;
        req.colour_mode = ColourMode::BlackWhite;
        let whole = render_fragment(&req).unwrap();

        req.fragment_count = 2;
        let first = render_fragment(&req).unwrap();
        assert_eq!(first.height(), 2);

        // Pixel 0,0 is -2-2i, well outside the escape circle.
        assert_eq!(whole.get_pixel(0, 0), &[255, 255, 255]);
        assert_eq!(first.get_pixel(0, 0), whole.get_pixel(0, 0));
    }

    #[test]
    fn julia_renders_use_the_constant() {
        let mut req = request(9, 9, 0, 1);
        req.viewport = Viewport::new(0.0, 0.0, 0.0);
        req.colour_mode = ColourMode::BlackWhite;
        req.kind = FractalKind::Julia(Complex::new(0.0, 0.0));
        let img = render_fragment(&req).unwrap();
        // The zero-constant Julia set is the unit disc.
        assert_eq!(img.get_pixel(4, 4), &[0, 0, 0]);
        assert_eq!(img.get_pixel(0, 4), &[255, 255, 255]);
    }

    #[test]
    fn invalid_requests_are_rejected() {
        assert_eq!(
            render_fragment(&request(0, 4, 0, 1)),
            Err(RenderError::DegenerateGeometry {
                width: 0,
                height: 4
            })
        );
        assert_eq!(
            render_fragment(&request(4, 4, 2, 2)),
            Err(RenderError::InvalidFragment { index: 2, count: 2 })
        );
        let mut req = request(4, 4, 0, 1);
        req.max_iterations = 0;
        assert_eq!(render_fragment(&req), Err(RenderError::InvalidIterations));
    }

    #[test]
    fn cancelled_fragments_produce_nothing() {
        let token = CancelToken::new();
        token.cancel();
        assert_eq!(render_fragment_with(&request(8, 8, 0, 1), &token), Ok(None));
    }
}
