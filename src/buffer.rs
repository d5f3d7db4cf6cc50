//! A flat, row-major, channel-interleaved pixel store, and the
//! machinery to reassemble an image out of row-interleaved
//! fragments.

use error::RenderError;

/// Channels per pixel in every buffer the renderer produces.
pub const RGB_DEPTH: usize = 3;

/// An image of `width * height` pixels of `depth` samples each.  The
/// size is fixed at construction.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageBuffer {
    width: usize,
    height: usize,
    depth: usize,
    pixels: Vec<u8>,
}

impl ImageBuffer {
    /// A black RGB image.
    pub fn new(width: usize, height: usize) -> Self {
        ImageBuffer::with_depth(RGB_DEPTH, width, height)
    }

    /// A zeroed image with an arbitrary number of channels.
    pub fn with_depth(depth: usize, width: usize, height: usize) -> Self {
        ImageBuffer {
            width,
            height,
            depth,
            pixels: vec![0 as u8; width * height * depth],
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Samples per pixel.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The raw samples.
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    /// Consumes the buffer, handing back its samples.
    pub fn into_bytes(self) -> Vec<u8> {
        self.pixels
    }

    #[inline]
    fn offset(&self, x: usize, y: usize) -> usize {
        (y * self.width + x) * self.depth
    }

    /// Writes one pixel.  Rejects a sample count that does not match
    /// the buffer's depth rather than truncating or padding it.
    pub fn set_pixel(&mut self, x: usize, y: usize, pixel: &[u8]) -> Result<(), RenderError> {
        if pixel.len() != self.depth {
            return Err(RenderError::InvalidDepth {
                expected: self.depth,
                got: pixel.len(),
            });
        }
        assert!(x < self.width && y < self.height);
        let offset = self.offset(x, y);
        self.pixels[offset..offset + self.depth].copy_from_slice(pixel);
        Ok(())
    }

    /// Reads one pixel.
    pub fn get_pixel(&self, x: usize, y: usize) -> &[u8] {
        let offset = self.offset(x, y);
        &self.pixels[offset..offset + self.depth]
    }

    /// One full row of samples.
    pub fn row(&self, y: usize) -> &[u8] {
        let stride = self.width * self.depth;
        &self.pixels[y * stride..(y + 1) * stride]
    }

    fn row_mut(&mut self, y: usize) -> &mut [u8] {
        let stride = self.width * self.depth;
        &mut self.pixels[y * stride..(y + 1) * stride]
    }

    /// Given the fragments of a render in fragment order, weave them
    /// back into one image.  Local row `j` of fragment `i` lands on
    /// row `i + fragments.len() * j`; this must stay the inverse of
    /// the split in `fragment::fragment_row`.  Trailing fragments may
    /// be one row shorter than leading ones, or empty.
    pub fn merge(fragments: &[ImageBuffer]) -> Result<ImageBuffer, RenderError> {
        let first = fragments.first().ok_or(RenderError::EmptyMerge)?;
        let (width, depth) = (first.width, first.depth);

        for (index, fragment) in fragments.iter().enumerate() {
            if fragment.width != width || fragment.depth != depth {
                return Err(RenderError::MismatchedFragment {
                    index,
                    width: fragment.width,
                    depth: fragment.depth,
                    expected_width: width,
                    expected_depth: depth,
                });
            }
        }

        let height = fragments.iter().map(|f| f.height).sum();
        let count = fragments.len();
        let mut merged = ImageBuffer::with_depth(depth, width, height);
        for (index, fragment) in fragments.iter().enumerate() {
            for local in 0..fragment.height {
                let y = index + count * local;
                if y < height {
                    merged.row_mut(y).copy_from_slice(fragment.row(local));
                }
            }
        }
        Ok(merged)
    }

    /// Copies this image into the top-left corner of a caller-owned
    /// surface of the same depth.  Whatever does not fit is dropped.
    pub fn blit(&self, surface: &mut [u8], surface_width: usize, surface_height: usize) {
        let w = self.width.min(surface_width);
        let h = self.height.min(surface_height);
        let span = w * self.depth;
        for y in 0..h {
            let dst = y * surface_width * self.depth;
            if dst + span > surface.len() {
                break;
            }
            surface[dst..dst + span].copy_from_slice(&self.row(y)[..span]);
        }
    }
}

impl Default for ImageBuffer {
    fn default() -> Self {
        ImageBuffer::new(0, 0)
    }
}
