//! Everything that can go wrong between a parameter snapshot and a
//! finished image.  Cancellation is not in here: a cancelled render
//! simply produces nothing.

/// Errors raised by the rendering core.
#[derive(Debug, Fail, PartialEq)]
pub enum RenderError {
    /// A pixel was written with the wrong number of samples.
    #[fail(display = "pixel has {} samples, but the buffer depth is {}", got, expected)]
    InvalidDepth {
        /// The buffer's channel depth.
        expected: usize,
        /// What the writer supplied.
        got: usize,
    },

    /// Target image has no area.
    #[fail(display = "cannot render a {}x{} image", width, height)]
    DegenerateGeometry {
        /// Requested width.
        width: usize,
        /// Requested height.
        height: usize,
    },

    /// Iteration limit of zero.
    #[fail(display = "maximum iterations must be positive")]
    InvalidIterations,

    /// Fragment index out of range.
    #[fail(display = "fragment {} of {} does not exist", index, count)]
    InvalidFragment {
        /// Requested fragment.
        index: usize,
        /// Total fragments.
        count: usize,
    },

    /// Nothing to merge.
    #[fail(display = "cannot merge an empty set of fragments")]
    EmptyMerge,

    /// Fragments of different shapes cannot be interleaved.
    #[fail(
        display = "fragment {} is {} wide with depth {}, expected {} wide with depth {}",
        index, width, depth, expected_width, expected_depth
    )]
    MismatchedFragment {
        /// Position of the offending fragment.
        index: usize,
        /// Its width.
        width: usize,
        /// Its depth.
        depth: usize,
        /// Width of the first fragment.
        expected_width: usize,
        /// Depth of the first fragment.
        expected_depth: usize,
    },

    /// A fragment task died before returning its buffer.
    #[fail(display = "a render worker panicked")]
    WorkerPanicked,

    /// Text input that could not be turned into a parameter.
    #[fail(display = "invalid input: {}", _0)]
    InvalidInput(String),
}
