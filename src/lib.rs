#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Mandelbrot and Julia renderer
//!
//! The Mandelbrot set is the set of points `c` of the complex plane
//! for which iterating `z <- z^2 + c` from the origin never runs off
//! to infinity.  Fix `c` instead and iterate from every point of the
//! plane, and the points that stay bounded form the Julia set for
//! `c`.  Both sets here are generalized to an arbitrary real power,
//! `z <- z^p + c`, and both are drawn by counting how many iterations
//! a point survives before it leaves the circle of radius two.
//!
//! Rendering is interactive: every pan or zoom produces a new
//! parameter snapshot, and the scheduler throws away whatever it was
//! still computing for that view and starts again.  Each render is
//! split into row-interleaved fragments computed in parallel, so the
//! cost of a render falls with the number of cores.

extern crate crossbeam;
#[macro_use]
extern crate failure;
#[macro_use]
extern crate log;
extern crate num;
extern crate num_cpus;

pub mod buffer;
pub mod cancellation;
pub mod colour;
pub mod complex;
pub mod error;
pub mod escape;
pub mod explorer;
pub mod fragment;
pub mod planes;
pub mod scheduler;
pub mod snapshot;

pub use buffer::ImageBuffer;
pub use colour::ColourMode;
pub use error::RenderError;
pub use explorer::Explorer;
pub use fragment::{render_fragment, FractalKind, RenderRequest};
pub use scheduler::{
    render, Delivery, ImageSink, RenderScheduler, RenderTicket, SchedulerConfig, SessionOutcome,
    SessionState,
};
pub use snapshot::{Snapshot, View, Viewport};
