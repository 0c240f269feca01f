// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The errors a flame generation can surface to its caller.  Anything
//! that goes wrong inside a single iteration or a single pixel is
//! recovered where it happens and never shows up here.

/// Everything the library can refuse or fail at.
#[derive(Debug, Fail, PartialEq)]
pub enum FlameError {
    /// Each side of the image must be between 1 and `planes::MAX_DIMENSION`.
    #[fail(display = "image dimensions must be between 1 and 65535, got {}x{}", width, height)]
    InvalidDimensions {
        /// Requested width.
        width: usize,
        /// Requested height.
        height: usize,
    },

    /// The variation weights cannot define a selection distribution.
    #[fail(display = "invalid variation weights: {}", _0)]
    InvalidWeights(String),

    /// A chaos game with no iterations draws nothing.
    #[fail(display = "iteration count must be positive")]
    InvalidIterations,

    /// At least one worker is needed.
    #[fail(display = "thread count must be at least 1")]
    InvalidThreads,

    /// Gamma is used as a divisor in the brightness correction.
    #[fail(display = "gamma must be a positive number, got {}", _0)]
    InvalidGamma(f64),

    /// Symmetry is a count of rotated copies.
    #[fail(display = "symmetry level must be at least 1")]
    InvalidSymmetry,

    /// A configuration string could not be read.
    #[fail(display = "could not parse {}: {}", what, input)]
    Parse {
        /// The kind of value being parsed.
        what: &'static str,
        /// The offending text.
        input: String,
    },

    /// Histograms can only be merged when they describe the same canvas.
    #[fail(display = "cannot merge a {}x{} histogram into a {}x{} one", theirs_w, theirs_h, ours_w, ours_h)]
    ShapeMismatch {
        /// Width of the receiving histogram.
        ours_w: usize,
        /// Height of the receiving histogram.
        ours_h: usize,
        /// Width of the histogram being merged in.
        theirs_w: usize,
        /// Height of the histogram being merged in.
        theirs_h: usize,
    },

    /// A worker thread died before handing back its histogram.
    #[fail(display = "worker {} panicked; no histogram produced", worker)]
    WorkerPanicked {
        /// Index of the failed worker.
        worker: usize,
    },

    /// The worker pool itself failed, outside any one worker.
    #[fail(display = "worker pool failed; no histogram produced")]
    WorkerPoolFailed,
}
