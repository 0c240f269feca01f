#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Fractal flame renderer
//!
//! A fractal flame is drawn with the chaos game.  Start with a random
//! point, and over and over again move it with a function picked at
//! random from a small weighted set: an affine map followed by a
//! nonlinear "variation."  Each position the point visits is mapped
//! to the nearest integral pixel, and that pixel's hit count is
//! incremented while the point's color is added to the pixel's color
//! sum.  After a few hundred thousand iterations the histogram is
//! turned into an image: the color of each pixel is its average
//! color, and its brightness is the logarithm of its hit count,
//! gamma-corrected.
//!
//! The game can be played by several workers at once.  Each has its
//! own seed and its own histogram, and the histograms are summed when
//! they are all done.

extern crate crossbeam;
#[macro_use]
extern crate failure;
#[macro_use]
extern crate log;
extern crate num;
extern crate rand;
extern crate serde;
extern crate serde_json;

pub mod affine;
pub mod color;
pub mod config;
pub mod engine;
pub mod errors;
pub mod histogram;
pub mod planes;
pub mod render;
pub mod transform;
pub mod variations;

pub use affine::{AffineParameters, AffineTransformer};
pub use color::Color;
pub use config::{Config, ConfigFile, VariationSpec};
pub use engine::FlameRenderer;
pub use errors::FlameError;
pub use histogram::{Cell, Histogram};
pub use planes::{Pixel, PlaneMapper, Point};
pub use render::render;
pub use transform::TransformationSystem;
pub use variations::Variation;
