// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Turns a finished histogram into pixels.
//!
//! A cell's color is the average of the colors that landed in it.  Its
//! brightness grows with the logarithm of its hit count, saturating at
//! 1 once `ln(count + 1)` reaches `BRIGHTNESS_SCALE`, and is then
//! gamma-corrected.  Pixels nobody hit stay black.

use std::time::Instant;

use num::clamp;

use color::Color;
use histogram::{Cell, Histogram};

/// Controls how quickly pixels saturate to full brightness.
pub const BRIGHTNESS_SCALE: f64 = 10.0;

const BLACK_PIXEL: [u8; 3] = [0, 0, 0];

/// Log-density brightness of a cell hit `count` times, in [0, 1].
pub fn brightness(count: u64) -> f64 {
    (((count as f64) + 1.0).ln() / BRIGHTNESS_SCALE).min(1.0)
}

/// `brightness ^ (1 / gamma)`.
pub fn gamma_correct(brightness: f64, gamma: f64) -> f64 {
    brightness.powf(1.0 / gamma)
}

fn channel(average: f64, brightness: f64) -> u8 {
    clamp((average * brightness * 255.0).round(), 0.0, 255.0) as u8
}

/// The RGB value of a single cell.  A cell that cannot be turned into
/// a color (no hits, or sums that are not finite) is black.
pub fn pixel_color(cell: &Cell, gamma: f64) -> [u8; 3] {
    if cell.count == 0 {
        return BLACK_PIXEL;
    }
    let Color { r, g, b } = cell.color.scale_down(cell.count as f64);
    let light = gamma_correct(brightness(cell.count), gamma);
    if !(r.is_finite() && g.is_finite() && b.is_finite() && light.is_finite()) {
        return BLACK_PIXEL;
    }
    [channel(r, light), channel(g, light), channel(b, light)]
}

/// Render the whole histogram as a row-major RGB8 buffer of
/// `width * height * 3` bytes.
pub fn render(histogram: &Histogram) -> Vec<u8> {
    let start = Instant::now();
    let plane = histogram.plane();
    // The plane's dimensions were checked to fit this buffer.
    let mut pixels = vec![0 as u8; plane.len() * 3];
    for (pixel, cell) in histogram.cells() {
        let offset = plane.pixel_to_offset(pixel) * 3;
        pixels[offset..offset + 3].copy_from_slice(&pixel_color(cell, histogram.gamma()));
    }
    info!("Image rendered in {:.2?}", start.elapsed());
    pixels
}
