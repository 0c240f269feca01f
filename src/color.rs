// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Colors travel with the point through the chaos game, and are
//! summed into the histogram cells the point lands in.

use std::ops::{Add, AddAssign};

/// Three floating-point channels.  While a point is iterated each
/// channel stays in [0, 1]; inside a histogram cell the channels are
/// running sums and can grow without bound.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Color {
    /// Red
    pub r: f64,
    /// Green
    pub g: f64,
    /// Blue
    pub b: f64,
}

/// The color every chaos game starts with.
pub const BLACK: Color = Color {
    r: 0.0,
    g: 0.0,
    b: 0.0,
};

impl Color {
    /// Constructor.
    pub const fn new(r: f64, g: f64, b: f64) -> Color {
        Color { r, g, b }
    }

    /// Move halfway from this color toward `base`.  Applied on every
    /// iteration, so a long run drifts toward the base colors of the
    /// variations it visits most.
    pub fn blend(self, base: Color) -> Color {
        Color {
            r: (self.r + base.r) / 2.0,
            g: (self.g + base.g) / 2.0,
            b: (self.b + base.b) / 2.0,
        }
    }

    /// Divide every channel by `n`.  Used to turn an accumulated sum
    /// back into an average.
    pub fn scale_down(self, n: f64) -> Color {
        Color {
            r: self.r / n,
            g: self.g / n,
            b: self.b / n,
        }
    }

    /// True when no channel is NaN or infinite.
    pub fn is_finite(&self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite()
    }
}

impl Add for Color {
    type Output = Color;

    fn add(self, other: Color) -> Color {
        Color {
            r: self.r + other.r,
            g: self.g + other.g,
            b: self.b + other.b,
        }
    }
}

impl AddAssign for Color {
    fn add_assign(&mut self, other: Color) {
        self.r += other.r;
        self.g += other.g;
        self.b += other.b;
    }
}
