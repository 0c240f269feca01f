// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The variation library.  A variation is the nonlinear half of a
//! flame function: after the affine pre-map has moved the point, the
//! chosen variation bends it.  Every variation also carries a base
//! color, and the point's color is pulled halfway toward that base
//! each time the variation is applied.

use std::fmt;

use num::Complex;

use color::Color;
use planes::Point;

/// The closed set of variations a flame may use.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Variation {
    /// The identity.
    Linear,
    /// Rotation by the square of the radius.
    Swirl,
    /// Folds the plane like a horseshoe.
    Horseshoe,
    /// Sine of each coordinate, amplified.
    Sinusoidal,
    /// Inversion through the unit circle.
    Spherical,
    /// Angular waves whose twist grows with the radius.
    SpiralWaves,
    /// Radial ripples with a logarithmic twist.
    VortexRings,
}

/// Every variation, in the order they are documented.
pub const ALL_VARIATIONS: [Variation; 7] = [
    Variation::Linear,
    Variation::Swirl,
    Variation::Horseshoe,
    Variation::Sinusoidal,
    Variation::Spherical,
    Variation::SpiralWaves,
    Variation::VortexRings,
];

const SINUSOIDAL_SCALE: f64 = 3.0;

impl Variation {
    /// Look a variation up by the name used in configuration files.
    /// Returns None for names we don't know.
    pub fn lookup(name: &str) -> Option<Variation> {
        match name {
            "linear" => Some(Variation::Linear),
            "swirl" => Some(Variation::Swirl),
            "horseshoe" => Some(Variation::Horseshoe),
            "sinusoidal" => Some(Variation::Sinusoidal),
            "spherical" => Some(Variation::Spherical),
            "spiral_waves" => Some(Variation::SpiralWaves),
            "vortex_rings" => Some(Variation::VortexRings),
            _ => None,
        }
    }

    /// Look a variation up by name.  An unknown name is not an error:
    /// it selects the identity, `Linear`, and says so on the log.
    pub fn from_name(name: &str) -> Variation {
        match Variation::lookup(name) {
            Some(variation) => variation,
            None => {
                warn!("Unknown variation '{}', falling back to linear", name);
                Variation::Linear
            }
        }
    }

    /// The name used in configuration files.
    pub fn name(&self) -> &'static str {
        match *self {
            Variation::Linear => "linear",
            Variation::Swirl => "swirl",
            Variation::Horseshoe => "horseshoe",
            Variation::Sinusoidal => "sinusoidal",
            Variation::Spherical => "spherical",
            Variation::SpiralWaves => "spiral_waves",
            Variation::VortexRings => "vortex_rings",
        }
    }

    /// The color this variation pulls points toward.
    pub fn base_color(&self) -> Color {
        match *self {
            Variation::Linear => Color::new(0.95, 0.85, 0.1),
            Variation::Swirl => Color::new(0.9, 0.3, 0.1),
            Variation::Horseshoe => Color::new(0.95, 0.6, 0.1),
            Variation::Sinusoidal => Color::new(0.8, 0.9, 0.2),
            Variation::Spherical => Color::new(0.7, 0.2, 0.1),
            Variation::SpiralWaves => Color::new(0.95, 0.8, 0.3),
            Variation::VortexRings => Color::new(0.9, 0.5, 0.1),
        }
    }

    /// Apply the variation to a point and its color.  Variations that
    /// divide by the radius send the origin to the origin.
    pub fn apply(&self, point: Point, color: Color) -> (Point, Color) {
        let (x, y) = (point.re, point.im);
        let r = point.norm();
        let next = match *self {
            Variation::Linear => point,
            Variation::Swirl => {
                let (s, c) = (r * r).sin_cos();
                Complex::new(x * s - y * c, x * c + y * s)
            }
            Variation::Horseshoe => {
                if r == 0.0 {
                    Complex::new(0.0, 0.0)
                } else {
                    Complex::new((x - y) * (x + y) / r, 2.0 * x * y / r)
                }
            }
            Variation::Sinusoidal => {
                Complex::new(x.sin() * SINUSOIDAL_SCALE, y.sin() * SINUSOIDAL_SCALE)
            }
            Variation::Spherical => {
                if r == 0.0 {
                    Complex::new(0.0, 0.0)
                } else {
                    point / (r * r)
                }
            }
            Variation::SpiralWaves => {
                let theta = point.arg();
                let radius = r * (1.0 + (theta * 5.0).sin() * 0.3);
                Complex::from_polar(&radius, &(theta + r * 1.5))
            }
            Variation::VortexRings => {
                let theta = point.arg();
                let radius = r * (1.0 + (r * 8.0).sin() * 0.2);
                Complex::from_polar(&radius, &(theta + (r + 1.0).ln() * 2.0))
            }
        };
        (next, color.blend(self.base_color()))
    }
}

impl fmt::Display for Variation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
