// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The affine pre-map applied to every point before a variation is
//! chosen.  An affine map that expands area sends the chaos game off
//! to infinity, so the transformer refuses to hold one: on
//! construction any map whose determinant exceeds 1 is scaled down
//! until its determinant is exactly 1.

use num::Complex;
use serde::Deserialize;

use planes::Point;

/// The six coefficients of `x' = a·x + b·y + c`, `y' = d·x + e·y + f`.
#[derive(Copy, Clone, Debug, PartialEq, Deserialize)]
pub struct AffineParameters {
    /// x scale/rotation
    pub a: f64,
    /// x shear from y
    pub b: f64,
    /// x translation
    pub c: f64,
    /// y shear from x
    pub d: f64,
    /// y scale/rotation
    pub e: f64,
    /// y translation
    pub f: f64,
}

impl AffineParameters {
    /// The identity map.
    pub fn identity() -> AffineParameters {
        AffineParameters {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 0.0,
            e: 1.0,
            f: 0.0,
        }
    }

    /// The absolute determinant of the linear part: the factor by
    /// which the map scales area.
    pub fn determinant(&self) -> f64 {
        (self.a * self.e - self.b * self.d).abs()
    }

    fn scaled(&self, by: f64) -> AffineParameters {
        AffineParameters {
            a: self.a * by,
            b: self.b * by,
            c: self.c * by,
            d: self.d * by,
            e: self.e * by,
            f: self.f * by,
        }
    }
}

/// Holds a normalized, non-expansive affine map.  Immutable once built.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AffineTransformer {
    params: AffineParameters,
}

impl AffineTransformer {
    /// Constructor.  If the map expands area, all six coefficients
    /// (translation included) are multiplied by `1/sqrt(det)`.
    pub fn new(params: AffineParameters) -> AffineTransformer {
        let det = params.determinant();
        if det <= 1.0 {
            return AffineTransformer { params };
        }
        let params = params.scaled(1.0 / det.sqrt());
        warn!(
            "Affine parameters expand area (det = {:.4}); scaled down to {:?}",
            det, params
        );
        AffineTransformer { params }
    }

    /// The coefficients actually in use, after normalization.
    pub fn params(&self) -> &AffineParameters {
        &self.params
    }

    /// Apply the map to a point.
    #[inline]
    pub fn transform(&self, point: Point) -> Point {
        let p = &self.params;
        Complex::new(
            p.a * point.re + p.b * point.im + p.c,
            p.d * point.re + p.e * point.im + p.f,
        )
    }
}
