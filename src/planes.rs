// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Contains the PlaneMapper struct, which describes a relationship
//! between a rectangle on the integral plane with an origin at 0,0,
//! and the square on the real plane from -2-2i to 2+2i that every
//! flame is drawn in.
use num::Complex;

use errors::FlameError;

/// A point in fractal space.  The real part is x, the imaginary part
/// is y; a single Complex number is all we need.
pub type Point = Complex<f64>;

/// Left-lower corner of the fractal plane every flame is drawn in.
pub const FLAME_LEFTLOWER: Point = Complex { re: -2.0, im: -2.0 };

/// Right-upper corner of the fractal plane every flame is drawn in.
pub const FLAME_RIGHTUPPER: Point = Complex { re: 2.0, im: 2.0 };

/// Describes the width and height of an integral plane that is assumed to start at
/// 0,0 and all values are assumed to be non-negative integers.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IntegralPlane(pub usize, pub usize);

/// Describes the lower-left corner and upper-right corner of the
/// real plane, treating the real part of each value as the
/// x-component and the imaginary part of each value as the
/// y-component.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ComplexPlane(pub Point, pub Point);

/// Describes the column, row of a pixel in the integral plane.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pixel(pub usize, pub usize);

/// The largest width or height an image may have.  Keeps the image
/// dimensions within `u32`.
pub const MAX_DIMENSION: usize = 65_535;

/// Both sides of the image must be between 1 and `MAX_DIMENSION`, and
/// an RGB8 buffer of the whole image must fit in memory.
pub fn check_dimensions(width: usize, height: usize) -> Result<(), FlameError> {
    let buffer = width.checked_mul(height).and_then(|n| n.checked_mul(3));
    if width == 0
        || height == 0
        || width > MAX_DIMENSION
        || height > MAX_DIMENSION
        || buffer.is_none()
    {
        return Err(FlameError::InvalidDimensions { width, height });
    }
    Ok(())
}

/// Maps points of the real plane onto pixels of the integral plane.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PlaneMapper {
    /// The right-upper hand corner of the integral cartesian plane.
    /// The left-lower is assumed to be at 0,0
    pub integral_plane: IntegralPlane,
    /// The two coordinates defining the real cartesian plane,
    /// left-lower and right-upper
    pub complex_plane: ComplexPlane,
    // The ratio mapping the width and height, respectively, of the two
    // different planes.
    grid_factors: (f64, f64),
}

impl PlaneMapper {
    /// The mapper every flame histogram uses: the [-2, 2] square
    /// stretched over a `width` by `height` image.
    pub fn flame(width: usize, height: usize) -> Result<PlaneMapper, FlameError> {
        check_dimensions(width, height)?;

        // Multiply the offset of a point from the left-lower corner by
        // these, and floor(), to get the coordinates on the grid.
        let grid_factors = (
            (width as f64) / (FLAME_RIGHTUPPER.re - FLAME_LEFTLOWER.re),
            (height as f64) / (FLAME_RIGHTUPPER.im - FLAME_LEFTLOWER.im),
        );

        Ok(PlaneMapper {
            integral_plane: IntegralPlane(width, height),
            complex_plane: ComplexPlane(FLAME_LEFTLOWER, FLAME_RIGHTUPPER),
            grid_factors,
        })
    }

    /// Width of the integral plane.
    pub fn width(&self) -> usize {
        self.integral_plane.0
    }

    /// Height of the integral plane.
    pub fn height(&self) -> usize {
        self.integral_plane.1
    }

    /// The total number of points in the integral grid.  Used to
    /// calculate memory needs.
    pub fn len(&self) -> usize {
        self.integral_plane.0 * self.integral_plane.1
    }

    /// Given a point on the real plane, find the pixel it falls in.
    /// Points whose floored coordinates land outside the integral
    /// plane, or that are not finite, have no pixel.
    pub fn point_to_pixel(&self, point: &Point) -> Option<Pixel> {
        let left = ((point.re - self.complex_plane.0.re) * self.grid_factors.0).floor();
        let top = ((point.im - self.complex_plane.0.im) * self.grid_factors.1).floor();
        if !left.is_finite()
            || !top.is_finite()
            || left < 0.0
            || left >= (self.integral_plane.0 as f64)
            || top < 0.0
            || top >= (self.integral_plane.1 as f64)
        {
            return None;
        }
        Some(Pixel(left as usize, top as usize))
    }

    /// The linear offset of a pixel from the root of a row-major
    /// image buffer.
    pub fn pixel_to_offset(&self, pixel: &Pixel) -> usize {
        pixel.1 * self.integral_plane.0 + pixel.0
    }
}
