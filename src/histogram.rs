// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The histogram is where the chaos game leaves its trace.  Every
//! point the game produces is mapped to the pixel it falls in, and
//! that pixel's cell counts the hit and sums the point's color.  Only
//! pixels that were hit have a cell.
//!
//! With a symmetry level N above 1 every point is recorded N times,
//! once for each rotation of the point about the origin by a multiple
//! of 2π/N, which draws a radially symmetric flame.
//!
//! Each worker owns its own histogram while it runs; afterwards the
//! histograms are summed together with `merge`.  Summing is
//! commutative and associative, so the order in which workers finish
//! has no effect on the picture.

use std::collections::hash_map::{Entry, Iter};
use std::collections::HashMap;
use std::f64::consts::PI;

use num::Complex;

use color::Color;
use errors::FlameError;
use planes::{Pixel, PlaneMapper, Point};

/// The accumulated hits of a single pixel.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Cell {
    /// How many points landed here.
    pub count: u64,
    /// The sum of the colors those points carried.
    pub color: Color,
}

impl Cell {
    fn add(&mut self, other: &Cell) {
        self.count += other.count;
        self.color += other.color;
    }
}

/// A sparse map from pixels to cells, plus the geometry and gamma the
/// image will be rendered with.
#[derive(Clone, Debug, PartialEq)]
pub struct Histogram {
    plane: PlaneMapper,
    gamma: f64,
    symmetry_level: usize,
    // Rotations for each symmetric copy, as unit complex numbers.
    // Empty when the symmetry level is 1 or less.
    rotations: Vec<Complex<f64>>,
    cells: HashMap<Pixel, Cell>,
}

impl Histogram {
    /// An empty histogram for a `width` by `height` image.
    pub fn new(
        width: usize,
        height: usize,
        gamma: f64,
        symmetry_level: usize,
    ) -> Result<Histogram, FlameError> {
        let plane = PlaneMapper::flame(width, height)?;
        let rotations = if symmetry_level > 1 {
            let step = 2.0 * PI / (symmetry_level as f64);
            (0..symmetry_level)
                .map(|k| {
                    let (s, c) = (step * (k as f64)).sin_cos();
                    Complex::new(c, s)
                })
                .collect()
        } else {
            vec![]
        };
        Ok(Histogram {
            plane,
            gamma,
            symmetry_level,
            rotations,
            cells: HashMap::new(),
        })
    }

    /// Image width.
    pub fn width(&self) -> usize {
        self.plane.width()
    }

    /// Image height.
    pub fn height(&self) -> usize {
        self.plane.height()
    }

    /// Gamma the image is rendered with.
    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    /// Number of rotated copies recorded per point.
    pub fn symmetry_level(&self) -> usize {
        self.symmetry_level
    }

    /// The mapping between the fractal plane and the image.
    pub fn plane(&self) -> &PlaneMapper {
        &self.plane
    }

    /// Record a point.  Points (or rotated copies) that fall outside
    /// the [-2, 2] square are dropped.
    pub fn add_point(&mut self, point: Point, color: Color) {
        if self.rotations.is_empty() {
            self.add_single_point(&point, color);
        } else {
            for k in 0..self.rotations.len() {
                let rotated = point * self.rotations[k];
                self.add_single_point(&rotated, color);
            }
        }
    }

    fn add_single_point(&mut self, point: &Point, color: Color) {
        if let Some(pixel) = self.plane.point_to_pixel(point) {
            self.add_hits(pixel, Cell { count: 1, color });
        }
    }

    /// Add a pre-accumulated cell to a pixel.
    pub fn add_hits(&mut self, pixel: Pixel, hits: Cell) {
        match self.cells.entry(pixel) {
            Entry::Occupied(mut cell) => cell.get_mut().add(&hits),
            Entry::Vacant(cell) => {
                cell.insert(hits);
            }
        }
    }

    /// The cell of a pixel, if the pixel was ever hit.
    pub fn get(&self, pixel: &Pixel) -> Option<&Cell> {
        self.cells.get(pixel)
    }

    /// Iterate over the pixels that were hit, in no particular order.
    pub fn cells(&self) -> Iter<Pixel, Cell> {
        self.cells.iter()
    }

    /// Number of pixels that were hit.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// True when nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Total number of hits across every cell.
    pub fn total_hits(&self) -> u64 {
        self.cells.values().map(|cell| cell.count).sum()
    }

    /// Fold another histogram into this one.  Counts and color sums of
    /// shared pixels add; pixels only the other one has are copied.
    pub fn merge(&mut self, other: Histogram) -> Result<(), FlameError> {
        if self.plane.integral_plane != other.plane.integral_plane {
            return Err(FlameError::ShapeMismatch {
                ours_w: self.width(),
                ours_h: self.height(),
                theirs_w: other.width(),
                theirs_h: other.height(),
            });
        }
        // Walk the smaller map.
        let mut other = other;
        if other.cells.len() > self.cells.len() {
            ::std::mem::swap(&mut self.cells, &mut other.cells);
        }
        for (pixel, cell) in other.cells {
            self.add_hits(pixel, cell);
        }
        Ok(())
    }

    /// `merge`, by value.
    pub fn merged(mut self, other: Histogram) -> Result<Histogram, FlameError> {
        self.merge(other)?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use color::BLACK;

    fn hist() -> Histogram {
        Histogram::new(800, 600, 2.2, 1).unwrap()
    }

    fn cell(count: u64, v: f64) -> Cell {
        Cell {
            count,
            color: Color::new(v, v, v),
        }
    }

    #[test]
    fn new_histograms_are_empty() {
        let h = Histogram::new(800, 600, 2.0, 2).unwrap();
        assert_eq!((h.width(), h.height()), (800, 600));
        assert_eq!(h.gamma(), 2.0);
        assert_eq!(h.symmetry_level(), 2);
        assert!(h.is_empty());
        assert_eq!(h.total_hits(), 0);
    }

    #[test]
    fn new_rejects_empty_images() {
        assert!(Histogram::new(0, 600, 2.2, 1).is_err());
    }

    #[test]
    fn a_point_in_bounds_is_counted_with_its_color() {
        let mut h = hist();
        h.add_point(Complex::new(0.0, 0.0), Color::new(0.5, 0.5, 0.5));
        assert_eq!(h.get(&Pixel(400, 300)), Some(&cell(1, 0.5)));
    }

    #[test]
    fn points_out_of_bounds_are_dropped() {
        let mut h = hist();
        h.add_point(Complex::new(5.0, 5.0), BLACK);
        h.add_point(Complex::new(-2.5, 0.0), BLACK);
        h.add_point(Complex::new(2.0, 0.0), BLACK);
        assert!(h.is_empty());
    }

    #[test]
    fn hits_on_the_same_pixel_accumulate() {
        let mut h = hist();
        h.add_point(Complex::new(0.0, 0.0), Color::new(0.25, 0.5, 0.75));
        h.add_point(Complex::new(0.001, 0.001), Color::new(0.25, 0.5, 0.75));
        let c = h.get(&Pixel(400, 300)).unwrap();
        assert_eq!(c.count, 2);
        assert_eq!(c.color, Color::new(0.5, 1.0, 1.5));
    }

    #[test]
    fn accumulation_order_does_not_matter() {
        let points = [
            (Complex::new(0.1, 0.2), Color::new(0.5, 0.25, 0.0)),
            (Complex::new(-1.0, 1.5), Color::new(0.0, 1.0, 0.5)),
            (Complex::new(0.1, 0.2), Color::new(0.25, 0.25, 0.25)),
        ];
        let mut forward = hist();
        for &(p, c) in points.iter() {
            forward.add_point(p, c);
        }
        let mut backward = hist();
        for &(p, c) in points.iter().rev() {
            backward.add_point(p, c);
        }
        assert_eq!(forward, backward);
        assert_eq!(forward.total_hits(), 3);
        assert_eq!(forward.len(), 2);
    }

    #[test]
    fn symmetry_one_records_one_hit() {
        let mut h = Histogram::new(400, 400, 2.2, 1).unwrap();
        h.add_point(Complex::new(0.5, 0.0), BLACK);
        assert_eq!(h.total_hits(), 1);
    }

    #[test]
    fn symmetry_records_one_hit_per_rotation() {
        let mut h = Histogram::new(400, 400, 2.2, 4).unwrap();
        h.add_point(Complex::new(0.5, 0.0), Color::new(0.5, 0.5, 0.5));
        assert_eq!(h.total_hits(), 4);
        for pixel in &[
            Pixel(250, 200),
            Pixel(200, 250),
            Pixel(150, 200),
            Pixel(200, 150),
        ] {
            assert_eq!(h.get(pixel), Some(&cell(1, 0.5)), "{:?}", pixel);
        }
    }

    #[test]
    fn symmetric_copies_out_of_bounds_are_dropped_individually() {
        // (1.9, 1.9) has radius 2.69: the diagonal copies stay on the
        // plane, the four that land on an axis fall off it.
        let mut h = Histogram::new(400, 400, 2.2, 8).unwrap();
        h.add_point(Complex::new(1.9, 1.9), BLACK);
        assert_eq!(h.total_hits(), 4);
        assert_eq!(h.len(), 4);
    }

    #[test]
    fn merge_sums_shared_pixels_and_copies_the_rest() {
        let mut a = hist();
        a.add_hits(Pixel(1, 1), cell(2, 1.0));
        let mut b = hist();
        b.add_hits(Pixel(1, 1), cell(3, 2.0));
        b.add_hits(Pixel(5, 7), cell(1, 0.5));

        a.merge(b).unwrap();
        assert_eq!(a.get(&Pixel(1, 1)), Some(&cell(5, 3.0)));
        assert_eq!(a.get(&Pixel(5, 7)), Some(&cell(1, 0.5)));
        assert_eq!(a.len(), 2);
    }

    fn sample(cells: &[(Pixel, Cell)]) -> Histogram {
        let mut h = hist();
        for &(pixel, c) in cells {
            h.add_hits(pixel, c);
        }
        h
    }

    #[test]
    fn merge_is_commutative() {
        let a = sample(&[(Pixel(0, 0), cell(1, 0.5)), (Pixel(3, 3), cell(4, 1.25))]);
        let b = sample(&[(Pixel(3, 3), cell(2, 0.75)), (Pixel(9, 1), cell(7, 3.0))]);
        let ab = a.clone().merged(b.clone()).unwrap();
        let ba = b.merged(a).unwrap();
        assert_eq!(ab, ba);
    }

    #[test]
    fn merge_is_associative() {
        let a = sample(&[(Pixel(0, 0), cell(1, 0.5)), (Pixel(3, 3), cell(4, 1.25))]);
        let b = sample(&[(Pixel(3, 3), cell(2, 0.75)), (Pixel(9, 1), cell(7, 3.0))]);
        let c = sample(&[(Pixel(9, 1), cell(1, 0.25)), (Pixel(3, 3), cell(1, 0.5))]);
        let left = a
            .clone()
            .merged(b.clone())
            .unwrap()
            .merged(c.clone())
            .unwrap();
        let right = a.merged(b.merged(c).unwrap()).unwrap();
        assert_eq!(left, right);
    }

    #[test]
    fn merge_with_an_empty_histogram_is_the_identity() {
        let a = sample(&[(Pixel(2, 2), cell(3, 1.5))]);
        assert_eq!(a.clone().merged(hist()).unwrap(), a);
        assert_eq!(hist().merged(a.clone()).unwrap(), a);
    }

    #[test]
    fn merge_refuses_different_shapes() {
        let mut a = hist();
        let b = Histogram::new(640, 480, 2.2, 1).unwrap();
        assert!(a.merge(b).is_err());
    }
}
