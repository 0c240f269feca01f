// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The transformation system: one step of the chaos game.  The point
//! goes through the affine pre-map, then through a variation picked
//! at random in proportion to its weight.

use std::cmp::Ordering;

use rand::Rng;

use affine::{AffineParameters, AffineTransformer};
use color::Color;
use config::VariationSpec;
use errors::FlameError;
use planes::Point;
use variations::Variation;

/// Every weight must be finite and non-negative, and together they
/// must add up to a positive, finite total.  Returns that total,
/// summed in list order.
pub fn check_weights(functions: &[VariationSpec]) -> Result<f64, FlameError> {
    if let Some(bad) = functions
        .iter()
        .find(|spec| !spec.weight.is_finite() || spec.weight < 0.0)
    {
        return Err(FlameError::InvalidWeights(format!(
            "{} has weight {}",
            bad.variation, bad.weight
        )));
    }
    let total = functions.iter().fold(0.0, |acc, spec| acc + spec.weight);
    if total <= 0.0 || !total.is_finite() {
        return Err(FlameError::InvalidWeights(format!(
            "total weight must be positive and finite, got {}",
            total
        )));
    }
    Ok(total)
}

/// Owns the affine map and the weighted variation list.  Immutable
/// once built, so one instance can be shared by every worker.
#[derive(Clone, Debug)]
pub struct TransformationSystem {
    affine: AffineTransformer,
    // Sorted by ascending weight.  The last entry is the heaviest, and
    // catches any draw that rounding pushes past the cumulative sum.
    functions: Vec<VariationSpec>,
    total_weight: f64,
}

impl TransformationSystem {
    /// Build the system.  The weights must be finite, non-negative,
    /// and add up to something positive.
    pub fn new(
        functions: &[VariationSpec],
        affine: AffineParameters,
    ) -> Result<TransformationSystem, FlameError> {
        let mut functions = functions.to_vec();
        functions.sort_by(|l, r| l.weight.partial_cmp(&r.weight).unwrap_or(Ordering::Equal));

        // Summed in sorted order, so a draw equal to the total lands
        // exactly on the last cumulative weight.
        let total_weight = check_weights(&functions)?;

        Ok(TransformationSystem {
            affine: AffineTransformer::new(affine),
            functions,
            total_weight,
        })
    }

    /// The sum of every weight.
    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    /// The variation list in the order it is walked.
    pub fn functions(&self) -> &[VariationSpec] {
        &self.functions
    }

    /// The normalized affine pre-map.
    pub fn affine(&self) -> &AffineTransformer {
        &self.affine
    }

    /// Walk the variations from lightest to heaviest, accumulating
    /// weight, and return the first whose running total reaches
    /// `draw`.  Draws at or past the total select the heaviest.
    pub fn choose_variation(&self, draw: f64) -> Variation {
        let mut cumulative = 0.0;
        for spec in &self.functions {
            cumulative += spec.weight;
            if cumulative >= draw {
                return spec.variation;
            }
        }
        // Only reachable through a NaN draw or rounding past the sum;
        // new() guarantees the list is not empty.
        self.functions
            .last()
            .map(|spec| spec.variation)
            .unwrap_or(Variation::Linear)
    }

    /// One step of the chaos game.  If the step produces anything that
    /// is not a finite number, the step is discarded and the incoming
    /// point and color are returned unchanged.
    pub fn transform_point<R: Rng>(
        &self,
        rng: &mut R,
        point: Point,
        color: Color,
    ) -> (Point, Color) {
        let moved = self.affine.transform(point);
        let draw = rng.gen::<f64>() * self.total_weight;
        let (next, next_color) = self.choose_variation(draw).apply(moved, color);
        if next.re.is_finite() && next.im.is_finite() && next_color.is_finite() {
            (next, next_color)
        } else {
            (point, color)
        }
    }
}
