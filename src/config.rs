// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The configuration record the engine consumes.  A Config is built
//! once, by defaults, a JSON file, and command-line strings, in that
//! order, and is read-only from then on.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::str::FromStr;

use failure::Error;
use serde::Deserialize;
use serde_json;

use affine::AffineParameters;
use errors::FlameError;
use planes::check_dimensions;
use transform::check_weights;
use variations::Variation;

/// One entry of the weighted variation list.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct VariationSpec {
    /// Which variation.
    pub variation: Variation,
    /// Its relative weight.  Non-negative.
    pub weight: f64,
}

impl VariationSpec {
    /// Build a spec from a configuration name.  Unknown names become
    /// `linear`, see `Variation::from_name`.
    pub fn named(name: &str, weight: f64) -> VariationSpec {
        VariationSpec {
            variation: Variation::from_name(name),
            weight,
        }
    }
}

/// Everything a flame generation needs to know.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Image width in pixels.
    pub width: usize,
    /// Image height in pixels.
    pub height: usize,
    /// Base seed of the random sources.
    pub seed: f64,
    /// Total chaos-game iterations, split across the workers.
    pub iteration_count: usize,
    /// Number of workers.
    pub threads: usize,
    /// Gamma used by the brightness correction.
    pub gamma: f64,
    /// Number of rotated copies of every point.
    pub symmetry_level: usize,
    /// The affine pre-map, before normalization.
    pub affine: AffineParameters,
    /// The weighted variation list.
    pub functions: Vec<VariationSpec>,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            width: 1920,
            height: 1080,
            seed: 5.1234,
            iteration_count: 250_000,
            threads: 1,
            gamma: 2.2,
            symmetry_level: 1,
            affine: AffineParameters {
                a: 0.6,
                b: 0.6,
                c: 0.6,
                d: 0.6,
                e: 0.6,
                f: 0.6,
            },
            functions: vec![
                VariationSpec::named("swirl", 1.0),
                VariationSpec::named("horseshoe", 0.8),
            ],
        }
    }
}

impl Config {
    /// Reject configurations no generation can run with.
    pub fn validate(&self) -> Result<(), FlameError> {
        check_dimensions(self.width, self.height)?;
        if self.iteration_count == 0 {
            return Err(FlameError::InvalidIterations);
        }
        if self.threads == 0 {
            return Err(FlameError::InvalidThreads);
        }
        if !(self.gamma.is_finite() && self.gamma > 0.0) {
            return Err(FlameError::InvalidGamma(self.gamma));
        }
        if self.symmetry_level == 0 {
            return Err(FlameError::InvalidSymmetry);
        }
        check_weights(&self.functions)?;
        Ok(())
    }
}

/// A variation as written in a JSON file.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct FunctionEntry {
    /// Variation name.
    pub name: String,
    /// Its weight.
    pub weight: f64,
}

/// The nested `size` object some configuration files use.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct SizeEntry {
    /// Image width.
    pub width: Option<usize>,
    /// Image height.
    pub height: Option<usize>,
}

/// A JSON configuration file.  Every field is optional; the ones
/// present override whatever the Config already holds.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct ConfigFile {
    /// Width and height as a nested object.  Wins over the top-level
    /// fields when present.
    pub size: Option<SizeEntry>,
    /// Image width.
    pub width: Option<usize>,
    /// Image height.
    pub height: Option<usize>,
    /// Base seed.
    pub seed: Option<f64>,
    /// Total iterations.
    pub iteration_count: Option<usize>,
    /// Where the binary should write the image.
    pub output_path: Option<String>,
    /// Worker count.
    pub threads: Option<usize>,
    /// Weighted variation list.
    pub functions: Option<Vec<FunctionEntry>>,
    /// Affine pre-map.
    pub affine_params: Option<AffineParameters>,
    /// Gamma.
    pub gamma: Option<f64>,
    /// Rotational symmetry.
    pub symmetry_level: Option<usize>,
}

impl ConfigFile {
    /// Parse a configuration from JSON text.
    pub fn from_json(text: &str) -> Result<ConfigFile, Error> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read and parse a JSON configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<ConfigFile, Error> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    /// Overlay the fields present in this file onto `config`.
    pub fn apply(&self, config: &mut Config) {
        let (width, height) = match self.size {
            Some(ref size) => (size.width, size.height),
            None => (self.width, self.height),
        };
        if let Some(width) = width {
            config.width = width;
        }
        if let Some(height) = height {
            config.height = height;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(iteration_count) = self.iteration_count {
            config.iteration_count = iteration_count;
        }
        if let Some(threads) = self.threads {
            config.threads = threads;
        }
        if let Some(ref functions) = self.functions {
            config.functions = functions
                .iter()
                .map(|f| VariationSpec::named(&f.name, f.weight))
                .collect();
        }
        if let Some(affine) = self.affine_params {
            config.affine = affine;
        }
        if let Some(gamma) = self.gamma {
            config.gamma = gamma;
        }
        if let Some(symmetry_level) = self.symmetry_level {
            config.symmetry_level = symmetry_level;
        }
    }
}

/// Parse a variation list of the form `swirl:1.0,horseshoe:0.8`.
/// Entries without a colon are skipped.
pub fn parse_functions(s: &str) -> Result<Vec<VariationSpec>, FlameError> {
    s.split(',')
        .filter_map(|entry| {
            entry
                .find(':')
                .map(|index| (entry[..index].trim(), entry[index + 1..].trim()))
        })
        .map(|(name, weight)| match f64::from_str(weight) {
            Ok(weight) => Ok(VariationSpec::named(name, weight)),
            Err(_) => Err(FlameError::Parse {
                what: "variation weight",
                input: weight.to_string(),
            }),
        })
        .collect()
}

/// Parse six comma-separated affine coefficients, `a,b,c,d,e,f`.
pub fn parse_affine_params(s: &str) -> Result<AffineParameters, FlameError> {
    let err = || FlameError::Parse {
        what: "affine parameters",
        input: s.to_string(),
    };
    let values = s
        .split(',')
        .map(|v| f64::from_str(v.trim()))
        .collect::<Result<Vec<f64>, _>>()
        .map_err(|_| err())?;
    match values.as_slice() {
        [a, b, c, d, e, f] => Ok(AffineParameters {
            a: *a,
            b: *b,
            c: *c,
            d: *d,
            e: *e,
            f: *f,
        }),
        _ => Err(err()),
    }
}
