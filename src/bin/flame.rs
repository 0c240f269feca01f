// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

extern crate clap;
extern crate env_logger;
extern crate failure;
extern crate flame;
extern crate image;
#[macro_use]
extern crate log;
extern crate num_cpus;

use clap::{App, Arg, ArgMatches};
use failure::Error;
use flame::config::{parse_affine_params, parse_functions};
use flame::planes::MAX_DIMENSION;
use flame::{render, Config, ConfigFile, FlameRenderer};
use image::RgbImage;
use std::convert::TryFrom;
use std::path::Path;
use std::str::FromStr;
use std::time::Instant;

fn validate_range<T: FromStr + PartialOrd>(
    s: &str,
    low: T,
    high: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> Result<(), String> {
    match T::from_str(s) {
        Ok(i) => {
            if i >= low && i <= high {
                Ok(())
            } else {
                Err(isnotinrange_err.to_string())
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

fn validate_parse<T: FromStr>(s: &str, err: &str) -> Result<(), String> {
    match T::from_str(s) {
        Ok(_) => Ok(()),
        Err(_) => Err(err.to_string()),
    }
}

const WIDTH: &str = "width";
const HEIGHT: &str = "height";
const SEED: &str = "seed";
const ITERATIONS: &str = "iteration-count";
const OUTPUT: &str = "output-path";
const THREADS: &str = "threads";
const AFFINE: &str = "affine-params";
const FUNCTIONS: &str = "functions";
const GAMMA: &str = "gamma";
const SYMMETRY: &str = "symmetry-level";
const CONFIG: &str = "config";

const DEFAULT_OUTPUT: &str = "result.png";

fn args<'a>() -> ArgMatches<'a> {
    let max_threads = num_cpus::get();

    App::new("flame")
        .version("0.1.0")
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Fractal flame renderer")
        .arg(
            Arg::with_name(WIDTH)
                .long(WIDTH)
                .short("W")
                .takes_value(true)
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        MAX_DIMENSION,
                        "Could not parse image width",
                        &format!("Image width must be between 1 and {}", MAX_DIMENSION),
                    )
                })
                .help("Width of the output image"),
        )
        .arg(
            Arg::with_name(HEIGHT)
                .long(HEIGHT)
                .short("H")
                .takes_value(true)
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        MAX_DIMENSION,
                        "Could not parse image height",
                        &format!("Image height must be between 1 and {}", MAX_DIMENSION),
                    )
                })
                .help("Height of the output image"),
        )
        .arg(
            Arg::with_name(SEED)
                .long(SEED)
                .short("s")
                .takes_value(true)
                .validator(|s| validate_parse::<f64>(&s, "Could not parse seed"))
                .help("Seed of the random number generators"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        usize::max_value(),
                        "Could not parse iteration count",
                        "Iteration count must be at least 1",
                    )
                })
                .help("Number of chaos game iterations, shared by all threads"),
        )
        .arg(
            Arg::with_name(OUTPUT)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .help("Output file [default: result.png]"),
        )
        .arg(
            Arg::with_name(THREADS)
                .long(THREADS)
                .short("t")
                .takes_value(true)
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        max_threads,
                        "Could not parse thread count",
                        &format!("Thread count must be between 1 and {}", max_threads),
                    )
                })
                .help("Number of threads to use in the chaos game"),
        )
        .arg(
            Arg::with_name(AFFINE)
                .long(AFFINE)
                .short("a")
                .takes_value(true)
                .allow_hyphen_values(true)
                .validator(|s| parse_affine_params(&s).map(|_| ()).map_err(|e| e.to_string()))
                .help("Affine coefficients as a,b,c,d,e,f"),
        )
        .arg(
            Arg::with_name(FUNCTIONS)
                .long(FUNCTIONS)
                .short("f")
                .takes_value(true)
                .validator(|s| parse_functions(&s).map(|_| ()).map_err(|e| e.to_string()))
                .help("Weighted variations, as in swirl:1.0,horseshoe:0.8"),
        )
        .arg(
            Arg::with_name(GAMMA)
                .long(GAMMA)
                .short("g")
                .takes_value(true)
                .validator(|s| validate_parse::<f64>(&s, "Could not parse gamma"))
                .help("Gamma of the brightness correction"),
        )
        .arg(
            Arg::with_name(SYMMETRY)
                .long(SYMMETRY)
                .short("S")
                .takes_value(true)
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        360,
                        "Could not parse symmetry level",
                        "Symmetry level must be between 1 and 360",
                    )
                })
                .help("Number of rotated copies of the flame"),
        )
        .arg(
            Arg::with_name(CONFIG)
                .long(CONFIG)
                .short("c")
                .takes_value(true)
                .help("JSON configuration file; command-line flags override it"),
        )
        .get_matches()
}

// Validators have already run, so a value that is present parses.
fn value<T: FromStr>(matches: &ArgMatches, name: &str) -> Option<T> {
    matches.value_of(name).and_then(|s| T::from_str(s).ok())
}

/// Defaults, then the configuration file, then the command line.
fn build_config(matches: &ArgMatches) -> Result<(Config, String), Error> {
    let mut config = Config::default();
    let mut output = DEFAULT_OUTPUT.to_string();

    if let Some(path) = matches.value_of(CONFIG) {
        match ConfigFile::load(path) {
            Ok(file) => {
                file.apply(&mut config);
                if let Some(ref path) = file.output_path {
                    output = path.clone();
                }
            }
            Err(e) => warn!("Ignoring configuration file {}: {}", path, e),
        }
    }

    if let Some(width) = value(matches, WIDTH) {
        config.width = width;
    }
    if let Some(height) = value(matches, HEIGHT) {
        config.height = height;
    }
    if let Some(seed) = value(matches, SEED) {
        config.seed = seed;
    }
    if let Some(iteration_count) = value(matches, ITERATIONS) {
        config.iteration_count = iteration_count;
    }
    if let Some(threads) = value(matches, THREADS) {
        config.threads = threads;
    }
    if let Some(gamma) = value(matches, GAMMA) {
        config.gamma = gamma;
    }
    if let Some(symmetry_level) = value(matches, SYMMETRY) {
        config.symmetry_level = symmetry_level;
    }
    if let Some(affine) = matches.value_of(AFFINE) {
        config.affine = parse_affine_params(affine)?;
    }
    if let Some(functions) = matches.value_of(FUNCTIONS) {
        config.functions = parse_functions(functions)?;
    }
    if let Some(path) = matches.value_of(OUTPUT) {
        output = path.to_string();
    }
    Ok((config, output))
}

fn write_image(outfile: &str, pixels: Vec<u8>, bounds: (usize, usize)) -> Result<(), Error> {
    let (width, height) = (u32::try_from(bounds.0)?, u32::try_from(bounds.1)?);
    let image = RgbImage::from_raw(width, height, pixels)
        .ok_or_else(|| failure::err_msg("Pixel buffer does not match the image size"))?;
    image.save(Path::new(outfile))?;
    Ok(())
}

fn run(matches: &ArgMatches) -> Result<(), Error> {
    let start = Instant::now();
    let (config, output) = build_config(matches)?;
    let renderer = FlameRenderer::new(&config)?;
    let histogram = renderer.generate()?;
    let pixels = render(&histogram);
    write_image(&output, pixels, (config.width, config.height))?;
    info!("Image saved to {}", output);
    info!("Generation finished in {:.2?}", start.elapsed());
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let matches = args();
    if let Err(e) = run(&matches) {
        error!("Render failure: {}", e);
        std::process::exit(1);
    }
}
