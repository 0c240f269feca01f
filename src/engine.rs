// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The chaos-game engine.
//!
//! A chaos game starts from a random point in [-1, 1]² and a black
//! color, and then, for a fixed number of iterations, pushes the
//! point through the transformation system and records where it lands
//! in a histogram.  There is no early exit: the game always runs for
//! the whole count.
//!
//! With more than one thread, the iteration count is divided evenly
//! among that many workers (whatever doesn't divide evenly is dropped),
//! and each worker plays its own game into its own histogram with its
//! own seed, `seed + worker_id`.  Workers share nothing mutable, so no
//! locks are needed; the only synchronization is waiting for all of
//! them to finish, after which their histograms are merged in worker
//! order.

use std::thread::Result as StdThreadResult;
use std::time::Instant;

use crossbeam::thread;
use num::Complex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use color::BLACK;
use config::Config;
use errors::FlameError;
use histogram::Histogram;
use transform::TransformationSystem;

/// The seed of a worker's random source: the base seed offset by the
/// worker's index, reinterpreted as integer bits.
pub fn worker_seed(seed: f64, worker_id: usize) -> u64 {
    (seed + worker_id as f64).to_bits()
}

/// How many iterations each of `threads` workers runs.  Integer
/// division; the remainder is not played.
pub fn iterations_per_worker(iteration_count: usize, threads: usize) -> usize {
    iteration_count / threads
}

/// Unpack the joined workers, in worker order.  The first worker that
/// panicked or failed fails the whole run.
fn collect_workers(
    joined: Vec<StdThreadResult<Result<Histogram, FlameError>>>,
) -> Result<Vec<Histogram>, FlameError> {
    joined
        .into_iter()
        .enumerate()
        .map(|(worker, result)| match result {
            Ok(result) => result,
            Err(_) => Err(FlameError::WorkerPanicked { worker }),
        })
        .collect()
}

/// Renders flames for one configuration.  Built once, then read-only,
/// so a single renderer can be shared by every worker thread.
pub struct FlameRenderer<'a> {
    config: &'a Config,
    system: TransformationSystem,
}

impl<'a> FlameRenderer<'a> {
    /// Validates the configuration and prepares the transformation
    /// system.  Nothing is rendered until `generate` is called.
    pub fn new(config: &'a Config) -> Result<FlameRenderer<'a>, FlameError> {
        config.validate()?;
        let system = TransformationSystem::new(&config.functions, config.affine)?;
        Ok(FlameRenderer { config, system })
    }

    /// The configuration this renderer draws.
    pub fn config(&self) -> &Config {
        self.config
    }

    /// The transformation system every chaos game uses.
    pub fn system(&self) -> &TransformationSystem {
        &self.system
    }

    fn empty_histogram(&self) -> Result<Histogram, FlameError> {
        Histogram::new(
            self.config.width,
            self.config.height,
            self.config.gamma,
            self.config.symmetry_level,
        )
    }

    /// Play one chaos game of `iterations` steps from `seed`.
    pub fn chaos_game(&self, seed: u64, iterations: usize) -> Result<Histogram, FlameError> {
        let mut histogram = self.empty_histogram()?;
        let mut rng = StdRng::seed_from_u64(seed);
        let x: f64 = rng.gen_range(-1.0, 1.0);
        let y: f64 = rng.gen_range(-1.0, 1.0);
        let mut point = Complex::new(x, y);
        let mut color = BLACK;

        for _ in 0..iterations {
            let (next, next_color) = self.system.transform_point(&mut rng, point, color);
            point = next;
            color = next_color;
            histogram.add_point(point, color);
        }

        Ok(histogram)
    }

    /// The main function for single-threaded implementations.  Runs
    /// the whole iteration count inline, seeded as worker 0.
    pub fn flame_single(&self) -> Result<Histogram, FlameError> {
        let start = Instant::now();
        let histogram =
            self.chaos_game(worker_seed(self.config.seed, 0), self.config.iteration_count)?;
        info!("Histogram built in {:.2?}", start.elapsed());
        Ok(histogram)
    }

    /// Run one worker of a threaded generation.
    pub fn worker(&self, worker_id: usize, iterations: usize) -> Result<Histogram, FlameError> {
        let start = Instant::now();
        let histogram = self.chaos_game(worker_seed(self.config.seed, worker_id), iterations)?;
        info!(
            "Worker {} finished {} iterations in {:.2?}",
            worker_id,
            iterations,
            start.elapsed()
        );
        Ok(histogram)
    }

    /// Given a collection of histograms in worker order, merge them
    /// all into a single histogram.
    fn merge_histograms(&self, histograms: Vec<Histogram>) -> Result<Histogram, FlameError> {
        let start = Instant::now();
        let mut histograms = histograms.into_iter();
        let merged = match histograms.next() {
            Some(first) => histograms.try_fold(first, Histogram::merged)?,
            None => self.empty_histogram()?,
        };
        info!("Histograms merged in {:.2?}", start.elapsed());
        Ok(merged)
    }

    /// A multi-threaded version of the render function that takes a
    /// thread count.
    pub fn flame_threaded(&self, threads: usize) -> Result<Histogram, FlameError> {
        let per_worker = iterations_per_worker(self.config.iteration_count, threads);
        if per_worker == 0 {
            warn!(
                "{} iterations cannot be shared by {} workers; every worker runs 0",
                self.config.iteration_count, threads
            );
        }
        info!("Starting {} workers of {} iterations", threads, per_worker);

        let joined = thread::scope(|spawner| {
            let handles: Vec<_> = (0..threads)
                .map(|worker_id| spawner.spawn(move |_| self.worker(worker_id, per_worker)))
                .collect();
            handles
                .into_iter()
                .map(|handle| handle.join())
                .collect::<Vec<_>>()
        })
        // Every handle is joined inside the scope, which takes each
        // worker's panic with it, so the scope has nothing left to report.
        .map_err(|_| FlameError::WorkerPoolFailed)?;

        let histograms = collect_workers(joined)?;
        self.merge_histograms(histograms)
    }

    /// Entry point.  Runs inline for a single thread and across the
    /// worker pool otherwise.  A run-level failure produces no
    /// histogram at all, never a partial one.
    pub fn generate(&self) -> Result<Histogram, FlameError> {
        let result = if self.config.threads == 1 {
            self.flame_single()
        } else {
            self.flame_threaded(self.config.threads)
        };
        if let Err(ref e) = result {
            error!("Histogram was not produced: {}", e);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use affine::AffineParameters;
    use config::VariationSpec;
    use std::any::Any;

    fn linear_config(iterations: usize, threads: usize) -> Config {
        Config {
            width: 800,
            height: 600,
            seed: 1.0,
            iteration_count: iterations,
            threads,
            gamma: 2.2,
            symmetry_level: 1,
            affine: AffineParameters::identity(),
            functions: vec![VariationSpec::named("linear", 1.0)],
        }
    }

    #[test]
    fn worker_seeds_are_distinct_and_stable() {
        assert_eq!(worker_seed(1.0, 0), 1.0_f64.to_bits());
        assert_eq!(worker_seed(1.0, 3), 4.0_f64.to_bits());
        assert_ne!(worker_seed(5.1234, 0), worker_seed(5.1234, 1));
    }

    #[test]
    fn uneven_division_drops_the_remainder() {
        assert_eq!(iterations_per_worker(100, 3), 33);
        assert_eq!(iterations_per_worker(100, 4), 25);
        assert_eq!(iterations_per_worker(2, 4), 0);
    }

    #[test]
    fn new_rejects_invalid_configurations() {
        let mut config = linear_config(100, 1);
        config.functions = vec![VariationSpec::named("swirl", 0.0)];
        assert!(FlameRenderer::new(&config).is_err());

        let mut config = linear_config(100, 1);
        config.height = 0;
        assert!(FlameRenderer::new(&config).is_err());
    }

    #[test]
    fn identity_linear_flame_keeps_every_point() {
        // The identity map never moves the start point, which is inside
        // [-1, 1]², so all 100 iterations land on one pixel.
        let config = linear_config(100, 1);
        let renderer = FlameRenderer::new(&config).unwrap();
        let histogram = renderer.generate().unwrap();
        assert_eq!(histogram.total_hits(), 100);
        assert_eq!(histogram.len(), 1);
    }

    #[test]
    fn the_same_seed_draws_the_same_histogram() {
        let mut config = Config::default();
        config.width = 200;
        config.height = 150;
        config.iteration_count = 2000;
        let renderer = FlameRenderer::new(&config).unwrap();
        assert_eq!(renderer.generate().unwrap(), renderer.generate().unwrap());
    }

    #[test]
    fn single_thread_runs_as_worker_zero() {
        let config = Config {
            iteration_count: 500,
            width: 100,
            height: 100,
            ..Config::default()
        };
        let renderer = FlameRenderer::new(&config).unwrap();
        assert_eq!(
            renderer.flame_single().unwrap(),
            renderer.worker(0, 500).unwrap()
        );
    }

    #[test]
    fn threaded_total_is_the_sum_of_the_workers() {
        let config = linear_config(102, 4);
        let renderer = FlameRenderer::new(&config).unwrap();
        let merged = renderer.generate().unwrap();

        let per_worker = iterations_per_worker(102, 4);
        let sum: u64 = (0..4)
            .map(|id| renderer.worker(id, per_worker).unwrap().total_hits())
            .sum();
        assert_eq!(merged.total_hits(), sum);
        assert_eq!(merged.total_hits(), 100);
    }

    #[test]
    fn threaded_merge_matches_merging_by_hand() {
        let mut config = Config::default();
        config.width = 120;
        config.height = 90;
        config.iteration_count = 3000;
        config.threads = 3;
        let renderer = FlameRenderer::new(&config).unwrap();
        let merged = renderer.generate().unwrap();

        let mut by_hand = renderer.worker(0, 1000).unwrap();
        by_hand.merge(renderer.worker(1, 1000).unwrap()).unwrap();
        by_hand.merge(renderer.worker(2, 1000).unwrap()).unwrap();
        assert_eq!(merged.total_hits(), by_hand.total_hits());
        assert_eq!(merged.len(), by_hand.len());
    }

    #[test]
    fn a_panicked_worker_fails_the_run_with_its_index() {
        let config = linear_config(30, 3);
        let renderer = FlameRenderer::new(&config).unwrap();
        let joined = vec![
            Ok(renderer.worker(0, 10)),
            Err(Box::new("worker 1 fell over") as Box<dyn Any + Send>),
            Ok(renderer.worker(2, 10)),
        ];
        assert_eq!(
            collect_workers(joined),
            Err(FlameError::WorkerPanicked { worker: 1 })
        );
    }

    #[test]
    fn a_failed_worker_fails_the_run() {
        let joined = vec![Ok(Err(FlameError::InvalidIterations))];
        assert_eq!(collect_workers(joined), Err(FlameError::InvalidIterations));
    }

    #[test]
    fn joined_workers_are_kept_in_order() {
        let config = linear_config(30, 3);
        let renderer = FlameRenderer::new(&config).unwrap();
        let joined = (0..3).map(|id| Ok(renderer.worker(id, 10))).collect();
        let histograms = collect_workers(joined).unwrap();
        for (id, histogram) in histograms.iter().enumerate() {
            assert_eq!(*histogram, renderer.worker(id, 10).unwrap());
        }
    }

    #[test]
    fn merging_keeps_every_hit() {
        let config = linear_config(40, 4);
        let renderer = FlameRenderer::new(&config).unwrap();
        let histograms = (0..4).map(|id| renderer.worker(id, 10).unwrap()).collect();
        assert_eq!(renderer.merge_histograms(histograms).unwrap().total_hits(), 40);
        assert!(renderer.merge_histograms(vec![]).unwrap().is_empty());
    }

    #[test]
    fn more_workers_than_iterations_yields_an_empty_histogram() {
        let config = linear_config(3, 4);
        let renderer = FlameRenderer::new(&config).unwrap();
        let merged = renderer.generate().unwrap();
        assert!(merged.is_empty());
    }
}
