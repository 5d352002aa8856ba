// Copyright 2016-2018 Matthew D. Michelotti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::time::{Duration, Instant};

use fnv::FnvHashSet;
use log::{debug, trace, warn};

use crate::broad::{Algorithm, AlgorithmKind, BroadPhase, BruteForce, Domain};
use crate::collider::{Collider, ColliderId, ColliderSet};
use crate::error::Result;
use crate::exact::exact_test;
use crate::pair::ColliderPair;
use crate::util::Smoothed;

const TIME_SMOOTHING: f64 = 0.01;

/// Settings of a `CollisionDetection` instance.
#[derive(PartialEq, Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
    /// The broad-phase algorithm.
    pub algorithm: AlgorithmKind,
    /// Cell count per axis of the grid algorithms (rounded up to a power of
    /// two for the multi-resolution grid).
    pub resolution: usize,
    /// Region covered by the grid algorithms.
    pub domain: Domain,
    /// If `false`, queries return no collisions and leave the statistics alone.
    pub enabled: bool,
    /// If `true`, each query is checked against the brute-force result.
    pub verify: bool,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            algorithm: AlgorithmKind::Grid,
            resolution: 32,
            domain: Domain::default(),
            enabled: true,
            verify: false,
        }
    }
}

/// Counters and timing of the queries since the algorithm was last built.
#[derive(PartialEq, Copy, Clone, Debug, Default)]
pub struct QueryStats {
    /// Number of colliding pairs found by the last query.
    pub collision_count: usize,
    /// Number of candidate pairs reported by the broad phase in the last
    /// query, counting duplicates.
    pub candidate_count: usize,
    /// Number of queries.
    pub query_count: u64,
    /// Duration of the last query.
    pub last_time: Duration,
    /// Exponentially smoothed query duration.
    pub smoothed_time: Duration,
}

/// Runs one broad-phase algorithm over a collider set and exact-tests its
/// candidates.
///
/// Iterative algorithms are seeded with the whole set when built, and must
/// then be told about population changes through `add_collider` and
/// `remove_collider`. Non-iterative algorithms are rebuilt on every query.
pub struct CollisionDetection {
    config: Config,
    algorithm: Algorithm,
    stats: QueryStats,
    time: Smoothed,
    mismatches: FnvHashSet<ColliderPair>,
}

impl CollisionDetection {
    /// Builds the configured algorithm over `colliders`.
    pub fn new<S: ColliderSet + ?Sized>(config: Config, colliders: &S) -> Result<CollisionDetection> {
        let algorithm = build(&config, colliders)?;
        Ok(CollisionDetection {
            config,
            algorithm,
            stats: QueryStats::default(),
            time: Smoothed::new(TIME_SMOOTHING),
            mismatches: FnvHashSet::default(),
        })
    }

    /// The current settings.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The active algorithm, e.g. for inspecting grid occupancy.
    pub fn algorithm(&self) -> &Algorithm {
        &self.algorithm
    }

    /// Statistics of the queries since the last (re)build.
    pub fn stats(&self) -> &QueryStats {
        &self.stats
    }

    /// Pairs on which the last verified query disagreed with brute force.
    pub fn mismatches(&self) -> &FnvHashSet<ColliderPair> {
        &self.mismatches
    }

    /// Switches to another algorithm, rebuilding it over `colliders`.
    pub fn set_algorithm<S: ColliderSet + ?Sized>(&mut self, algorithm: AlgorithmKind, colliders: &S) -> Result<()> {
        self.reconfigure(Config { algorithm, ..self.config }, colliders)
    }

    /// Changes the grid resolution, rebuilding the algorithm over `colliders`.
    pub fn set_resolution<S: ColliderSet + ?Sized>(&mut self, resolution: usize, colliders: &S) -> Result<()> {
        self.reconfigure(Config { resolution, ..self.config }, colliders)
    }

    /// Applies `config`, rebuilding the algorithm over `colliders` and
    /// resetting the statistics. On error the previous state is kept.
    pub fn reconfigure<S: ColliderSet + ?Sized>(&mut self, config: Config, colliders: &S) -> Result<()> {
        self.algorithm = build(&config, colliders)?;
        self.config = config;
        self.stats = QueryStats::default();
        self.time = Smoothed::new(TIME_SMOOTHING);
        self.mismatches.clear();
        Ok(())
    }

    /// Turns queries on or off without rebuilding.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.config.enabled = enabled;
    }

    /// Turns brute-force verification on or off without rebuilding.
    pub fn set_verify(&mut self, verify: bool) {
        self.config.verify = verify;
        if !verify {
            self.mismatches.clear();
        }
    }

    /// Registers a collider that joined the live set.
    pub fn add_collider<C: Collider + ?Sized>(&mut self, id: ColliderId, collider: &C) {
        if self.algorithm.is_iterative() {
            self.algorithm.add(id, collider);
        }
    }

    /// Unregisters a collider that left the live set.
    pub fn remove_collider(&mut self, id: ColliderId) {
        if self.algorithm.is_iterative() {
            self.algorithm.remove(id);
        }
    }

    /// Returns every pair of colliders that currently intersect.
    pub fn find_collisions<S: ColliderSet + ?Sized>(&mut self, colliders: &S) -> FnvHashSet<ColliderPair> {
        self.query(colliders, |algorithm, colliders| exact_pairs(algorithm, colliders))
    }

    /// Same as `find_collisions`, but scans grid cells on the rayon thread pool.
    #[cfg(feature = "parallel")]
    pub fn par_find_collisions<S>(&mut self, colliders: &S) -> FnvHashSet<ColliderPair>
    where
        S: ColliderSet + Sync + ?Sized,
    {
        use std::sync::atomic::{AtomicUsize, Ordering};

        self.query(colliders, |algorithm, colliders| {
            let candidates = AtomicUsize::new(0);
            let pairs = algorithm.par_find_all_collisions(|a, b| {
                candidates.fetch_add(1, Ordering::Relaxed);
                exact_test(colliders.get(a), colliders.get(b))
            });
            match pairs {
                Some(pairs) => (pairs.into_iter().collect(), candidates.into_inner()),
                None => exact_pairs(algorithm, colliders),
            }
        })
    }

    fn query<S, Q>(&mut self, colliders: &S, scan: Q) -> FnvHashSet<ColliderPair>
    where
        S: ColliderSet + ?Sized,
        Q: FnOnce(&mut Algorithm, &S) -> (FnvHashSet<ColliderPair>, usize),
    {
        if !self.config.enabled {
            return FnvHashSet::default();
        }

        let start = Instant::now();
        if !self.algorithm.is_iterative() {
            self.algorithm.clear();
            for id in colliders.ids() {
                self.algorithm.add(id, colliders.get(id));
            }
        }
        let (result, candidate_count) = scan(&mut self.algorithm, colliders);
        let elapsed = start.elapsed();

        self.time.add(elapsed.as_secs_f64());
        self.stats.collision_count = result.len();
        self.stats.candidate_count = candidate_count;
        self.stats.query_count += 1;
        self.stats.last_time = elapsed;
        self.stats.smoothed_time = Duration::from_secs_f64(self.time.value().unwrap_or(0.0));
        trace!(
            "{} query over {} colliders: {} candidates, {} collisions in {:?}",
            self.config.algorithm,
            colliders.len(),
            candidate_count,
            result.len(),
            elapsed
        );

        if self.config.verify {
            let expected = brute_force_collisions(colliders);
            self.mismatches = expected.symmetric_difference(&result).copied().collect();
            if !self.mismatches.is_empty() {
                warn!(
                    "{} disagrees with brute force on {} pairs",
                    self.config.algorithm,
                    self.mismatches.len()
                );
            }
        }
        result
    }
}

/// Returns every pair of colliders in `colliders` that intersect, testing all
/// pairs.
pub fn brute_force_collisions<S: ColliderSet + ?Sized>(colliders: &S) -> FnvHashSet<ColliderPair> {
    let mut brute_force = BruteForce::new();
    for id in colliders.ids() {
        brute_force.add(id, colliders.get(id));
    }
    exact_pairs(&mut brute_force, colliders).0
}

// runs the broad phase, keeping the candidates that pass the exact test
fn exact_pairs<B, S>(broad_phase: &mut B, colliders: &S) -> (FnvHashSet<ColliderPair>, usize)
where
    B: BroadPhase,
    S: ColliderSet + ?Sized,
{
    let mut result = FnvHashSet::default();
    let mut candidates = 0;
    broad_phase.find_all_collisions(colliders, |a, b| {
        candidates += 1;
        if exact_test(colliders.get(a), colliders.get(b)) {
            result.insert(ColliderPair::new(a, b));
        }
    });
    (result, candidates)
}

fn build<S: ColliderSet + ?Sized>(config: &Config, colliders: &S) -> Result<Algorithm> {
    let mut algorithm = Algorithm::new(config.algorithm, config.resolution, config.domain)?;
    if algorithm.is_iterative() {
        for id in colliders.ids() {
            algorithm.add(id, colliders.get(id));
        }
        debug!("built {}, seeded with {} colliders", config.algorithm, colliders.len());
    } else {
        debug!("built {} with resolution {}", config.algorithm, config.resolution);
    }
    Ok(algorithm)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::{v2, PlacedShape, Shape};
    use fnv::FnvHashMap;

    fn shapes() -> Vec<PlacedShape> {
        vec![
            Shape::circle(0.2).place(v2(0.0, 0.0)),
            Shape::circle(0.2).place(v2(0.15, 0.0)),
            Shape::square(0.2).place(v2(0.5, 0.5)),
            Shape::circle(0.2).place(v2(0.5, 0.35)),
            Shape::circle(0.2).place(v2(-0.8, -0.8)),
        ]
    }

    fn expected() -> FnvHashSet<ColliderPair> {
        [ColliderPair::new(0, 1), ColliderPair::new(2, 3)].iter().copied().collect()
    }

    #[test]
    fn test_all_algorithms_agree() {
        let shapes = shapes();
        for &kind in AlgorithmKind::ALL.iter() {
            let config = Config { algorithm: kind, resolution: 8, ..Config::default() };
            let mut detection = CollisionDetection::new(config, &shapes).unwrap();
            assert_eq!(detection.find_collisions(&shapes), expected(), "{}", kind);
            assert_eq!(detection.stats().collision_count, 2);
            assert!(detection.stats().candidate_count >= 2);
        }
        assert_eq!(brute_force_collisions(&shapes), expected());
    }

    #[test]
    fn test_disabled() {
        let shapes = shapes();
        let config = Config { enabled: false, ..Config::default() };
        let mut detection = CollisionDetection::new(config, &shapes).unwrap();
        assert!(detection.find_collisions(&shapes).is_empty());
        assert_eq!(detection.stats().query_count, 0);
        detection.set_enabled(true);
        assert_eq!(detection.find_collisions(&shapes), expected());
        assert_eq!(detection.stats().query_count, 1);
    }

    #[test]
    fn test_stats_reset_on_reconfigure() {
        let shapes = shapes();
        let mut detection = CollisionDetection::new(Config::default(), &shapes).unwrap();
        detection.find_collisions(&shapes);
        detection.find_collisions(&shapes);
        assert_eq!(detection.stats().query_count, 2);
        detection.set_algorithm(AlgorithmKind::SapX, &shapes).unwrap();
        assert_eq!(detection.stats(), &QueryStats::default());
        assert_eq!(detection.config().algorithm, AlgorithmKind::SapX);
        detection.set_resolution(4, &shapes).unwrap();
        assert_eq!(detection.config().resolution, 4);
    }

    #[test]
    fn test_failed_reconfigure_keeps_state() {
        let shapes = shapes();
        let mut detection = CollisionDetection::new(Config::default(), &shapes).unwrap();
        assert!(detection.set_resolution(0, &shapes).is_err());
        assert_eq!(detection.config().resolution, 32);
        assert_eq!(detection.algorithm().kind(), AlgorithmKind::Grid);
        assert_eq!(detection.find_collisions(&shapes), expected());
    }

    #[test]
    fn test_population_changes() {
        let initial: FnvHashMap<ColliderId, PlacedShape> = shapes().into_iter().enumerate().collect();
        for &kind in AlgorithmKind::ALL.iter() {
            let mut shapes = initial.clone();
            let config = Config { algorithm: kind, ..Config::default() };
            let mut detection = CollisionDetection::new(config, &shapes).unwrap();
            assert_eq!(detection.find_collisions(&shapes), expected());

            shapes.remove(&1);
            detection.remove_collider(1);
            let joined = Shape::circle(0.2).place(v2(-0.85, -0.8));
            shapes.insert(9, joined);
            detection.add_collider(9, &joined);

            let expected: FnvHashSet<_> = [ColliderPair::new(2, 3), ColliderPair::new(4, 9)].iter().copied().collect();
            assert_eq!(detection.find_collisions(&shapes), expected, "{}", kind);
        }
    }

    #[test]
    fn test_verify_reports_mismatches() {
        let mut shapes = shapes();
        let config = Config { algorithm: AlgorithmKind::SapX, verify: true, ..Config::default() };
        let mut detection = CollisionDetection::new(config, &shapes).unwrap();
        detection.find_collisions(&shapes);
        assert!(detection.mismatches().is_empty());

        // joins the scene without being registered
        shapes.push(Shape::circle(0.2).place(v2(-0.75, -0.8)));
        detection.find_collisions(&shapes);
        let mismatches: Vec<_> = detection.mismatches().iter().copied().collect();
        assert_eq!(mismatches, vec![ColliderPair::new(4, 5)]);

        detection.set_verify(false);
        assert!(detection.mismatches().is_empty());
    }
}
