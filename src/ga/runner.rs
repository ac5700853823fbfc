//! Evolutionary loop execution.
//!
//! [`GaRunner`] orchestrates the generational process:
//! initialization → (elitism → selection → crossover → mutation → repair →
//! evaluation) × generations.

use super::config::{ConfigError, GaConfig};
use super::selection::tournament_select;
use super::types::{Fitness, GaProblem, Individual};
use crate::random::rng_from_option;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Result of an evolutionary run.
#[derive(Debug, Clone)]
pub struct GaResult<I: Individual> {
    /// The best individual of the final population.
    pub best: I,

    /// Best fitness value (same as `best.fitness()`).
    pub best_fitness: I::Fitness,

    /// Total number of generations executed.
    pub generations: usize,

    /// Whether the run was cancelled externally.
    pub cancelled: bool,

    /// Best fitness of the initial population followed by the best fitness
    /// after each generation.
    pub fitness_history: Vec<f64>,

    /// Seed the random source was created from.
    pub seed: u64,
}

/// Executes the evolutionary loop.
///
/// # Usage
///
/// ```ignore
/// let problem = PatrolProblem::new(grid, 3, 50)?;
/// let config = GaConfig::patrol(500).with_seed(42);
/// let result = GaRunner::run(&problem, &config)?;
/// println!("Best fitness: {}", result.best_fitness);
/// ```
pub struct GaRunner;

impl GaRunner {
    /// Runs the search for exactly `config.max_generations` generations.
    pub fn run<P: GaProblem>(
        problem: &P,
        config: &GaConfig,
    ) -> Result<GaResult<P::Individual>, ConfigError> {
        Self::run_with_cancel(problem, config, None)
    }

    /// Runs the search with an optional cancellation token.
    ///
    /// If `cancel` is `Some` and the flag is set to `true`, the loop stops
    /// before starting the next generation and returns the best individual of
    /// the current population.
    pub fn run_with_cancel<P: GaProblem>(
        problem: &P,
        config: &GaConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<GaResult<P::Individual>, ConfigError> {
        config.validate()?;

        let (mut rng, seed) = rng_from_option(config.seed);
        log::debug!(
            "starting evolutionary run: population={}, generations={}, seed={}",
            config.population_size,
            config.max_generations,
            seed
        );

        // 1. Initialize population
        let mut population: Vec<P::Individual> = (0..config.population_size)
            .map(|_| {
                let mut ind = problem.create_individual(&mut rng);
                problem.repair(&mut ind);
                ind
            })
            .collect();

        // 2. Evaluate initial population
        evaluate_population(problem, &mut population, config.parallel);

        let mut fitness_history = Vec::with_capacity(config.max_generations + 1);
        fitness_history.push(find_best(&population).fitness().to_f64());

        let mut generations = 0usize;
        let mut cancelled = false;

        // 3. Evolutionary loop
        for gen in 0..config.max_generations {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    cancelled = true;
                    break;
                }
            }

            // Sort population by fitness (ascending = best first); the sort is
            // stable so the earliest of equally fit members becomes the elite.
            population.sort_by(|a, b| {
                a.fitness()
                    .partial_cmp(&b.fitness())
                    .unwrap_or(std::cmp::Ordering::Equal)
            });

            let mut next_gen: Vec<P::Individual> = Vec::with_capacity(config.population_size);
            next_gen.extend_from_slice(&population[..config.elite_count]);

            while next_gen.len() < config.population_size {
                let p1 = tournament_select(&population, config.tournament_size, &mut rng);
                let p2 = tournament_select(&population, config.tournament_size, &mut rng);

                let mut child = problem.crossover(&population[p1], &population[p2], &mut rng);
                problem.mutate(&mut child, config.mutation_rate, &mut rng);
                problem.repair(&mut child);
                next_gen.push(child);
            }

            // Elites keep their evaluation; only offspring are evaluated.
            evaluate_population(
                problem,
                &mut next_gen[config.elite_count..],
                config.parallel,
            );

            population = next_gen;
            generations = gen + 1;

            let gen_best = find_best(&population);
            fitness_history.push(gen_best.fitness().to_f64());
            log::debug!(
                "generation {}: best fitness {:?}",
                generations,
                gen_best.fitness()
            );

            problem.on_generation(generations, gen_best);
        }

        let best = find_best(&population).clone();
        Ok(GaResult {
            best_fitness: best.fitness(),
            best,
            generations,
            cancelled,
            fitness_history,
            seed,
        })
    }
}

/// Evaluate every individual in `population`.
fn evaluate_population<P: GaProblem>(
    problem: &P,
    population: &mut [P::Individual],
    parallel: bool,
) {
    if parallel {
        evaluate_parallel(problem, population);
    } else {
        for ind in population.iter_mut() {
            problem.evaluate(ind);
        }
    }
}

#[cfg(feature = "parallel")]
fn evaluate_parallel<P: GaProblem>(problem: &P, population: &mut [P::Individual]) {
    population
        .par_iter_mut()
        .for_each(|ind| problem.evaluate(ind));
}

#[cfg(not(feature = "parallel"))]
fn evaluate_parallel<P: GaProblem>(problem: &P, population: &mut [P::Individual]) {
    for ind in population.iter_mut() {
        problem.evaluate(ind);
    }
}

/// Find the individual with the best (lowest) fitness.
///
/// # Panics
/// Panics if `population` is empty; a validated config never produces one.
pub(crate) fn find_best<I: Individual>(population: &[I]) -> &I {
    population
        .iter()
        .min_by(|a, b| {
            a.fitness()
                .partial_cmp(&b.fitness())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .expect("population must not be empty")
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    // ---- OneMax problem: maximize sum of bits (minimize negative sum) ----

    #[derive(Clone, Debug)]
    struct BitString {
        bits: Vec<bool>,
        fitness: f64,
    }

    impl Individual for BitString {
        type Fitness = f64;
        fn fitness(&self) -> f64 {
            self.fitness
        }
    }

    struct OneMaxProblem {
        n: usize,
    }

    impl GaProblem for OneMaxProblem {
        type Individual = BitString;

        fn create_individual<R: Rng>(&self, rng: &mut R) -> BitString {
            let bits: Vec<bool> = (0..self.n).map(|_| rng.random_bool(0.5)).collect();
            BitString {
                bits,
                fitness: f64::INFINITY,
            }
        }

        fn evaluate(&self, ind: &mut BitString) {
            ind.fitness = -(ind.bits.iter().filter(|&&b| b).count() as f64);
        }

        fn crossover<R: Rng>(&self, p1: &BitString, p2: &BitString, rng: &mut R) -> BitString {
            let point = rng.random_range(1..self.n);
            let mut bits = p1.bits[..point].to_vec();
            bits.extend_from_slice(&p2.bits[point..]);
            BitString {
                bits,
                fitness: f64::INFINITY,
            }
        }

        fn mutate<R: Rng>(&self, ind: &mut BitString, rate: f64, rng: &mut R) {
            for bit in ind.bits.iter_mut() {
                if rng.random_bool(rate) {
                    *bit = !*bit;
                }
            }
        }
    }

    fn config() -> GaConfig {
        GaConfig::default()
            .with_population_size(30)
            .with_max_generations(60)
            .with_mutation_rate(0.05)
            .with_seed(42)
            .with_parallel(false)
    }

    #[test]
    fn test_onemax_convergence() {
        let problem = OneMaxProblem { n: 20 };
        let result = GaRunner::run(&problem, &config()).unwrap();
        assert!(
            result.best_fitness <= -16.0,
            "expected fitness <= -16.0 for 20-bit OneMax, got {}",
            result.best_fitness
        );
    }

    #[test]
    fn test_runs_exact_generation_count() {
        let problem = OneMaxProblem { n: 10 };
        let result = GaRunner::run(&problem, &config()).unwrap();
        assert_eq!(result.generations, 60);
        assert!(!result.cancelled);
        assert_eq!(result.fitness_history.len(), 61);
        assert_eq!(result.seed, 42);
    }

    #[test]
    fn test_elitism_never_worsens_best() {
        let problem = OneMaxProblem { n: 16 };
        let cfg = config().with_mutation_rate(0.3);
        let result = GaRunner::run(&problem, &cfg).unwrap();
        for window in result.fitness_history.windows(2) {
            assert!(
                window[1] <= window[0],
                "fitness should be monotonically non-increasing with elitism: {} > {}",
                window[1],
                window[0]
            );
        }
    }

    #[test]
    fn test_same_seed_same_result() {
        let problem = OneMaxProblem { n: 24 };
        let a = GaRunner::run(&problem, &config()).unwrap();
        let b = GaRunner::run(&problem, &config()).unwrap();
        assert_eq!(a.fitness_history, b.fitness_history);
        assert_eq!(a.best.bits, b.best.bits);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_matches_sequential() {
        let problem = OneMaxProblem { n: 24 };
        let seq = GaRunner::run(&problem, &config()).unwrap();
        let par = GaRunner::run(&problem, &config().with_parallel(true)).unwrap();
        assert_eq!(seq.fitness_history, par.fitness_history);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let problem = OneMaxProblem { n: 4 };
        let cfg = config().with_population_size(1);
        assert!(matches!(
            GaRunner::run(&problem, &cfg),
            Err(ConfigError::PopulationTooSmall(1))
        ));
    }

    #[test]
    fn test_zero_generations_rejected() {
        let problem = OneMaxProblem { n: 4 };
        let cfg = config().with_max_generations(0);
        assert!(matches!(
            GaRunner::run(&problem, &cfg),
            Err(ConfigError::NoGenerations)
        ));
    }

    #[test]
    fn test_cancellation_before_first_generation() {
        let problem = OneMaxProblem { n: 10 };
        let cancel = Arc::new(AtomicBool::new(true));
        let result = GaRunner::run_with_cancel(&problem, &config(), Some(cancel)).unwrap();
        assert!(result.cancelled);
        assert_eq!(result.generations, 0);
        assert_eq!(result.fitness_history.len(), 1);
    }

    #[test]
    fn test_cancellation_from_other_thread() {
        let problem = OneMaxProblem { n: 20 };
        let cfg = config().with_max_generations(10_000_000);
        let cancel = Arc::new(AtomicBool::new(false));

        let cancel_clone = cancel.clone();
        std::thread::spawn(move || {
            std::thread::sleep(std::time::Duration::from_millis(10));
            cancel_clone.store(true, Ordering::Relaxed);
        });

        let result = GaRunner::run_with_cancel(&problem, &cfg, Some(cancel)).unwrap();
        assert!(result.cancelled, "expected cancelled result");
        assert!(result.generations < 10_000_000, "should have stopped early");
    }

    #[test]
    fn test_find_best_prefers_first_minimum() {
        let pop = vec![
            BitString {
                bits: vec![false],
                fitness: 2.0,
            },
            BitString {
                bits: vec![true],
                fitness: 1.0,
            },
            BitString {
                bits: vec![false, true],
                fitness: 1.0,
            },
        ];
        assert_eq!(find_best(&pop).bits, vec![true]);
    }
}
