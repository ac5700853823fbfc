//! Evolutionary loop configuration.
//!
//! [`GaConfig`] holds all parameters that control the evolutionary loop.

/// Configuration validation errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("population_size must be at least 2, got {0}")]
    PopulationTooSmall(usize),
    #[error("max_generations must be at least 1")]
    NoGenerations,
    #[error("elite_count ({elite}) must be smaller than population_size ({population})")]
    TooManyElites { elite: usize, population: usize },
    #[error("tournament_size must be at least 1")]
    EmptyTournament,
    #[error("mutation_rate must lie in [0, 1], got {0}")]
    InvalidMutationRate(f64),
}

/// Configuration for the evolutionary loop.
///
/// # Defaults
///
/// ```
/// use uav_patrol::ga::GaConfig;
///
/// let config = GaConfig::default();
/// assert_eq!(config.population_size, 150);
/// assert_eq!(config.tournament_size, 5);
/// assert_eq!(config.elite_count, 1);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use uav_patrol::ga::GaConfig;
///
/// let config = GaConfig::default()
///     .with_population_size(60)
///     .with_max_generations(200)
///     .with_mutation_rate(0.1)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct GaConfig {
    /// Number of individuals in the population. Constant across generations.
    pub population_size: usize,

    /// Number of generations to run. There is no early stop on convergence.
    pub max_generations: usize,

    /// Number of individuals sampled (with replacement) per tournament.
    pub tournament_size: usize,

    /// Best individuals copied unchanged into the next generation.
    pub elite_count: usize,

    /// Per-gene mutation probability handed to [`GaProblem::mutate`](super::GaProblem::mutate).
    pub mutation_rate: f64,

    /// Whether to evaluate offspring in parallel using rayon.
    ///
    /// Ignored when the crate is built without the `parallel` feature.
    pub parallel: bool,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 150,
            max_generations: 1000,
            tournament_size: 5,
            elite_count: 1,
            mutation_rate: 0.05,
            parallel: true,
            seed: None,
        }
    }
}

impl GaConfig {
    /// Preset used by the command-line planner: population 150, tournament 5,
    /// one elite, 5% per-gene mutation, running `generations` generations.
    pub fn patrol(generations: usize) -> Self {
        Self::default().with_max_generations(generations)
    }

    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the number of generations.
    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    /// Sets the tournament size.
    pub fn with_tournament_size(mut self, k: usize) -> Self {
        self.tournament_size = k;
        self
    }

    /// Sets the number of elites.
    pub fn with_elite_count(mut self, n: usize) -> Self {
        self.elite_count = n;
        self
    }

    /// Sets the per-gene mutation rate.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size < 2 {
            return Err(ConfigError::PopulationTooSmall(self.population_size));
        }
        if self.max_generations == 0 {
            return Err(ConfigError::NoGenerations);
        }
        if self.elite_count >= self.population_size {
            return Err(ConfigError::TooManyElites {
                elite: self.elite_count,
                population: self.population_size,
            });
        }
        if self.tournament_size == 0 {
            return Err(ConfigError::EmptyTournament);
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(ConfigError::InvalidMutationRate(self.mutation_rate));
        }
        Ok(())
    }
}
