use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::error::{NetError, Result};

fn default_epochs() -> usize {
    100
}

fn default_mutation() -> f64 {
    0.1
}

/// Parameters of a genetic run.
///
/// # Fields
/// - `population` — agents evaluated per epoch
/// - `epochs`     — upper bound on the number of epochs (default 100)
/// - `mutation`   — largest offset added to any single weight or bias when
///                  deriving the next generation (default 0.1)
/// - `seed`       — fixes the mutation RNG; entropy-seeded when `None`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvolutionConfig {
    pub population: usize,
    #[serde(default = "default_epochs")]
    pub epochs: usize,
    #[serde(default = "default_mutation")]
    pub mutation: f64,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl EvolutionConfig {
    pub fn new(population: usize) -> Self {
        EvolutionConfig {
            population,
            epochs: default_epochs(),
            mutation: default_mutation(),
            seed: None,
        }
    }

    pub fn epochs(mut self, epochs: usize) -> Self {
        self.epochs = epochs;
        self
    }

    pub fn mutation(mut self, mutation: f64) -> Self {
        self.mutation = mutation;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |message: String| Err(NetError::InvalidEvolutionConfig { message });
        if self.population == 0 {
            return invalid("population must be at least 1".to_string());
        }
        if self.epochs == 0 {
            return invalid("epochs must be at least 1".to_string());
        }
        if !self.mutation.is_finite() || self.mutation < 0.0 {
            return invalid(format!(
                "mutation must be a finite, non-negative number, got {}",
                self.mutation
            ));
        }
        // offsets are drawn from [-mutation, mutation], whose width must be finite
        if !(2.0 * self.mutation).is_finite() {
            return invalid(format!("mutation {} is too large", self.mutation));
        }
        Ok(())
    }

    pub(crate) fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Deserializes an `EvolutionConfig` from a JSON file.
    pub fn load_json(path: &str) -> Result<EvolutionConfig> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let config: EvolutionConfig = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }
}
