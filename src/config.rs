//! Hyperparameters for the Q-learning agent.

use crate::error::{Error, Result};

/// Seed used when none is configured.
pub const DEFAULT_SEED: u64 = 31;

/// Learning configuration for a [`QLearningAgent`](crate::agent::QLearningAgent).
///
/// `alpha`, `gamma` and `epsilon` are kept private so every change goes through
/// the range check.
///
/// ```
/// use gridworld_q::config::AgentConfig;
///
/// let config = AgentConfig::default()
///     .with_alpha(0.5)?
///     .with_epsilon(0.2)?
///     .with_seed(7);
/// assert_eq!(config.alpha(), 0.5);
/// # Ok::<(), gridworld_q::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AgentConfig {
    alpha: f64,
    gamma: f64,
    epsilon: f64,
    /// Seed the agent's generator is reset to whenever an environment is loaded
    pub seed: u64,
}

impl AgentConfig {
    pub fn new(alpha: f64, gamma: f64, epsilon: f64) -> Result<Self> {
        Ok(Self {
            alpha: unit_interval("alpha", alpha)?,
            gamma: unit_interval("gamma", gamma)?,
            epsilon: unit_interval("epsilon", epsilon)?,
            seed: DEFAULT_SEED,
        })
    }

    /// Learning rate
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Discount factor
    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    /// Exploration rate reached at the end of a training run
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn set_alpha(&mut self, value: f64) -> Result<()> {
        self.alpha = unit_interval("alpha", value)?;
        Ok(())
    }

    pub fn set_gamma(&mut self, value: f64) -> Result<()> {
        self.gamma = unit_interval("gamma", value)?;
        Ok(())
    }

    pub fn set_epsilon(&mut self, value: f64) -> Result<()> {
        self.epsilon = unit_interval("epsilon", value)?;
        Ok(())
    }

    pub fn with_alpha(mut self, value: f64) -> Result<Self> {
        self.set_alpha(value)?;
        Ok(self)
    }

    pub fn with_gamma(mut self, value: f64) -> Result<Self> {
        self.set_gamma(value)?;
        Ok(self)
    }

    pub fn with_epsilon(mut self, value: f64) -> Result<Self> {
        self.set_epsilon(value)?;
        Ok(self)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            alpha: 0.1,
            gamma: 0.9,
            epsilon: 0.1,
            seed: DEFAULT_SEED,
        }
    }
}

fn unit_interval(name: &'static str, value: f64) -> Result<f64> {
    // NaN fails the range check too.
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(Error::InvalidParameter { name, value })
    }
}
