use std::collections::HashSet;

use crate::config::AgentConfig;
use crate::description::EnvironmentDescription;
use crate::environment::{Action, GridEnvironment, Tile};
use crate::error::{Error, Result};
use crate::policy::Policy;
use crate::rl::{decayed_epsilon, q_learning_backup, ActionValues, EpsilonGreedy};

/// Tabular Q-learning agent for a [`GridEnvironment`].
///
/// Training state (action values, best path, visit counts) accumulates over
/// successive [`train`](Self::train) calls and is only reset by
/// [`load_environment`](Self::load_environment).
///
/// Episodes have no step limit: they end only on a goal or game over tile.
#[derive(Debug, Clone)]
pub struct QLearningAgent {
    config: AgentConfig,
    env: Option<GridEnvironment>,
    action_values: ActionValues,
    policy: Option<Policy>,
    visit_counts: Vec<u64>,
    explorer: EpsilonGreedy,
}

impl QLearningAgent {
    pub fn new(config: AgentConfig) -> Self
    {
        let explorer = EpsilonGreedy::new(config.seed);
        Self {
            config,
            env: None,
            action_values: ActionValues::new(),
            policy: None,
            visit_counts: Vec::new(),
            explorer,
        }
    }

    /// Binds a new environment and forgets everything learned so far.
    ///
    /// On error the agent keeps its previous environment and state.
    pub fn load_environment(&mut self, description: &EnvironmentDescription) -> Result<()>
    {
        let env = GridEnvironment::new(description)?;

        self.explorer.reseed(self.config.seed);
        self.action_values = ActionValues::zeroed(&env);
        self.policy = None;
        self.visit_counts = vec![0; env.tile_count()];
        tracing::info!(
            tiles = env.tile_count(),
            actions = self.action_values.len(),
            seed = self.config.seed,
            "environment loaded"
        );
        self.env = Some(env);
        Ok(())
    }

    fn env(&self) -> Result<&GridEnvironment> {
        self.env.as_ref().ok_or(Error::NoEnvironment)
    }

    /// Epsilon-greedy choice of the next move out of `tile`, preferring moves
    /// not yet in `visited`.
    pub fn select_action(&mut self, tile: Tile, epsilon: f64, visited: &HashSet<Action>) -> Result<Action>
    {
        let env = self.env.as_ref().ok_or(Error::NoEnvironment)?;
        let actions = env.cached_actions(tile)?;
        self.explorer
            .next_action(actions, &self.action_values, visited, epsilon)
            .ok_or(Error::EmptyActionSet { tile })
    }

    /// Value `action` would get from one Q-learning backup. The table itself
    /// is left untouched.
    pub fn update_action_value(&self, action: Action) -> Result<f64>
    {
        let env = self.env()?;
        let next = action.to;
        let reward = env.reward(next)?;
        let next_best = self
            .action_values
            .max_value(env.cached_actions(next)?)
            .unwrap_or(0.0);

        Ok(q_learning_backup(
            self.action_values.get(&action),
            reward,
            next_best,
            self.config.alpha(),
            self.config.gamma(),
        ))
    }

    /// Runs a full episode, ie until the agent reaches a goal or game over
    /// tile, and returns the tiles it walked through.
    pub fn run_episode(&mut self, epsilon: f64) -> Result<Vec<Tile>>
    {
        let mut tile = self.env()?.start_tile();
        let mut path = vec![tile];
        let mut visited = HashSet::new();
        self.visit_counts[tile] += 1;

        loop {
            let action = self.select_action(tile, epsilon, &visited)?;
            let value = self.update_action_value(action)?;
            self.action_values.set(action, value);

            tile = action.to;
            path.push(tile);
            visited.insert(action);
            self.visit_counts[tile] += 1;

            let env = self.env()?;
            if env.is_episode_end(tile) {
                if env.is_goal(tile) {
                    self.record_success(&path);
                }
                return Ok(path);
            }
        }
    }

    fn record_success(&mut self, path: &[Tile]) {
        let improved = match &self.policy {
            Some(best) => path.len() < best.len(),
            None => true,
        };
        if improved {
            tracing::debug!(steps = path.len() - 1, "shorter path to a goal found");
            self.policy = Some(Policy::new(path.to_vec()));
        }
    }

    /// Runs `episodes` episodes. Exploration grows linearly from zero on the
    /// first episode towards the configured epsilon.
    pub fn train(&mut self, episodes: usize) -> Result<()>
    {
        self.env()?;
        let mut reported = 0;

        for episode in 0..episodes {
            let epsilon = decayed_epsilon(episode, episodes, self.config.epsilon());
            let path = self.run_episode(epsilon)?;
            tracing::trace!(episode, epsilon, steps = path.len() - 1, "episode finished");

            let decile = (episode + 1) * 10 / episodes;
            if decile > reported {
                reported = decile;
                tracing::info!("{}% done...", decile * 10);
            }
        }

        match &self.policy {
            Some(policy) => tracing::info!(episodes, steps = policy.steps(), "training finished"),
            None => tracing::warn!(episodes, "training finished without reaching a goal"),
        }
        Ok(())
    }

    pub fn alpha(&self) -> f64 {
        self.config.alpha()
    }

    pub fn gamma(&self) -> f64 {
        self.config.gamma()
    }

    pub fn epsilon(&self) -> f64 {
        self.config.epsilon()
    }

    pub fn set_alpha(&mut self, value: f64) -> Result<()> {
        self.config.set_alpha(value)
    }

    pub fn set_gamma(&mut self, value: f64) -> Result<()> {
        self.config.set_gamma(value)
    }

    pub fn set_epsilon(&mut self, value: f64) -> Result<()> {
        self.config.set_epsilon(value)
    }

    /// Shortest path to a goal found so far.
    pub fn policy(&self) -> Option<&Policy> {
        self.policy.as_ref()
    }

    pub fn visit_counts(&self) -> &[u64] {
        &self.visit_counts
    }

    pub fn environment(&self) -> Option<&GridEnvironment> {
        self.env.as_ref()
    }

    pub fn action_values(&self) -> &ActionValues {
        &self.action_values
    }

    pub fn action_value(&self, action: &Action) -> Option<f64> {
        if self.action_values.contains(action) {
            Some(self.action_values.get(action))
        } else {
            None
        }
    }
}

impl Default for QLearningAgent {
    fn default() -> Self {
        Self::new(AgentConfig::default())
    }
}
