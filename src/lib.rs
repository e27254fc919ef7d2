//! Tabular Q-learning on a tile grid world.
//!
//! A [`GridEnvironment`] is built from an [`EnvironmentDescription`]; a
//! [`QLearningAgent`] then learns action values over repeated episodes with
//! epsilon-greedy exploration, keeping the shortest path to a goal it has found
//! and how often each tile was visited.
//!
//! ```
//! use gridworld_q::{AgentConfig, EnvironmentDescription, QLearningAgent};
//!
//! let description = EnvironmentDescription::new(vec![0.0, 0.0, 0.0, 10.0], 2, 0, vec![3], vec![]);
//! let mut agent = QLearningAgent::new(AgentConfig::new(0.5, 0.9, 0.1)?);
//! agent.load_environment(&description)?;
//! agent.train(200)?;
//! assert_eq!(agent.policy().map(|p| p.steps()), Some(2));
//! # Ok::<(), gridworld_q::Error>(())
//! ```

pub mod agent;
pub mod config;
pub mod description;
pub mod environment;
pub mod error;
pub mod logging;
pub mod policy;
pub mod report;
pub mod rl;

pub use agent::QLearningAgent;
pub use config::AgentConfig;
pub use description::EnvironmentDescription;
pub use environment::{Action, GridEnvironment, Movement, Tile};
pub use error::{Error, Result};
pub use policy::Policy;
pub use report::TrainingReport;
