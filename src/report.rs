//! Summary of a training run: best path, success rate and tile visit counts.

use std::fmt;
use std::io::Write;

use ndarray::Array2;

use crate::agent::QLearningAgent;
use crate::error::{Error, Result};
use crate::policy::Policy;

#[derive(Debug, Clone, PartialEq)]
pub struct TrainingReport {
    pub episodes: usize,
    pub policy: Option<Policy>,
    /// Rewards collected along `policy`
    pub policy_reward: Option<f64>,
    /// Visit counts laid out as the grid, `[[row, col]]`
    pub visit_grid: Array2<u64>,
    /// Visits that landed on a goal tile, ie successful episodes
    pub goal_visits: u64,
}

impl TrainingReport {
    /// `episodes` is the number of episodes the visit counts were collected over.
    pub fn from_agent(agent: &QLearningAgent, episodes: usize) -> Result<Self> {
        let env = agent.environment().ok_or(Error::NoEnvironment)?;
        let counts = agent.visit_counts();
        let visit_grid = Array2::from_shape_vec((env.height(), env.width()), counts.to_vec())
            .map_err(|err| Error::format(format!("visit counts do not fit the grid: {}", err)))?;
        let policy = agent.policy().cloned();
        let policy_reward = policy
            .as_ref()
            .map(|policy| policy.total_reward(env))
            .transpose()?;
        let goal_visits = env
            .goal_tiles()
            .iter()
            .map(|tile| counts[*tile])
            .sum();

        Ok(Self {
            episodes,
            policy,
            policy_reward,
            visit_grid,
            goal_visits,
        })
    }

    /// Percentage of episodes that ended on a goal tile.
    pub fn success_rate(&self) -> f64 {
        if self.episodes == 0 {
            return 0.0;
        }
        self.goal_visits as f64 / self.episodes as f64 * 100.0
    }

    /// One line per grid row, counts separated by tabs.
    pub fn render_visit_table(&self) -> String {
        self.visit_grid
            .rows()
            .into_iter()
            .map(|row| {
                row.iter()
                    .map(|count| count.to_string())
                    .collect::<Vec<_>>()
                    .join("\t")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn write_visit_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);
        for row in self.visit_grid.rows() {
            csv.write_record(row.iter().map(|count| count.to_string()))?;
        }
        csv.flush().map_err(|source| Error::Io {
            operation: "flush visit counts".to_string(),
            source,
        })?;
        Ok(())
    }
}

impl fmt::Display for TrainingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.policy {
            Some(policy) => {
                write!(f, "Found policy: {}", policy)?;
                if let Some(reward) = self.policy_reward {
                    write!(f, " (reward {})", reward)?;
                }
                writeln!(f)?
            }
            None => writeln!(f, "No path to a goal was found")?,
        }
        writeln!(
            f,
            "Agent reached the goal(s) {:.2}% of the time.",
            self.success_rate()
        )?;
        writeln!(f, "Tile visit counts:")?;
        write!(f, "{}", self.render_visit_table())
    }
}
