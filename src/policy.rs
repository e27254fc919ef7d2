use std::fmt;

use crate::environment::{GridEnvironment, Tile};
use crate::error::Result;

/// Path the agent walked from the start tile to a goal tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Policy {
    path: Vec<Tile>,
}

impl Policy {
    pub fn new(path: Vec<Tile>) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &[Tile] {
        &self.path
    }

    /// Number of tiles on the path, start included.
    pub fn len(&self) -> usize {
        self.path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// Number of moves taken.
    pub fn steps(&self) -> usize {
        self.path.len().saturating_sub(1)
    }

    pub fn start(&self) -> Option<Tile> {
        self.path.first().copied()
    }

    pub fn end(&self) -> Option<Tile> {
        self.path.last().copied()
    }

    /// Sum of the rewards collected on every tile entered after the start.
    pub fn total_reward(&self, env: &GridEnvironment) -> Result<f64> {
        self.path
            .iter()
            .skip(1)
            .map(|tile| env.reward(*tile))
            .sum()
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, tile) in self.path.iter().enumerate() {
            if i > 0 {
                write!(f, " -> ")?;
            }
            write!(f, "{}", tile)?;
        }
        Ok(())
    }
}
