//! On-disk format of a grid world.
//!
//! A description is a JSON object:
//!
//! ```json
//! {
//!     "environment": [0, 0, 0, 10],
//!     "win_tiles": [3],
//!     "game_over_tiles": [],
//!     "width": 2,
//!     "start_position": 0
//! }
//! ```
//!
//! `restart_tiles` is accepted in place of `game_over_tiles`. Structural checks
//! (sizes, indices in range) happen when the description is turned into a
//! [`GridEnvironment`](crate::environment::GridEnvironment).

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::environment::Tile;
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentDescription {
    /// Reward for entering each tile, row-major.
    #[serde(rename = "environment")]
    pub rewards: Vec<f64>,
    #[serde(rename = "win_tiles")]
    pub goal_tiles: Vec<Tile>,
    #[serde(rename = "game_over_tiles", alias = "restart_tiles", default)]
    pub terminal_tiles: Vec<Tile>,
    pub width: usize,
    #[serde(rename = "start_position")]
    pub start_tile: Tile,
}

impl EnvironmentDescription {
    pub fn new(
        rewards: Vec<f64>,
        width: usize,
        start_tile: Tile,
        goal_tiles: Vec<Tile>,
        terminal_tiles: Vec<Tile>,
    ) -> Self {
        Self {
            rewards,
            goal_tiles,
            terminal_tiles,
            width,
            start_tile,
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        serde_json::from_reader(reader).map_err(|err| {
            if err.is_io() {
                Error::Io {
                    operation: "read environment description".to_string(),
                    source: err.into(),
                }
            } else {
                err.into()
            }
        })
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::Io {
            operation: format!("open environment file {}", path.display()),
            source,
        })?;
        let description = Self::from_reader(BufReader::new(file))?;
        tracing::debug!(
            path = %path.display(),
            tiles = description.rewards.len(),
            width = description.width,
            "loaded environment description"
        );
        Ok(description)
    }
}
