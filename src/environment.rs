use std::collections::BTreeSet;
use std::fmt;
use std::ops::Range;

use crate::description::EnvironmentDescription;
use crate::error::{Error, Result};

/// Row-major index of a grid cell.
pub type Tile = usize;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Movement {
    Up,
    Right,
    Down,
    Left,
}

impl Movement {
    /// Order in which legal moves are cached for every tile.
    pub const ALL: [Movement; 4] = [Movement::Up, Movement::Right, Movement::Down, Movement::Left];

    pub fn into_vector(self) -> (isize, isize)
    {
        match self {
            Movement::Up    => (-1, 0),
            Movement::Right => ( 0, 1),
            Movement::Down  => ( 1, 0),
            Movement::Left  => ( 0,-1),
        }
    }
}

// Action
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Action {
    pub from: Tile,
    pub to: Tile,
}

impl Action {
    pub fn new(from: Tile, to: Tile) -> Self {
        Self { from, to }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.from, self.to)
    }
}

/// Immutable grid world: rewards, goal and terminal tiles, and the legal moves
/// out of every tile.
#[derive(Debug, Clone)]
pub struct GridEnvironment {
    rewards: Vec<f64>,
    goal_tiles: BTreeSet<Tile>,
    terminal_tiles: BTreeSet<Tile>,
    width: usize,
    start: Tile,
    action_cache: Vec<Vec<Action>>,
}

impl GridEnvironment {
    pub fn new(description: &EnvironmentDescription) -> Result<Self>
    {
        let width = description.width;
        if width == 0 {
            return Err(Error::format("width must be greater than zero"));
        }
        let tile_count = description.rewards.len();
        if tile_count == 0 {
            return Err(Error::format("the grid has no tiles"));
        }
        if tile_count % width != 0 {
            return Err(Error::format(format!(
                "{} rewards cannot be split into rows of width {}",
                tile_count, width
            )));
        }
        if let Some(tile) = description.rewards.iter().position(|r| !r.is_finite()) {
            return Err(Error::format(format!("reward of tile {} is not finite", tile)));
        }
        if description.start_tile >= tile_count {
            return Err(Error::format(format!(
                "start position {} is outside the {}-tile grid",
                description.start_tile, tile_count
            )));
        }

        let goal_tiles = collect_tiles("win", &description.goal_tiles, tile_count)?;
        let terminal_tiles = collect_tiles("game over", &description.terminal_tiles, tile_count)?;
        if let Some(tile) = goal_tiles.intersection(&terminal_tiles).next() {
            return Err(Error::format(format!(
                "tile {} is both a win tile and a game over tile",
                tile
            )));
        }

        let mut env = Self {
            rewards: description.rewards.clone(),
            goal_tiles,
            terminal_tiles,
            width,
            start: description.start_tile,
            action_cache: Vec::new(),
        };
        env.setup_action_cache();
        tracing::debug!(
            width = env.width,
            height = env.height(),
            goals = env.goal_tiles.len(),
            terminals = env.terminal_tiles.len(),
            "environment ready"
        );
        Ok(env)
    }

    fn setup_action_cache(&mut self) {
        let cache: Vec<Vec<Action>> = self
            .tiles()
            .map(|tile| {
                Movement::ALL
                    .iter()
                    .filter_map(|movement| self.check_movement(tile, *movement))
                    .map(|to| Action::new(tile, to))
                    .collect()
            })
            .collect();
        self.action_cache = cache;
    }

    /// Tile reached by moving from `tile`, or `None` when the move leaves the grid.
    fn check_movement(&self, tile: Tile, movement: Movement) -> Option<Tile>
    {
        let (row, col) = self.row_col(tile);
        let (d_row, d_col) = movement.into_vector();
        let new_row = row as isize + d_row;
        let new_col = col as isize + d_col;

        if new_row < 0 || new_row >= self.height() as isize {
            return None;
        }
        if new_col < 0 || new_col >= self.width as isize {
            return None;
        }
        Some(new_row as usize * self.width + new_col as usize)
    }

    fn check_tile(&self, tile: Tile) -> Result<()> {
        if tile < self.tile_count() {
            Ok(())
        } else {
            Err(Error::OutOfRange { tile, tile_count: self.tile_count() })
        }
    }

    /// Legal moves out of `tile`, ordered up, right, down, left.
    pub fn legal_actions(&self, tile: Tile) -> Result<Vec<Action>> {
        self.check_tile(tile)?;
        Ok(self.action_cache[tile].clone())
    }

    pub(crate) fn cached_actions(&self, tile: Tile) -> Result<&[Action]> {
        self.check_tile(tile)?;
        Ok(&self.action_cache[tile])
    }

    /// Every legal move of the grid, tile by tile.
    pub fn all_actions(&self) -> impl Iterator<Item = &Action> + '_ {
        self.action_cache.iter().flatten()
    }

    pub fn reward(&self, tile: Tile) -> Result<f64> {
        self.check_tile(tile)?;
        Ok(self.rewards[tile])
    }

    pub fn is_goal(&self, tile: Tile) -> bool {
        self.goal_tiles.contains(&tile)
    }

    pub fn is_terminal_non_goal(&self, tile: Tile) -> bool {
        self.terminal_tiles.contains(&tile)
    }

    pub fn is_episode_end(&self, tile: Tile) -> bool {
        self.is_goal(tile) || self.is_terminal_non_goal(tile)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.rewards.len() / self.width
    }

    pub fn tile_count(&self) -> usize {
        self.rewards.len()
    }

    pub fn start_tile(&self) -> Tile {
        self.start
    }

    pub fn goal_tiles(&self) -> &BTreeSet<Tile> {
        &self.goal_tiles
    }

    pub fn tiles(&self) -> Range<Tile> {
        0..self.tile_count()
    }

    pub fn row_col(&self, tile: Tile) -> (usize, usize) {
        (tile / self.width, tile % self.width)
    }
}

fn collect_tiles(kind: &str, tiles: &[Tile], tile_count: usize) -> Result<BTreeSet<Tile>> {
    match tiles.iter().find(|tile| **tile >= tile_count) {
        Some(tile) => Err(Error::format(format!(
            "{} tile {} is outside the {}-tile grid",
            kind, tile, tile_count
        ))),
        None => Ok(tiles.iter().copied().collect()),
    }
}
