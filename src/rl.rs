use std::collections::hash_map::{self, HashMap};
use std::collections::HashSet;

use ordered_float::OrderedFloat;
use rand::prelude::*;

use crate::environment::{Action, GridEnvironment};

/// Action-value table: (from, to) move -> learned value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionValues {
    values: HashMap<Action, f64>,
}

impl ActionValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table with a zero entry for every legal move of `env`.
    pub fn zeroed(env: &GridEnvironment) -> Self {
        let values = env.all_actions().map(|action| (*action, 0.0)).collect();
        Self { values }
    }

    /// Unknown actions read as zero.
    pub fn get(&self, action: &Action) -> f64 {
        self.values.get(action).copied().unwrap_or(0.0)
    }

    pub fn contains(&self, action: &Action) -> bool {
        self.values.contains_key(action)
    }

    pub fn set(&mut self, action: Action, value: f64) {
        self.values.insert(action, value);
    }

    /// Highest value among `actions`, `None` when the slice is empty.
    pub fn max_value(&self, actions: &[Action]) -> Option<f64> {
        actions
            .iter()
            .map(|action| OrderedFloat(self.get(action)))
            .max()
            .map(OrderedFloat::into_inner)
    }

    /// All actions of `actions` sharing the highest value.
    pub fn best_actions<'a, I>(&self, actions: I) -> Vec<Action>
    where
        I: IntoIterator<Item = &'a Action>,
    {
        let mut best = Vec::new();
        let mut best_value = OrderedFloat(f64::NEG_INFINITY);
        for action in actions {
            let value = OrderedFloat(self.get(action));
            if value > best_value {
                best_value = value;
                best.clear();
            }
            if value == best_value {
                best.push(*action);
            }
        }
        best
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn iter(&self) -> hash_map::Iter<'_, Action, f64> {
        self.values.iter()
    }
}

/// One-step Q-learning backup.
///
/// (1 - alpha) * Q(s, a) + alpha * [R(s') + gamma * max_a' Q(s', a')]
pub fn q_learning_backup(current: f64, reward: f64, next_best: f64, alpha: f64, gamma: f64) -> f64 {
    (1.0 - alpha) * current + alpha * (reward + gamma * next_best)
}

/// Exploration rate for `episode` out of `episodes`, growing linearly from zero
/// towards `epsilon`.
pub fn decayed_epsilon(episode: usize, episodes: usize, epsilon: f64) -> f64 {
    if episodes == 0 {
        return 0.0;
    }
    episode as f64 / episodes as f64 * epsilon
}

/// Epsilon-greedy move selection that avoids repeating moves already made in
/// the current episode.
///
/// Every decision draws one value for the exploration coin flip and one more
/// for picking among the candidate moves, so runs replay exactly from a seed.
#[derive(Debug, Clone)]
pub struct EpsilonGreedy {
    rng: StdRng,
}

impl EpsilonGreedy {
    pub fn new(seed: u64) -> Self {
        EpsilonGreedy {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    /// Picks one of `actions`; `None` only if `actions` is empty.
    pub fn next_action(
        &mut self,
        actions: &[Action],
        values: &ActionValues,
        visited: &HashSet<Action>,
        epsilon: f64,
    ) -> Option<Action> {
        if actions.is_empty() {
            return None;
        }
        if self.rng.gen::<f64>() >= epsilon {
            let unvisited = actions.iter().filter(|action| !visited.contains(*action));
            let best = values.best_actions(unvisited);
            if let Some(action) = best.choose(&mut self.rng) {
                return Some(*action);
            }
        }
        actions.choose(&mut self.rng).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actions() -> Vec<Action> {
        vec![Action::new(4, 1), Action::new(4, 5), Action::new(4, 7), Action::new(4, 3)]
    }

    #[test]
    fn backup_matches_formula() {
        let value = q_learning_backup(2.0, 1.0, 4.0, 0.5, 0.9);
        assert!((value - (0.5 * 2.0 + 0.5 * (1.0 + 0.9 * 4.0))).abs() < 1e-12);
        assert_eq!(q_learning_backup(3.0, 10.0, 10.0, 0.0, 0.9), 3.0);
    }

    #[test]
    fn best_actions_collects_ties() {
        let mut values = ActionValues::new();
        values.set(Action::new(4, 1), 2.0);
        values.set(Action::new(4, 5), 5.0);
        values.set(Action::new(4, 7), 5.0);
        values.set(Action::new(4, 3), -1.0);
        assert_eq!(
            values.best_actions(&actions()),
            vec![Action::new(4, 5), Action::new(4, 7)]
        );
        assert_eq!(values.max_value(&actions()), Some(5.0));
        assert_eq!(values.max_value(&[]), None);
    }

    #[test]
    fn greedy_skips_visited_moves() {
        let mut values = ActionValues::new();
        values.set(Action::new(4, 5), 9.0);
        values.set(Action::new(4, 1), 1.0);
        let visited: HashSet<Action> = [Action::new(4, 5)].into_iter().collect();
        let mut selector = EpsilonGreedy::new(3);
        for _ in 0..50 {
            let action = selector.next_action(&actions(), &values, &visited, 0.0).unwrap();
            assert_eq!(action, Action::new(4, 1));
        }
    }

    #[test]
    fn falls_back_to_any_move_when_all_visited() {
        let values = ActionValues::new();
        let visited: HashSet<Action> = actions().into_iter().collect();
        let mut selector = EpsilonGreedy::new(3);
        let action = selector.next_action(&actions(), &values, &visited, 0.0).unwrap();
        assert!(actions().contains(&action));
    }

    #[test]
    fn empty_action_set_yields_none() {
        let mut selector = EpsilonGreedy::new(3);
        assert_eq!(selector.next_action(&[], &ActionValues::new(), &HashSet::new(), 0.5), None);
    }

    #[test]
    fn same_seed_same_choices() {
        let values = ActionValues::new();
        let mut a = EpsilonGreedy::new(11);
        let mut b = EpsilonGreedy::new(11);
        for _ in 0..100 {
            assert_eq!(
                a.next_action(&actions(), &values, &HashSet::new(), 0.3),
                b.next_action(&actions(), &values, &HashSet::new(), 0.3)
            );
        }
    }

    #[test]
    fn epsilon_schedule_starts_greedy() {
        assert_eq!(decayed_epsilon(0, 10, 0.1), 0.0);
        assert!((decayed_epsilon(5, 10, 0.1) - 0.05).abs() < 1e-12);
        assert!(decayed_epsilon(9, 10, 0.1) < 0.1);
        assert_eq!(decayed_epsilon(0, 0, 0.1), 0.0);
    }
}
