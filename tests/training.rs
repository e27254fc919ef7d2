use std::collections::HashSet;
use std::io::Write;

use gridworld_q::{
    Action, AgentConfig, EnvironmentDescription, Error, QLearningAgent, TrainingReport,
};

fn two_by_two() -> EnvironmentDescription {
    EnvironmentDescription::new(vec![0.0, 0.0, 0.0, 10.0], 2, 0, vec![3], vec![])
}

fn sample() -> EnvironmentDescription {
    EnvironmentDescription::from_path(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/data/sample_environment.json"
    ))
    .expect("sample environment should load")
}

fn agent_with(alpha: f64, gamma: f64, epsilon: f64) -> QLearningAgent {
    QLearningAgent::new(AgentConfig::new(alpha, gamma, epsilon).unwrap())
}

#[test]
fn two_by_two_learns_shortest_path() {
    let mut agent = agent_with(0.5, 0.9, 0.1);
    agent.load_environment(&two_by_two()).unwrap();
    agent.train(500).unwrap();

    let policy = agent.policy().expect("a goal should have been reached");
    assert_eq!(policy.len(), 3);
    assert_eq!(policy.start(), Some(0));
    assert_eq!(policy.end(), Some(3));
    assert!(policy.path() == [0, 1, 3] || policy.path() == [0, 2, 3]);

    let value = |from, to| agent.action_value(&Action::new(from, to)).unwrap();
    let via = policy.path()[1];
    let other = 3 - via;
    let into_goal = value(via, 3);
    assert!(into_goal > 0.0);

    let env = agent.environment().unwrap();
    let away: Vec<Action> = env
        .legal_actions(via)
        .unwrap()
        .into_iter()
        .filter(|action| action.to != 3)
        .chain([Action::new(0, other)])
        .collect();
    assert_eq!(away, vec![Action::new(via, 0), Action::new(0, other)]);
    for action in away {
        let away_value = agent.action_value(&action).unwrap();
        assert!(
            into_goal > away_value,
            "{} = {} should be below {} for {}",
            action,
            away_value,
            into_goal,
            Action::new(via, 3)
        );
    }
}

#[test]
fn every_episode_is_counted_once_at_the_start() {
    let mut agent = agent_with(0.5, 0.9, 0.1);
    agent.load_environment(&two_by_two()).unwrap();
    agent.train(500).unwrap();

    let counts = agent.visit_counts();
    // tile 0 is the start; the goal is entered once per episode
    assert!(counts[0] >= 500);
    assert_eq!(counts[3], 500);

    let report = TrainingReport::from_agent(&agent, 500).unwrap();
    assert!((report.success_rate() - 100.0).abs() < 1e-9);
}

#[test]
fn training_accumulates_across_calls() {
    let mut agent = agent_with(0.5, 0.9, 0.1);
    agent.load_environment(&two_by_two()).unwrap();
    agent.train(5).unwrap();
    agent.train(7).unwrap();
    assert_eq!(agent.visit_counts()[3], 12);
}

#[test]
fn reloading_resets_statistics() {
    let mut agent = QLearningAgent::default();
    agent.load_environment(&sample()).unwrap();
    agent.train(200).unwrap();
    assert!(agent.visit_counts().iter().any(|count| *count > 0));

    agent.load_environment(&sample()).unwrap();
    assert!(agent.visit_counts().iter().all(|count| *count == 0));
    assert!(agent.policy().is_none());
    assert!(agent.action_values().iter().all(|(_, value)| *value == 0.0));
}

#[test]
fn same_seed_same_training_run() {
    let mut first = QLearningAgent::default();
    let mut second = QLearningAgent::default();
    first.load_environment(&sample()).unwrap();
    second.load_environment(&sample()).unwrap();
    first.train(300).unwrap();
    second.train(300).unwrap();

    assert_eq!(first.action_values(), second.action_values());
    assert_eq!(first.visit_counts(), second.visit_counts());
    assert_eq!(first.policy(), second.policy());
}

#[test]
fn reload_reseeds_the_generator() {
    let mut agent = QLearningAgent::default();
    agent.load_environment(&sample()).unwrap();
    agent.train(150).unwrap();
    let values = agent.action_values().clone();
    let counts = agent.visit_counts().to_vec();

    agent.load_environment(&sample()).unwrap();
    agent.train(150).unwrap();
    assert_eq!(agent.action_values(), &values);
    assert_eq!(agent.visit_counts(), counts.as_slice());
}

#[test]
fn sample_policy_reaches_the_goal() {
    let mut agent = QLearningAgent::default();
    agent.load_environment(&sample()).unwrap();
    agent.train(1000).unwrap();

    if let Some(policy) = agent.policy() {
        let env = agent.environment().unwrap();
        assert_eq!(policy.start(), Some(env.start_tile()));
        assert!(env.is_goal(policy.end().unwrap()));
        assert!(policy.path()[1..policy.len() - 1]
            .iter()
            .all(|tile| !env.is_episode_end(*tile)));
    }
    let report = TrainingReport::from_agent(&agent, 1000).unwrap();
    assert!(report.success_rate() >= 0.0 && report.success_rate() <= 100.0);
}

#[test]
fn greedy_selection_avoids_visited_moves() {
    let mut agent = QLearningAgent::default();
    agent.load_environment(&sample()).unwrap();
    let env = agent.environment().unwrap().clone();

    // tile 14 is interior: four moves
    let actions = env.legal_actions(14).unwrap();
    assert_eq!(actions.len(), 4);
    for open in &actions {
        let visited: HashSet<Action> = actions.iter().filter(|a| *a != open).copied().collect();
        for _ in 0..20 {
            assert_eq!(agent.select_action(14, 0.0, &visited).unwrap(), *open);
        }
    }
}

#[test]
fn description_file_round_trip() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"environment": [0, 0, 0, 10], "win_tiles": [3], "restart_tiles": [], "width": 2, "start_position": 0}}"#
    )
    .unwrap();
    let description = EnvironmentDescription::from_path(file.path()).unwrap();
    assert_eq!(description, two_by_two());
}

#[test]
fn inconsistent_file_is_rejected_on_load() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"environment": [0, 0, 0], "win_tiles": [2], "game_over_tiles": [], "width": 2, "start_position": 0}}"#
    )
    .unwrap();
    let description = EnvironmentDescription::from_path(file.path()).unwrap();
    let mut agent = QLearningAgent::default();
    assert!(matches!(
        agent.load_environment(&description),
        Err(Error::Format { .. })
    ));
    assert!(agent.environment().is_none());
}
