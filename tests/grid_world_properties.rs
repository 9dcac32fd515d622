use std::collections::{BTreeMap, BTreeSet};

use pitfall::{
    decay::{Decay, Linear},
    env::Environment,
    gym::{Action, GridWorld, GridWorldConfig},
};
use proptest::prelude::*;
use strum::VariantArray;

fn actions() -> impl Strategy<Value = Vec<Action>> {
    prop::collection::vec(prop::sample::select(Action::VARIANTS), 0..200)
}

fn config() -> impl Strategy<Value = GridWorldConfig> {
    (3usize..7, 1usize..7).prop_flat_map(|(rows, columns)| {
        let goal = rows * columns - 1;
        (
            prop::collection::btree_set(0..goal.max(1), 0..4),
            prop::collection::btree_map(0..goal.max(1), 0..=goal, 0..4),
        )
            .prop_map(move |(hazards, teleporters)| GridWorldConfig {
                rows,
                columns,
                hazards,
                teleporters,
            })
    })
}

proptest! {
    #[test]
    fn reference_grid_invariants(moves in actions()) {
        let config = GridWorldConfig::default();
        let mut env = GridWorld::new(config.clone()).unwrap();
        env.reset();

        for action in moves {
            let before = env.position();
            let (state, reward, done) = env.step(action);

            prop_assert_eq!(state, env.position());
            prop_assert!(state < 16);
            prop_assert!(!config.hazards.contains(&state), "rested on fire pit {}", state);
            prop_assert!(!config.teleporters.contains_key(&state), "rested on teleporter {}", state);
            prop_assert_eq!(done, state == 15);
            prop_assert_eq!(reward == 0.0, done);
            prop_assert!(reward == 0.0 || reward == -1.0 || reward == -2.0);

            if done {
                env.reset();
            } else if reward == -1.0 && state != before {
                // A plain accepted move lands one stride away or on a teleporter exit
                let exits: BTreeSet<usize> = config.teleporters.values().copied().collect();
                let distance = state.abs_diff(before);
                prop_assert!(distance == 1 || distance == 4 || exits.contains(&state));
            }
        }
    }

    #[test]
    fn any_grid_keeps_agent_on_the_grid(config in config(), moves in actions()) {
        let size = config.rows * config.columns;
        let mut env = GridWorld::new(config).unwrap();

        for action in moves {
            let (state, reward, done) = env.step(action);
            prop_assert_eq!(state, env.position());
            prop_assert!(state < size);
            prop_assert_eq!(done, state == size - 1);
            prop_assert!(reward <= 0.0 && reward >= -2.0);
            if done {
                prop_assert_eq!(reward, 0.0);
                prop_assert_eq!(env.reset(), 0);
            }
        }
    }

    #[test]
    fn open_moves_commit_the_candidate(
        rows in 3usize..8,
        columns in 2usize..8,
        start in 0usize..64,
        action in prop::sample::select(Action::VARIANTS),
    ) {
        let size = rows * columns;
        let mut env = GridWorld::new(GridWorldConfig {
            rows,
            columns,
            hazards: BTreeSet::new(),
            teleporters: BTreeMap::new(),
        })
        .unwrap();

        // Walk to `start` along the first line and down, which never wraps
        let start = start % (size - 1);
        let (line, cell) = env.to_coords(start);
        for _ in 0..cell {
            env.step(Action::Right);
        }
        for _ in 0..line {
            env.step(Action::Down);
        }
        prop_assert_eq!(env.position(), start);

        let candidate = match action {
            Action::Up => start.checked_sub(rows),
            Action::Down => Some(start + rows).filter(|&s| s < size),
            Action::Left => start.checked_sub(1).filter(|_| cell != 0),
            Action::Right => Some(start + 1).filter(|_| cell != rows - 1),
        };
        let (state, _, _) = env.step(action);
        prop_assert_eq!(state, candidate.unwrap_or(start));
    }

    #[test]
    fn linear_epsilon_lands_on_zero(episodes in 1u32..100_000) {
        let schedule = Linear::new(1.0, 0.0, episodes).unwrap();
        prop_assert_eq!(schedule.evaluate(0.0), 1.0);
        prop_assert_eq!(schedule.evaluate(episodes as f32), 0.0);

        let mut prev = 1.0;
        for t in (0..=episodes).step_by((episodes as usize / 97).max(1)) {
            let epsilon = schedule.evaluate(t as f32);
            prop_assert!(epsilon >= 0.0 && epsilon <= prev);
            prev = epsilon;
        }
    }
}
