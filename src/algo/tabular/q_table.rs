use std::marker::PhantomData;

use log::{debug, info};
use rand::{rngs::StdRng, SeedableRng};

use crate::{
    check_interval,
    decay::{self, Decay},
    env::{DiscreteActionSpace, DiscreteStateSpace},
    error::{Error, Result},
    exploration::{Choice, EpsilonGreedy},
    memory::Exp,
    util::argmax,
};

/// Configuration for the [`QTableAgent`]
pub struct QTableAgentConfig<D: Decay = decay::Linear> {
    /// Exploration policy, evaluated at the number of completed episodes
    ///
    /// **Default**: epsilon annealed linearly from `1` to `0` over 50 000 episodes
    pub exploration: EpsilonGreedy<D>,
    /// The learning rate - must be between 0 and 1
    ///
    /// **Default**: `0.1`
    pub alpha: f32,
    /// The discount factor - must be between 0 and 1
    ///
    /// **Default**: `1.0`
    pub gamma: f32,
    /// Seed for action sampling, or `None` to seed from the OS
    ///
    /// **Default**: `None`
    pub seed: Option<u64>,
}

impl QTableAgentConfig<decay::Linear> {
    /// Default settings with epsilon reaching `0` after `episodes` episodes
    pub fn annealed(episodes: u32) -> Result<Self> {
        Ok(Self {
            exploration: EpsilonGreedy::new(decay::Linear::new(1.0, 0.0, episodes)?),
            alpha: 0.1,
            gamma: 1.0,
            seed: None,
        })
    }
}

impl Default for QTableAgentConfig<decay::Linear> {
    fn default() -> Self {
        Self::annealed(50_000).expect("50 000 episodes is a valid schedule")
    }
}

/// Dense table of action values, one row per state and one column per action
#[derive(Debug, Clone, PartialEq)]
pub struct QTable {
    values: Vec<Vec<f32>>,
}

impl QTable {
    /// A table of zeros
    pub fn new(states: usize, actions: usize) -> Self {
        Self {
            values: vec![vec![0.0; actions]; states],
        }
    }

    pub fn states(&self) -> usize {
        self.values.len()
    }

    pub fn actions(&self) -> usize {
        self.values.first().map_or(0, Vec::len)
    }

    pub fn get(&self, state: usize, action: usize) -> f32 {
        self.values[state][action]
    }

    pub fn set(&mut self, state: usize, action: usize, value: f32) {
        self.values[state][action] = value;
    }

    /// Values of every action in `state`
    pub fn row(&self, state: usize) -> &[f32] {
        &self.values[state]
    }

    /// Column of the highest valued action in `state`, the earliest one on ties
    pub fn best(&self, state: usize) -> usize {
        argmax(&self.values[state])
    }
}

/// Statistics for one finished episode
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpisodeSummary {
    /// Zero-based episode index within the agent's lifetime
    pub episode: u32,
    /// Number of actions taken before reaching a terminal state
    pub steps: usize,
    /// Sum of the rewards received
    pub reward: f32,
    /// Exploration rate the episode was played with
    pub epsilon: f32,
}

/// A Q-learning agent that utilizes a dense Q-table to learn its environment
///
/// Actions are chosen epsilon-greedily and every transition updates the table with
///
/// Q(s, a) ← (1 - α)Q(s, a) + α(r + γQ(s', a'))
///
/// where a' is the greedy action in s'. The bootstrap uses a' even when the next action
/// actually played is exploratory.
///
/// ### Generics
/// - `E` - The [`Environment`](crate::env::Environment) in which the agent will learn
///     - States must be indices `0..num_states()` and the action space must not change between states,
///       because the table has a fixed row for each state and a fixed column for each action
/// - `D` - The [`Decay`] strategy of the exploration rate
pub struct QTableAgent<E, D = decay::Linear>
where
    E: DiscreteStateSpace + DiscreteActionSpace,
    D: Decay,
{
    q_table: QTable,
    exploration: EpsilonGreedy<D>,
    alpha: f32,   // learning rate
    gamma: f32,   // discount factor
    episode: u32, // completed episodes
    rng: StdRng,
    env: PhantomData<fn(&mut E)>,
}

impl<E, D> QTableAgent<E, D>
where
    E: DiscreteStateSpace + DiscreteActionSpace,
    E::Action: Copy + PartialEq,
    D: Decay,
{
    /// Initialize a new `QTableAgent` with a table of zeros shaped for `env`
    ///
    /// **Errors** if `alpha` or `gamma` is not in the interval `[0,1]`
    pub fn new(env: &E, config: QTableAgentConfig<D>) -> Result<Self> {
        let table = QTable::new(env.num_states(), env.actions().len());
        Self::with_q_table(env, config, table)
    }

    /// Initialize a new `QTableAgent` that starts from existing action values
    ///
    /// **Errors** if the table does not have one row per state and one column per action of
    /// `env`, or if `alpha` or `gamma` is not in the interval `[0,1]`
    pub fn with_q_table(env: &E, config: QTableAgentConfig<D>, q_table: QTable) -> Result<Self> {
        check_interval!(config.alpha, 0.0, 1.0)?;
        check_interval!(config.gamma, 0.0, 1.0)?;

        let (states, actions) = (env.num_states(), env.actions().len());
        if q_table.states() != states || q_table.values.iter().any(|row| row.len() != actions) {
            return Err(Error::TableShape {
                rows: q_table.states(),
                columns: q_table.actions(),
                states,
                actions,
            });
        }

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            q_table,
            exploration: config.exploration,
            alpha: config.alpha,
            gamma: config.gamma,
            episode: 0,
            rng,
            env: PhantomData,
        })
    }

    pub fn q_table(&self) -> &QTable {
        &self.q_table
    }

    /// Number of episodes played so far
    pub fn episode(&self) -> u32 {
        self.episode
    }

    /// Exploration rate for the next episode
    pub fn epsilon(&self) -> f32 {
        self.exploration.epsilon(self.episode)
    }

    /// The action the current table prefers in `state`
    pub fn greedy_action(&self, env: &E, state: usize) -> E::Action {
        env.actions()[self.q_table.best(state)]
    }

    /// Choose an action based on the current state and exploration policy
    fn act(&mut self, env: &E, state: usize, actions: &[E::Action]) -> E::Action {
        match self.exploration.choose(self.episode, &mut self.rng) {
            Choice::Explore => env.random_action(&mut self.rng),
            Choice::Exploit => actions[self.q_table.best(state)],
        }
    }

    /// Learn from a given experience and update the table
    fn learn(&mut self, env: &E, experience: Exp<E>) {
        let Exp {
            state,
            action,
            next_state,
            reward,
            ..
        } = experience;

        let action = env.action_index(&action);
        let q_value = self.q_table.get(state, action);
        let next_q_value = self
            .q_table
            .get(next_state, self.q_table.best(next_state));
        let new_q_value = reward + self.gamma * next_q_value;
        let weighted_q_value = (1.0 - self.alpha) * q_value + self.alpha * new_q_value;

        self.q_table.set(state, action, weighted_q_value);
    }

    /// Play one episode from reset to a terminal state, learning after every step
    pub fn go(&mut self, env: &mut E) -> EpisodeSummary {
        let mut summary = EpisodeSummary {
            episode: self.episode,
            steps: 0,
            reward: 0.0,
            epsilon: self.epsilon(),
        };

        let actions = env.actions();
        let mut state = env.reset();
        loop {
            let action = self.act(env, state, &actions);
            let (next_state, reward, done) = env.step(action);

            self.learn(
                env,
                Exp {
                    state,
                    action,
                    next_state,
                    reward,
                    done,
                },
            );

            state = next_state;
            summary.steps += 1;
            summary.reward += reward;
            if done {
                break;
            }
        }

        self.episode += 1;
        debug!(
            "episode {} finished in {} steps with reward {} (epsilon {})",
            summary.episode, summary.steps, summary.reward, summary.epsilon
        );
        summary
    }

    /// Lazily play `episodes` episodes, yielding each summary as soon as its episode ends
    ///
    /// Dropping the iterator early stops training; the table keeps everything learned so far.
    pub fn train<'a>(&'a mut self, env: &'a mut E, episodes: u32) -> Training<'a, E, D> {
        info!(
            "training for {episodes} episodes from episode {} (alpha {}, gamma {})",
            self.episode, self.alpha, self.gamma
        );
        Training {
            agent: self,
            env,
            remaining: episodes,
        }
    }
}

/// Iterator over the episodes of a training run, see [`QTableAgent::train`]
pub struct Training<'a, E, D>
where
    E: DiscreteStateSpace + DiscreteActionSpace,
    D: Decay,
{
    agent: &'a mut QTableAgent<E, D>,
    env: &'a mut E,
    remaining: u32,
}

impl<'a, E, D> Iterator for Training<'a, E, D>
where
    E: DiscreteStateSpace + DiscreteActionSpace,
    E::Action: Copy + PartialEq,
    D: Decay,
{
    type Item = EpisodeSummary;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        Some(self.agent.go(self.env))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining as usize;
        (n, Some(n))
    }
}

impl<'a, E, D> ExactSizeIterator for Training<'a, E, D>
where
    E: DiscreteStateSpace + DiscreteActionSpace,
    E::Action: Copy + PartialEq,
    D: Decay,
{
}
