use rand::{seq::SliceRandom, Rng};

/// Represents a Markov decision process, defining the dynamics of an environment
/// in which an agent can operate.
///
/// This base trait represents the common case of a discrete-time episodic MDP with one agent.
pub trait Environment {
    /// A representation of the state of the environment to be passed to an agent
    type State;

    /// A representation of an action that an agent can take to affect the environment
    type Action;

    /// Update the environment in response to an action taken by an agent, producing a new state and associated reward
    ///
    /// The returned state is always a valid state of the environment, including when the
    /// episode has ended.
    ///
    /// **Returns** `(next_state, reward, done)`
    fn step(&mut self, action: Self::Action) -> (Self::State, f32, bool);

    /// Reset the environment to an initial state
    ///
    /// **Returns** the state
    fn reset(&mut self) -> Self::State;
}

/// An environment with a finite set of actions
pub trait DiscreteActionSpace: Environment {
    /// Get the available actions in a fixed, canonical order
    ///
    /// The returned vec should never be empty, instead specify an action that represents doing nothing if necessary.
    fn actions(&self) -> Vec<Self::Action>;

    /// Sample an action uniformly at random
    fn random_action<R: Rng + ?Sized>(&self, rng: &mut R) -> Self::Action
    where
        Self::Action: Clone,
    {
        self.actions()
            .choose(rng)
            .cloned()
            .expect("action space is not empty")
    }

    /// Position of `action` in [`actions`](Self::actions)
    fn action_index(&self, action: &Self::Action) -> usize
    where
        Self::Action: PartialEq,
    {
        self.actions()
            .iter()
            .position(|a| a == action)
            .expect("action belongs to the action space")
    }
}

/// An environment whose states are the indices `0..num_states()`
pub trait DiscreteStateSpace: Environment<State = usize> {
    fn num_states(&self) -> usize;
}
