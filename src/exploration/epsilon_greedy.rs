use rand::Rng;

use crate::decay::Decay;

use super::Choice;

/// Epsilon greedy exploration policy with time-decaying epsilon threshold
#[derive(Debug, Clone)]
pub struct EpsilonGreedy<D: Decay> {
    epsilon: D,
}

impl<D: Decay> EpsilonGreedy<D> {
    /// Initialize epsilon greedy policy with a decay strategy
    pub fn new(decay: D) -> Self {
        Self { epsilon: decay }
    }

    /// Exploration rate after `episode` completed episodes
    pub fn epsilon(&self, episode: u32) -> f32 {
        self.epsilon.evaluate(episode as f32)
    }

    /// Invoke epsilon greedy policy for current episode
    ///
    /// An epsilon of `0` always exploits and an epsilon of `1` always explores.
    pub fn choose<R: Rng + ?Sized>(&self, episode: u32, rng: &mut R) -> Choice {
        if rng.gen::<f32>() >= self.epsilon(episode) {
            Choice::Exploit
        } else {
            Choice::Explore
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use crate::decay;

    use super::*;

    #[test]
    fn extremes_are_deterministic() {
        let mut rng = StdRng::seed_from_u64(0);
        let greedy = EpsilonGreedy::new(decay::Constant::new(0.0));
        let random = EpsilonGreedy::new(decay::Constant::new(1.0));
        for episode in 0..1000 {
            assert_eq!(greedy.choose(episode, &mut rng), Choice::Exploit);
            assert_eq!(random.choose(episode, &mut rng), Choice::Explore);
        }
    }

    #[test]
    fn follows_decay() {
        let policy = EpsilonGreedy::new(decay::Linear::new(1.0, 0.0, 10).unwrap());
        assert_eq!(policy.epsilon(0), 1.0);
        assert_eq!(policy.epsilon(5), 0.5);
        assert_eq!(policy.epsilon(10), 0.0);

        let mut rng = StdRng::seed_from_u64(3);
        let explored = (0..10_000)
            .filter(|_| policy.choose(5, &mut rng) == Choice::Explore)
            .count();
        assert!((4_500..5_500).contains(&explored), "explored {explored}");
    }
}
