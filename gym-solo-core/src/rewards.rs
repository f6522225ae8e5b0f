//! Rewards and their composition.
use crate::error::SoloError;
use anyhow::Result;
use log::debug;

/// A scalar evaluation of the current state.
pub trait Reward<C: ?Sized> {
    /// Computes the reward for the current state.
    fn compute(&mut self, client: &C) -> Result<f64>;
}

struct WeightedReward<C: ?Sized> {
    weight: f64,
    reward: Box<dyn Reward<C>>,
}

/// Combines registered rewards linearly.
///
/// With rewards `r1`, `r2` registered with weights `w1`, `w2`, the combined
/// reward is `w1 * r1 + w2 * r2`. No normalization or clipping is applied;
/// anything nonlinear, e.g. temporal decay, belongs in a custom [`Reward`].
pub struct RewardFactory<C: ?Sized> {
    rewards: Vec<WeightedReward<C>>,
}

impl<C: ?Sized> Default for RewardFactory<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ?Sized> RewardFactory<C> {
    /// Creates an empty factory.
    pub fn new() -> Self {
        Self {
            rewards: Vec::new(),
        }
    }

    /// The number of registered rewards.
    pub fn len(&self) -> usize {
        self.rewards.len()
    }

    /// Returns `true` if no reward is registered.
    pub fn is_empty(&self) -> bool {
        self.rewards.is_empty()
    }

    /// Registers a reward with a weight in `(-inf, inf)`.
    ///
    /// Negative weights turn the reward into a penalty.
    pub fn register_reward<R>(&mut self, weight: f64, reward: R)
    where
        R: Reward<C> + 'static,
    {
        debug!("Registered reward with weight {}", weight);
        self.rewards.push(WeightedReward {
            weight,
            reward: Box::new(reward),
        });
    }

    /// Evaluates the current state and returns the combined reward.
    pub fn get_reward(&mut self, client: &C) -> Result<f64> {
        if self.rewards.is_empty() {
            return Err(SoloError::EmptyRegistry(
                "Need to register at least one reward instance".to_string(),
            )
            .into());
        }

        self.rewards
            .iter_mut()
            .try_fold(0.0, |acc, wr| -> Result<f64> {
                Ok(acc + wr.weight * wr.reward.compute(client)?)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ConstReward(f64);

    impl Reward<()> for ConstReward {
        fn compute(&mut self, _client: &()) -> Result<f64> {
            Ok(self.0)
        }
    }

    struct FailingReward;

    impl Reward<()> for FailingReward {
        fn compute(&mut self, _client: &()) -> Result<f64> {
            Err(SoloError::Backend("lost connection".to_string()).into())
        }
    }

    #[test]
    fn test_empty_factory() {
        let mut factory = RewardFactory::<()>::new();
        let err = factory.get_reward(&()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SoloError>(),
            Some(SoloError::EmptyRegistry(_))
        ));
    }

    #[test]
    fn test_single_reward() -> Result<()> {
        let mut factory = RewardFactory::new();
        factory.register_reward(1.0, ConstReward(2.5));
        assert_eq!(factory.get_reward(&())?, 2.5);
        Ok(())
    }

    #[test]
    fn test_weighted_sum_with_penalty() -> Result<()> {
        let mut factory = RewardFactory::new();
        factory.register_reward(1.0, ConstReward(3.0));
        factory.register_reward(-2.0, ConstReward(1.0));
        assert_eq!(factory.get_reward(&())?, 1.0);
        assert_eq!(factory.len(), 2);
        Ok(())
    }

    #[test]
    fn test_weights_are_not_normalized() -> Result<()> {
        let mut factory = RewardFactory::new();
        factory.register_reward(0.5, ConstReward(4.0));
        factory.register_reward(3.0, ConstReward(-1.0));
        factory.register_reward(10.0, ConstReward(0.25));
        assert_eq!(factory.get_reward(&())?, 2.0 - 3.0 + 2.5);
        Ok(())
    }

    #[test]
    fn test_backend_error_propagates() {
        let mut factory = RewardFactory::new();
        factory.register_reward(1.0, ConstReward(1.0));
        factory.register_reward(1.0, FailingReward);
        let err = factory.get_reward(&()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<SoloError>(),
            Some(&SoloError::Backend("lost connection".to_string()))
        );
    }
}
