//! Actor-critic learning update and value queries

use burn::module::AutodiffModule;
use burn::prelude::*;
use burn::tensor::backend::AutodiffBackend;
use tracing::warn;

use crate::error::{AgentError, Result};
use crate::state::Transition;

use super::agent::AgentConfig;
use super::approximator::ApproximatorPair;
use super::policy::{PolicyNet, PolicyNetwork, ValueNet, ValueNetwork, log_prob, probabilities};

/// Scalar losses of one update, plus the advantage both actors were weighted by
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct UpdateLosses {
    pub move_loss: f32,
    pub action_loss: f32,
    pub value_loss: f32,
    pub advantage: f32,
}

/// Two actors (move, action) and one critic, each with a target copy.
pub struct ActorCritic<
    B: AutodiffBackend,
    P: AutodiffModule<B> = PolicyNet<B>,
    V: AutodiffModule<B> = ValueNet<B>,
> {
    pub(crate) move_policy: ApproximatorPair<B, P>,
    pub(crate) action_policy: ApproximatorPair<B, P>,
    pub(crate) value: ApproximatorPair<B, V>,
    state_dim: usize,
    move_count: usize,
    action_count: usize,
    pub(crate) device: B::Device,
}

impl<B: AutodiffBackend> ActorCritic<B> {
    /// Fresh networks; every target is initialised independently of its local.
    pub fn new(config: &AgentConfig, device: B::Device) -> Self {
        let net = &config.network;
        let lr = config.learning_rate;

        let move_policy = ApproximatorPair::new(
            PolicyNet::<B>::new(&device, config.state_dim, config.move_count, net),
            PolicyNet::<B::InnerBackend>::new(&device, config.state_dim, config.move_count, net),
            lr,
        );
        let action_policy = ApproximatorPair::new(
            PolicyNet::<B>::new(&device, config.state_dim, config.action_count, net),
            PolicyNet::<B::InnerBackend>::new(&device, config.state_dim, config.action_count, net),
            lr,
        );
        let value = ApproximatorPair::new(
            ValueNet::<B>::new(&device, config.state_dim, net),
            ValueNet::<B::InnerBackend>::new(&device, config.state_dim, net),
            lr,
        );

        Self::from_pairs(
            move_policy,
            action_policy,
            value,
            config.state_dim,
            device,
        )
    }
}

impl<B, P, V> ActorCritic<B, P, V>
where
    B: AutodiffBackend,
    P: AutodiffModule<B> + PolicyNetwork<B>,
    P::InnerModule: PolicyNetwork<B::InnerBackend>,
    V: AutodiffModule<B> + ValueNetwork<B>,
    V::InnerModule: ValueNetwork<B::InnerBackend>,
{
    pub fn from_pairs(
        move_policy: ApproximatorPair<B, P>,
        action_policy: ApproximatorPair<B, P>,
        value: ApproximatorPair<B, V>,
        state_dim: usize,
        device: B::Device,
    ) -> Self {
        let probe = Tensor::<B::InnerBackend, 2>::zeros([1, state_dim], &device);
        let move_count = move_policy.inference().logits(probe.clone()).dims()[1];
        let action_count = action_policy.inference().logits(probe).dims()[1];

        Self {
            move_policy,
            action_policy,
            value,
            state_dim,
            move_count,
            action_count,
            device,
        }
    }

    pub fn state_dim(&self) -> usize {
        self.state_dim
    }

    pub fn move_count(&self) -> usize {
        self.move_count
    }

    pub fn action_count(&self) -> usize {
        self.action_count
    }

    /// Local critic's estimate for `state`, without gradient tracking
    pub fn value_state(&self, state: &[f32]) -> Result<f32> {
        let input = state_tensor::<B::InnerBackend>(state, self.state_dim, &self.device)?;
        let value = scalar(self.value.inference().value(input))?;
        if !value.is_finite() {
            return Err(AgentError::Approximator(format!(
                "value estimate is not finite: {value}"
            )));
        }
        Ok(value)
    }

    /// Move distribution of the local move policy
    pub fn move_probabilities(&self, state: &[f32]) -> Result<Vec<f32>> {
        let input = state_tensor::<B::InnerBackend>(state, self.state_dim, &self.device)?;
        distribution(self.move_policy.inference().logits(input))
    }

    /// Action distribution of the local action policy
    pub fn action_probabilities(&self, state: &[f32]) -> Result<Vec<f32>> {
        let input = state_tensor::<B::InnerBackend>(state, self.state_dim, &self.device)?;
        distribution(self.action_policy.inference().logits(input))
    }

    /// One TD actor-critic step on a single transition.
    ///
    /// All three losses are computed and checked before any network moves, so
    /// a non-finite loss leaves every parameter untouched.
    pub fn update(&mut self, transition: &Transition) -> Result<UpdateLosses> {
        let state = state_tensor::<B>(&transition.state, self.state_dim, &self.device)?;
        let next_state = state_tensor::<B>(&transition.next_state, self.state_dim, &self.device)?;
        check_index("move", transition.movement, self.move_count)?;
        check_index("action", transition.action, self.action_count)?;

        // Terminal steps drop the bootstrap term instead of zeroing it
        let reward = Tensor::<B, 1>::from_floats([transition.reward], &self.device);
        let target = if transition.done {
            reward
        } else {
            reward + self.value.local().value(next_state) * transition.gamma
        };

        let td_error = target - self.value.local().value(state.clone());
        let value_loss = td_error.clone().powf_scalar(2.0);
        let advantage = td_error.detach();

        let move_loss = -log_prob(
            self.move_policy.local().logits(state.clone()),
            transition.movement,
        ) * advantage.clone();
        let action_loss = -log_prob(
            self.action_policy.local().logits(state),
            transition.action,
        ) * advantage.clone();

        let losses = UpdateLosses {
            move_loss: scalar(move_loss.clone())?,
            action_loss: scalar(action_loss.clone())?,
            value_loss: scalar(value_loss.clone())?,
            advantage: scalar(advantage)?,
        };

        if ![losses.move_loss, losses.action_loss, losses.value_loss]
            .iter()
            .all(|loss| loss.is_finite())
        {
            warn!(?losses, "non-finite loss, update skipped");
            return Err(AgentError::Approximator(format!(
                "non-finite loss (move {}, action {}, value {})",
                losses.move_loss, losses.action_loss, losses.value_loss
            )));
        }

        self.value.step(value_loss);
        self.move_policy.step(move_loss);
        self.action_policy.step(action_loss);

        Ok(losses)
    }

    /// Hard-copy every local network into its target
    pub fn sync_targets(&mut self) {
        self.move_policy.sync_target();
        self.action_policy.sync_target();
        self.value.sync_target();
    }

    /// Serialised parameters of all six networks, in checkpoint artifact order
    pub fn snapshots(&self) -> Result<Vec<Vec<u8>>> {
        Ok(vec![
            self.move_policy.snapshot()?,
            self.move_policy.target_snapshot()?,
            self.action_policy.snapshot()?,
            self.action_policy.target_snapshot()?,
            self.value.snapshot()?,
            self.value.target_snapshot()?,
        ])
    }
}

/// [1, state_dim] tensor for a single state, after checking its length
pub(crate) fn state_tensor<BK: Backend>(
    state: &[f32],
    state_dim: usize,
    device: &BK::Device,
) -> Result<Tensor<BK, 2>> {
    if state.len() != state_dim {
        return Err(AgentError::ShapeMismatch {
            expected: state_dim,
            actual: state.len(),
        });
    }
    Ok(Tensor::<BK, 1>::from_floats(state, device).reshape([1, state_dim]))
}

fn check_index(channel: &'static str, index: usize, count: usize) -> Result<()> {
    if index >= count {
        return Err(AgentError::IndexOutOfRange {
            channel,
            index,
            count,
        });
    }
    Ok(())
}

fn distribution<BK: Backend>(logits: Tensor<BK, 2>) -> Result<Vec<f32>> {
    let probs = probabilities(logits)
        .into_data()
        .convert::<f32>()
        .to_vec::<f32>()
        .map_err(|err| AgentError::Approximator(format!("probability readback failed: {err:?}")))?;
    if probs.iter().any(|p| !p.is_finite()) {
        return Err(AgentError::Approximator(format!(
            "policy distribution is not finite: {probs:?}"
        )));
    }
    Ok(probs)
}

fn scalar<BK: Backend>(tensor: Tensor<BK, 1>) -> Result<f32> {
    tensor
        .into_data()
        .convert::<f32>()
        .to_vec::<f32>()
        .map_err(|err| AgentError::Approximator(format!("scalar readback failed: {err:?}")))?
        .first()
        .copied()
        .ok_or_else(|| AgentError::Approximator("empty tensor".to_string()))
}
