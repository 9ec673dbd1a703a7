//! Hornet agent: exploration, learning and checkpointing behind one facade

use std::path::{Path, PathBuf};

use burn::tensor::backend::AutodiffBackend;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use crate::error::{AgentError, Result};
use crate::planners::heuristic::BossHeuristic;
use crate::state::{BossContext, GameObservation, Transition};

use super::exploration::{Epsilon, Source};
use super::learner::{ActorCritic, UpdateLosses};
use super::policy::{NetworkConfig, sample_index};

/// Agent configuration
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Length of every state vector
    pub state_dim: usize,
    /// Number of discrete moves
    pub move_count: usize,
    /// Number of discrete actions
    pub action_count: usize,
    /// Starting exploration threshold
    pub initial_epsilon: f64,
    /// Amount epsilon drops per resolved channel
    pub epsilon_decrement: f64,
    /// Adam learning rate for all three local networks
    pub learning_rate: f64,
    /// Discount factor callers use when building transitions
    pub discount_gamma: f32,
    /// Checkpoint prefix loaded at construction, if any
    pub checkpoint_path: Option<PathBuf>,
    /// Hidden stack of the networks
    pub network: NetworkConfig,
    /// Seed for exploration draws
    pub seed: Option<u64>,
}

impl AgentConfig {
    pub fn new(state_dim: usize, move_count: usize, action_count: usize) -> Self {
        Self {
            state_dim,
            move_count,
            action_count,
            initial_epsilon: 0.1,
            epsilon_decrement: 0.0,
            learning_rate: 0.001,
            discount_gamma: 0.9,
            checkpoint_path: None,
            network: NetworkConfig::default(),
            seed: None,
        }
    }

    pub fn with_epsilon(mut self, initial: f64, decrement: f64) -> Self {
        self.initial_epsilon = initial;
        self.epsilon_decrement = decrement;
        self
    }

    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_discount_gamma(mut self, gamma: f32) -> Self {
        self.discount_gamma = gamma;
        self
    }

    pub fn with_checkpoint_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.checkpoint_path = Some(path.into());
        self
    }

    pub fn with_network(mut self, network: NetworkConfig) -> Self {
        self.network = network;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: &str| Err(AgentError::Configuration(msg.to_string()));

        if self.state_dim == 0 {
            return invalid("state_dim must be > 0");
        }
        if self.move_count == 0 {
            return invalid("move_count must be > 0");
        }
        if self.action_count == 0 {
            return invalid("action_count must be > 0");
        }
        if !self.initial_epsilon.is_finite() || self.initial_epsilon < 0.0 {
            return invalid("initial_epsilon must be a finite value >= 0");
        }
        if !self.epsilon_decrement.is_finite() || self.epsilon_decrement < 0.0 {
            return invalid("epsilon_decrement must be a finite value >= 0");
        }
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return invalid("learning_rate must be > 0");
        }
        if !(0.0..=1.0).contains(&self.discount_gamma) {
            return invalid("discount_gamma must be in [0, 1]");
        }
        if self.network.hidden_size == 0 || self.network.num_layers == 0 {
            return invalid("network needs at least one hidden layer of non-zero width");
        }
        Ok(())
    }
}

/// Move and action chosen for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub movement: usize,
    pub action: usize,
    pub movement_source: Source,
    pub action_source: Source,
}

impl Decision {
    /// `(move_index, action_index)`
    pub fn pair(&self) -> (usize, usize) {
        (self.movement, self.action)
    }
}

/// Dual-actor, single-critic agent with a heuristic exploration fallback.
///
/// Access must be serialised by the caller; the agent owns all of its state
/// and does no internal locking.
pub struct HornetAgent<B: AutodiffBackend, R: Rng = StdRng> {
    config: AgentConfig,
    networks: ActorCritic<B>,
    heuristic: BossHeuristic,
    epsilon: Epsilon,
    rng: R,
}

impl<B: AutodiffBackend> HornetAgent<B, StdRng> {
    /// Build an agent drawing from a seeded or OS-seeded `StdRng`
    pub fn new(config: AgentConfig, device: B::Device) -> Result<Self> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::with_rng(config, device, rng)
    }
}

impl<B: AutodiffBackend, R: Rng> HornetAgent<B, R> {
    /// Build an agent around an explicit random source.
    ///
    /// Loads `config.checkpoint_path` when set; an incomplete checkpoint is
    /// skipped and the fresh networks are kept.
    pub fn with_rng(config: AgentConfig, device: B::Device, rng: R) -> Result<Self> {
        config.validate()?;

        let mut agent = Self {
            networks: ActorCritic::new(&config, device),
            heuristic: BossHeuristic::new(config.move_count, config.action_count),
            epsilon: Epsilon::new(config.initial_epsilon, config.epsilon_decrement),
            rng,
            config,
        };

        if let Some(path) = agent.config.checkpoint_path.clone() {
            agent.load(&path)?;
        }

        info!(
            state_dim = agent.config.state_dim,
            moves = agent.config.move_count,
            actions = agent.config.action_count,
            epsilon = agent.epsilon.value(),
            "agent ready"
        );
        Ok(agent)
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn networks(&self) -> &ActorCritic<B> {
        &self.networks
    }

    /// Current exploration threshold
    pub fn epsilon(&self) -> f64 {
        self.epsilon.value()
    }

    /// Choose a move and an action for this tick
    pub fn sample(&mut self, observation: &GameObservation) -> Result<Decision> {
        self.sample_state(&observation.state, &observation.context)
    }

    /// Choose a move and an action from a raw state and its fight context.
    ///
    /// Both policies propose first; each channel then draws against epsilon
    /// and falls back to the heuristic, decaying epsilon once per channel.
    pub fn sample_state(&mut self, state: &[f32], ctx: &BossContext) -> Result<Decision> {
        let move_probs = self.networks.move_probabilities(state)?;
        let action_probs = self.networks.action_probabilities(state)?;
        let proposed_move = sample_index(&move_probs, self.rng.random());
        let proposed_action = sample_index(&action_probs, self.rng.random());

        let heuristic = self.heuristic;
        let (movement, movement_source) =
            self.epsilon.resolve(&mut self.rng, "move", proposed_move, |_| {
                heuristic.choose_move(ctx)
            });
        let (action, action_source) =
            self.epsilon.resolve(&mut self.rng, "action", proposed_action, |rng| {
                heuristic.choose_action(ctx, rng)
            });

        Ok(Decision {
            movement,
            action,
            movement_source,
            action_source,
        })
    }

    /// One actor-critic update from a transition
    pub fn train(&mut self, transition: &Transition) -> Result<UpdateLosses> {
        self.networks.update(transition)
    }

    /// Local critic's estimate of `state`
    pub fn value_state(&self, state: &[f32]) -> Result<f32> {
        self.networks.value_state(state)
    }

    /// Hard-copy all local networks into their targets
    pub fn update_target(&mut self) {
        self.networks.sync_targets();
        info!("Target networks synchronised");
    }

    /// Save all six networks under `prefix`
    pub fn save(&self, prefix: impl AsRef<Path>) -> Result<()> {
        self.networks.save(prefix.as_ref())
    }

    /// Load all six networks from `prefix`; returns false if the set was incomplete
    pub fn load(&mut self, prefix: impl AsRef<Path>) -> Result<bool> {
        self.networks.load(prefix.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planners::heuristic::{MID_RANGE_ACTIONS, MOVE_LEFT};
    use crate::planners::rl::exploration::EPSILON_FLOOR;
    use burn::backend::{Autodiff, NdArray};
    use rand::RngCore;
    use tempfile::TempDir;

    type TestBackend = Autodiff<NdArray>;

    const STATE_DIM: usize = 6;

    /// Random source returning the same word forever
    struct ConstantRng(u64);

    impl RngCore for ConstantRng {
        fn next_u32(&mut self) -> u32 {
            self.0 as u32
        }

        fn next_u64(&mut self) -> u64 {
            self.0
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            for (i, byte) in dest.iter_mut().enumerate() {
                *byte = self.0.to_le_bytes()[i % 8];
            }
        }
    }

    fn config() -> AgentConfig {
        AgentConfig::new(STATE_DIM, 4, 7).with_network(NetworkConfig::new(16, 1))
    }

    fn far_context() -> BossContext {
        // hornet_x = 0, player_x = 10
        BossContext::new(10, 0.0, 0.0, 10.0, false)
    }

    fn state() -> Vec<f32> {
        vec![0.25; STATE_DIM]
    }

    #[test]
    fn test_zero_draw_always_uses_heuristic() {
        let mut agent =
            HornetAgent::<TestBackend, _>::with_rng(config(), Default::default(), ConstantRng(0))
                .unwrap();

        for _ in 0..5 {
            let decision = agent.sample_state(&state(), &far_context()).unwrap();
            assert_eq!(decision.movement_source, Source::Heuristic);
            assert_eq!(decision.action_source, Source::Heuristic);
            assert_eq!(decision.movement, MOVE_LEFT);
            assert!(MID_RANGE_ACTIONS.contains(&decision.action));
        }
    }

    #[test]
    fn test_maximal_draw_always_uses_policy() {
        let mut agent = HornetAgent::<TestBackend, _>::with_rng(
            config().with_epsilon(0.9, 0.0),
            Default::default(),
            ConstantRng(u64::MAX),
        )
        .unwrap();

        // rand maps an all-ones word to the largest float below 1
        let draw = 1.0 - 2f32.powi(-24);
        let expected_move =
            sample_index(&agent.networks().move_probabilities(&state()).unwrap(), draw);
        let expected_action =
            sample_index(&agent.networks().action_probabilities(&state()).unwrap(), draw);

        for _ in 0..5 {
            let decision = agent.sample_state(&state(), &far_context()).unwrap();
            assert_eq!(decision.movement_source, Source::Policy);
            assert_eq!(decision.action_source, Source::Policy);
            assert_eq!(decision.pair(), (expected_move, expected_action));
        }
    }

    #[test]
    fn test_epsilon_decays_twice_per_decision() {
        let initial = 0.1;
        let decrement = 0.004;
        let mut agent = HornetAgent::<TestBackend>::new(
            config().with_epsilon(initial, decrement).with_seed(11),
            Default::default(),
        )
        .unwrap();

        for n in 1..=20usize {
            agent.sample_state(&state(), &far_context()).unwrap();
            let expected = (initial - 2.0 * n as f64 * decrement).max(EPSILON_FLOOR);
            assert!((agent.epsilon() - expected).abs() < 1e-12, "after {n} calls");
        }
        assert_eq!(agent.epsilon(), EPSILON_FLOOR);
    }

    #[test]
    fn test_decisions_stay_in_range() {
        let mut agent = HornetAgent::<TestBackend>::new(
            config().with_epsilon(0.5, 0.0).with_seed(3),
            Default::default(),
        )
        .unwrap();

        for step in 0..50 {
            let player_x = step as f32 * 0.5;
            let ctx = BossContext::new(step * 3, 0.0, step as f32, player_x, step % 7 == 0);
            let decision = agent.sample_state(&state(), &ctx).unwrap();
            assert!(decision.movement < 4);
            assert!(decision.action < 7);
        }
    }

    #[test]
    fn test_sample_rejects_wrong_shape() {
        let mut agent = HornetAgent::<TestBackend>::new(config(), Default::default()).unwrap();
        let result = agent.sample_state(&[0.0; 3], &far_context());
        assert!(matches!(
            result,
            Err(AgentError::ShapeMismatch { expected: STATE_DIM, actual: 3 })
        ));
    }

    #[test]
    fn test_non_finite_policy_output_is_surfaced() {
        let mut agent = HornetAgent::<TestBackend, _>::with_rng(
            config().with_epsilon(0.03, 0.01),
            Default::default(),
            ConstantRng(u64::MAX),
        )
        .unwrap();

        let result = agent.sample_state(&[f32::NAN; STATE_DIM], &far_context());

        assert!(matches!(result, Err(AgentError::Approximator(_))));
        assert_eq!(agent.epsilon(), 0.03);
    }

    #[test]
    fn test_invalid_configuration() {
        for bad in [
            AgentConfig::new(0, 4, 7),
            AgentConfig::new(6, 0, 7),
            AgentConfig::new(6, 4, 0),
            AgentConfig::new(6, 4, 7).with_learning_rate(0.0),
            AgentConfig::new(6, 4, 7).with_epsilon(f64::NAN, 0.0),
            AgentConfig::new(6, 4, 7).with_discount_gamma(1.5),
        ] {
            assert!(matches!(
                HornetAgent::<TestBackend>::new(bad, Default::default()),
                Err(AgentError::Configuration(_))
            ));
        }
    }

    #[test]
    fn test_train_then_update_target() {
        let mut agent =
            HornetAgent::<TestBackend>::new(config().with_seed(1), Default::default()).unwrap();
        let decision = agent.sample_state(&state(), &far_context()).unwrap();
        let (movement, action) = decision.pair();

        let transition = Transition::new(
            state(),
            movement,
            action,
            1.0,
            vec![0.5; STATE_DIM],
            false,
            agent.config().discount_gamma,
        );
        let losses = agent.train(&transition).unwrap();
        assert!(losses.value_loss >= 0.0);

        agent.update_target();
        let snapshots = agent.networks().snapshots().unwrap();
        assert_eq!(snapshots[0], snapshots[1]);
        assert_eq!(snapshots[2], snapshots[3]);
        assert_eq!(snapshots[4], snapshots[5]);
    }

    #[test]
    fn test_checkpoint_path_loaded_at_construction() {
        let dir = TempDir::new().unwrap();
        let prefix = dir.path().join("hornet");

        let mut trained =
            HornetAgent::<TestBackend>::new(config().with_seed(5), Default::default()).unwrap();
        let transition = Transition::new(state(), 0, 6, -1.0, state(), true, 0.9);
        trained.train(&transition).unwrap();
        trained.save(&prefix).unwrap();

        let restored = HornetAgent::<TestBackend>::new(
            config().with_checkpoint_path(&prefix),
            Default::default(),
        )
        .unwrap();

        assert_eq!(
            trained.value_state(&state()).unwrap(),
            restored.value_state(&state()).unwrap()
        );
        assert_eq!(
            trained.networks().action_probabilities(&state()).unwrap(),
            restored.networks().action_probabilities(&state()).unwrap()
        );
    }

    #[test]
    fn test_missing_checkpoint_path_keeps_fresh_networks() {
        let dir = TempDir::new().unwrap();
        let agent = HornetAgent::<TestBackend>::new(
            config().with_checkpoint_path(dir.path().join("nothing-here")),
            Default::default(),
        );
        assert!(agent.is_ok());
    }
}
