//! Reinforcement Learning planner: two actors and one critic
//!
//! The agent picks a move and an action every tick and learns from one
//! transition at a time with a TD(0) advantage actor-critic update.
//!
//! # Architecture
//!
//! ```text
//! GameObservation (state + BossContext)
//!     │
//!     ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  ActorCritic                                                │
//! │  - Move policy:   state → move logits     (local + target)  │
//! │  - Action policy: state → action logits   (local + target)  │
//! │  - Value:         state → V(s)            (local + target)  │
//! └─────────────────────────────────────────────────────────────┘
//!     │ proposals
//!     ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Epsilon                                                    │
//! │  - Per channel: keep proposal if draw > ε, else heuristic   │
//! │  - ε decays once per channel, floored at 0.03               │
//! └─────────────────────────────────────────────────────────────┘
//!     │
//!     ▼
//! Decision (move, action)
//!
//! Transition ──► ActorCritic::update
//!   td = r + γ·V(s') − V(s)     (r alone on terminal steps)
//!   value loss = td², actor loss = −log π(a|s) · detach(td)
//! ```

pub mod agent;
pub mod approximator;
pub mod checkpoint;
pub mod exploration;
pub mod learner;
pub mod metrics;
pub mod policy;

pub use agent::{AgentConfig, Decision, HornetAgent};
pub use approximator::ApproximatorPair;
pub use checkpoint::Artifact;
pub use exploration::{EPSILON_FLOOR, Epsilon, Source};
pub use learner::{ActorCritic, UpdateLosses};
pub use metrics::{MovingAverage, TrainingMetrics};
pub use policy::{NetworkConfig, PolicyNet, PolicyNetwork, ValueNet, ValueNetwork};
