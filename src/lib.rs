//! Decision-and-learning engine for a boss-fight agent.
//!
//! Each tick the agent picks a move and an action, blending a learned
//! actor-critic policy with a rule-based fallback, and learns from one
//! transition at a time.
//!
//! - [`planners::heuristic`]: distance and soul driven fallback rules
//! - [`planners::rl`]: networks, exploration, update, target sync, checkpoints
//! - [`state`]: observations and transitions
//! - [`error`]: error taxonomy

pub mod error;
pub mod planners;
pub mod state;

pub use error::{AgentError, Result};
pub use planners::heuristic::BossHeuristic;
pub use planners::rl::{AgentConfig, Decision, HornetAgent, UpdateLosses};
pub use state::{BossContext, GameObservation, Transition};
