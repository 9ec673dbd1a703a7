mod observation;
mod transition;

pub use observation::{BossContext, GameObservation};
pub use transition::Transition;
