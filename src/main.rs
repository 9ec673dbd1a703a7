use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use burn::backend::{Autodiff, NdArray};
use dotenv::dotenv;
use hornet_agent::planners::rl::{AgentConfig, HornetAgent, TrainingMetrics};
use hornet_agent::state::{BossContext, GameObservation, Transition};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use time::{OffsetDateTime, format_description};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

type TrainBackend = Autodiff<NdArray>;

/// Steps per synthetic episode
const EPISODE_LENGTH: usize = 50;

fn get_env_var<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|val| val.parse::<T>().ok())
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("hornet_agent=debug,info"));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
}

fn config_from_env() -> AgentConfig {
    let mut config = AgentConfig::new(
        get_env_var("HORNET_STATE_DIM").unwrap_or(32),
        get_env_var("HORNET_MOVE_COUNT").unwrap_or(4),
        get_env_var("HORNET_ACTION_COUNT").unwrap_or(7),
    )
    .with_epsilon(
        get_env_var("HORNET_EPSILON").unwrap_or(0.1),
        get_env_var("HORNET_EPSILON_DECREMENT").unwrap_or(0.0),
    )
    .with_learning_rate(get_env_var("HORNET_LEARNING_RATE").unwrap_or(0.001))
    .with_discount_gamma(get_env_var("HORNET_GAMMA").unwrap_or(0.9));

    if let Ok(path) = env::var("HORNET_CHECKPOINT") {
        config = config.with_checkpoint_path(path);
    }
    if let Some(seed) = get_env_var("HORNET_SEED") {
        config = config.with_seed(seed);
    }
    config
}

/// Random frame features and fight layout standing in for the game
fn synthetic_observation(rng: &mut StdRng, state_dim: usize) -> GameObservation {
    let state = (0..state_dim).map(|_| rng.random_range(-1.0..1.0)).collect();
    let context = BossContext::new(
        rng.random_range(0..=99),
        rng.random_range(0.0..40.0),
        rng.random_range(25.0..40.0),
        rng.random_range(0.0..40.0),
        rng.random_bool(0.1),
    );
    GameObservation::new(state, context)
}

/// Rewards keeping a mid-range distance from the hornet
fn synthetic_reward(context: &BossContext) -> f32 {
    1.0 - (context.distance() - 3.5).abs() / 10.0
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    init_logging();

    let config = config_from_env();
    let steps: usize = get_env_var("HORNET_STEPS").unwrap_or(500);
    let sync_every: usize = get_env_var("HORNET_SYNC_EVERY").unwrap_or(100).max(1);
    let save_dir =
        PathBuf::from(env::var("HORNET_SAVE_DIR").unwrap_or_else(|_| "checkpoints".to_string()));

    let state_dim = config.state_dim;
    let gamma = config.discount_gamma;
    let mut sim_rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(1)),
        None => StdRng::from_os_rng(),
    };

    let mut agent = HornetAgent::<TrainBackend>::new(config, Default::default())?;
    let mut metrics = TrainingMetrics::default();

    tracing::info!("Running {} steps, syncing targets every {}", steps, sync_every);

    let mut observation = synthetic_observation(&mut sim_rng, state_dim);
    for step in 1..=steps {
        let decision = agent.sample(&observation)?;
        let next = synthetic_observation(&mut sim_rng, state_dim);
        let reward = synthetic_reward(&next.context);
        let done = step % EPISODE_LENGTH == 0;

        let (movement, action) = decision.pair();
        let transition = Transition::new(
            observation.state.clone(),
            movement,
            action,
            reward,
            next.state.clone(),
            done,
            gamma,
        );
        let losses = agent.train(&transition)?;

        metrics.record_step(&decision, reward, agent.epsilon());
        metrics.record_losses(&losses);

        if step % sync_every == 0 {
            agent.update_target();
            metrics.log_to_console();
        }

        observation = if done {
            synthetic_observation(&mut sim_rng, state_dim)
        } else {
            next
        };
    }

    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    let stamp = now.format(&format_description::parse(
        "[year][month][day]-[hour][minute][second]",
    )?)?;
    agent.save(save_dir.join(format!("hornet-{stamp}")))?;

    tracing::info!(
        "Done: value(s0) = {:.4}",
        agent.value_state(&observation.state)?
    );

    Ok(())
}
