//! Runs episodes of Solo 8 v2 vanilla with random joint setpoints and writes
//! the per-step records to a CSV file.
use anyhow::Result;
use gym_solo_core::{
    record::Record, Env as _, SoloConfig, TimeBasedTermination, TimestepPolicy,
};
use gym_solo_env::{
    make, HomePositionReward, KinematicClient, MotorEncoder, TorsoImu, SOLO8_VANILLA,
};
use log::info;
use serde::Serialize;
use std::{convert::TryFrom, fs::File};

const N_EPISODES: usize = 3;
const MAX_STEPS: usize = 50;
const SEED: u64 = 42;

#[derive(Debug, Serialize)]
struct Solo8Record {
    episode: usize,
    step: usize,
    reward: f64,
    obs: Vec<f64>,
}

impl Solo8Record {
    fn new(episode: usize, step: usize, record: &Record) -> Result<Self> {
        let mut r = Self::try_from(record)?;
        r.episode = episode;
        r.step = step;
        Ok(r)
    }
}

impl TryFrom<&Record> for Solo8Record {
    type Error = anyhow::Error;

    fn try_from(record: &Record) -> Result<Self> {
        Ok(Self {
            episode: 0,
            step: 0,
            reward: record.get_scalar("reward")?,
            obs: record.get_array1("obs")?,
        })
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = SoloConfig::default().timestep(TimestepPolicy::Fixed {
        dt: 1e-3,
        substeps: 20,
    });
    let mut env = make::<KinematicClient>(SOLO8_VANILLA, config, false)?;
    let robot = env.robot().expect("robot is loaded at construction");
    env.register_observation(TorsoImu::new(robot))?;
    env.register_observation(MotorEncoder::new(robot))?;
    env.register_reward(0.5, HomePositionReward::new(robot));
    env.register_termination(TimeBasedTermination::new(MAX_STEPS));
    env.seed(SEED);

    // Vec<_> field in a struct does not support writing a header in csv crate, so disable it.
    let path = std::env::temp_dir().join("random_solo8_eval.csv");
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(File::create(&path)?);

    for episode in 0..N_EPISODES {
        env.reset()?;
        let mut r_total = 0.0;
        let mut step_ix = 0;

        loop {
            let act = env.sample_action()?;
            let (step, record) = env.step(&act)?;
            r_total += step.reward;
            wtr.serialize(Solo8Record::new(episode, step_ix, &record)?)?;

            if step.is_done() {
                break;
            }
            step_ix += 1;
        }

        info!("Episode {}, {} steps, reward = {:.3}", episode, step_ix, r_total);
    }

    wtr.flush()?;
    info!("Records written to {:?}", path);
    env.close()
}
