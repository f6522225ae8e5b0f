//! Solo 8 v2 vanilla with realtime control.
//!
//! There is no notion of a timestep in this environment: a step sends position
//! setpoints to the joint controllers of the robot, like commanding a real one.
//! Joint positions are read from stdin; exit with ^D.
use anyhow::Result;
use clap::Parser;
use gym_solo_core::{Env as _, SoloConfig};
use gym_solo_env::{make, KinematicClient, TorsoImu, SOLO8_VANILLA_REALTIME};
use log::info;
use ndarray::Array1;
use std::io::{self, BufRead, Write};

#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Simulation configuration in YAML.
    #[arg(long)]
    config: Option<String>,

    /// Opens an interactive session.
    #[arg(long, default_value_t = false)]
    gui: bool,

    /// Reports the IMU angles in degrees.
    #[arg(long, default_value_t = false)]
    degrees: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = match args.config.as_ref() {
        Some(path) => SoloConfig::load(path)?,
        None => SoloConfig::default(),
    };
    let mut env = make::<KinematicClient>(SOLO8_VANILLA_REALTIME, config, args.gui)?;
    let robot = env.robot().expect("robot is loaded at construction");
    env.register_observation(TorsoImu::new(robot).degrees(args.degrees))?;
    let n_joints = env.action_space()?.len();

    info!("Solo 8 v2 Vanilla Realtime Simulation active, exit with ^D");
    env.reset()?;

    let stdin = io::stdin();
    loop {
        print!("Which position do you want to set all the joints to?: ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let pos: f64 = match line.trim().parse() {
            Ok(v) => v,
            Err(e) => {
                info!("Not a number ({}), try again", e);
                continue;
            }
        };

        let act = Array1::from_elem(n_joints, pos);
        let (step, _) = env.step(&act)?;
        for (label, value) in step.info.labels.iter().zip(step.obs.iter()) {
            info!("{} = {:.4}", label, value);
        }
        info!("reward = {:.4}", step.reward);
    }

    env.close()
}
