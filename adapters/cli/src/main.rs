#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Robot Merge experience.

mod config;
mod simulation;

use anyhow::Result;
use clap::Parser;
use log::info;
use robot_merge_rendering::{BoardLayout, Color, Presentation, RenderingBackend};
use robot_merge_rendering_macroquad::MacroquadBackend;

use crate::{
    config::{Args, GameConfig},
    simulation::Simulation,
};

const WINDOW_TITLE: &str = "Robot Merge";
const CLEAR_COLOR: Color = Color::from_rgb_u8(0xf5, 0xf5, 0xf5);

/// Entry point for the Robot Merge command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = GameConfig::resolve(&args)?;
    info!("starting with {config:?}");

    let mut simulation = Simulation::new(&config, BoardLayout::default());
    info!("{}", simulation.welcome_banner());

    let presentation = Presentation::new(WINDOW_TITLE, CLEAR_COLOR, simulation.scene());
    MacroquadBackend::new()
        .with_vsync(config.vsync)
        .with_show_fps(config.show_fps)
        .run(presentation, move |dt, input, scene| {
            simulation.advance(dt, input, scene);
        })
}
