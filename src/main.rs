/*
 * 3D Boid Flock
 *
 * A flock of birds follows a blue leader steered from the keyboard while a
 * chase camera tracks the group. Command line options set the starting
 * parameters; the sliders in the window adjust them while running.
 */

use anyhow::Context;
use clap::Parser;

use boids3d::config::Cli;
use boids3d::{app, logging};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let flock = cli.build_flock().context("invalid starting configuration")?;
    log::info!(
        "starting with {} boids, {} camera, {:?} updates",
        flock.len(),
        flock.camera().mode.label(),
        flock.params().update_mode
    );

    app::run(flock);
    Ok(())
}
