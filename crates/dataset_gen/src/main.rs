//! Dataset generator entry point
//!
//! Resolves configuration (file, then flags), validates it and the catalog
//! before any scene is attempted, then runs the dataset against the headless
//! host.

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use scene_engine::catalog::Vocabulary;
use scene_engine::config::Config;
use scene_engine::core::GeneratorConfig;
use scene_engine::foundation::logging;
use scene_engine::scene::SceneGenerator;

mod cli;
mod dataset;
mod headless;

use cli::Args;
use dataset::DatasetRunner;
use headless::HeadlessHost;

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => GeneratorConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => GeneratorConfig::default(),
    };
    args.apply(&mut config);

    logging::init_with_level(&config.engine.log_level);

    config.validate().context("Invalid configuration")?;

    if let Some(path) = &args.save_config {
        config
            .save_to_file(path)
            .with_context(|| format!("Failed to save config {}", path.display()))?;
        info!("Saved configuration to {}", path.display());
        return Ok(());
    }

    let vocabulary = Vocabulary::load(&config.input).context("Failed to load object catalog")?;
    let generator = SceneGenerator::new(&vocabulary, &config)?;

    let master_seed = config.engine.seed.unwrap_or_else(rand::random);
    info!(
        "Generating {} images from index {} (seed {})",
        config.output.num_images, config.output.start_idx, master_seed
    );

    let today = chrono::Local::now().format("%m/%d/%Y").to_string();
    let runner = DatasetRunner::new(&config, generator, master_seed, today);
    let mut host = HeadlessHost::new(&config.render, master_seed);
    let document = runner.run(&mut host)?;

    info!(
        "Done: {} scenes, {} renders, {} objects left in host",
        document.scenes.len(),
        host.renders(),
        host.object_count()
    );
    Ok(())
}
