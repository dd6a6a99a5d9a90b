pub mod cli;
pub mod config;
pub mod constants;
pub mod db;
pub mod domain;
pub mod entities;
pub mod services;
pub mod validation;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
pub use config::Config;
use config::GeneralConfig;
use db::Store;

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::load()?;
    config.validate()?;

    init_tracing(&config.general);

    let Some(command) = cli.command else {
        use clap::CommandFactory;
        Cli::command().print_help()?;
        return Ok(());
    };

    if matches!(command, Commands::Init) {
        return cli::cmd_init();
    }

    let store = Store::from_config(&config.general).await?;

    // `seed` reports its own counts
    if config.seed.run_on_startup && !matches!(command, Commands::Seed) {
        store.ensure_seed_data(&config.seed).await?;
    }

    info!("SGP ready");
    cli::dispatch(&config, &store, command).await
}

fn init_tracing(general: &GeneralConfig) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&general.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);

    if general.log_format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
