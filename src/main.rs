use clap::Parser;
use vitrine::{config::ViewerArgs, ViewerApp, ViewerConfig};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ViewerConfig::from(ViewerArgs::parse());
    log::info!("Fetching products from {}", config.endpoint);

    ViewerApp::new(config)?.run()?;
    Ok(())
}
