use std::path::PathBuf;
use std::process::ExitCode;

use tumble_engine::logging::{init_logging, LoggingConfig};
use tumble_engine::renderer::{Renderer, RendererConfig};
use tumble_engine::texture::AssetSource;
use tumble_engine::window::{Runtime, RuntimeConfig};

/// Asset directory: first CLI argument, else the one shipped with this crate.
fn asset_root() -> PathBuf {
    std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/assets")))
}

fn run() -> anyhow::Result<()> {
    let config = RendererConfig {
        assets: AssetSource::new(asset_root()),
        ..RendererConfig::default()
    };
    log::info!("assets from {}", config.assets.root().display());

    let runtime = RuntimeConfig {
        title: "tumble".to_string(),
        ..RuntimeConfig::default()
    };
    Runtime::run(runtime, Renderer::new(config))
}

fn main() -> ExitCode {
    init_logging(LoggingConfig::default());

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("tumble-viewer exited with error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
