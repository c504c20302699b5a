use motionview::ViewerConfig;

fn main() -> anyhow::Result<()> {
    motionview::logging::init();

    let mut config = ViewerConfig::default();
    if let Some(asset_root) = std::env::args().nth(1) {
        config = config.with_asset_root(asset_root);
    }
    log::info!("Loading assets from {}", config.asset_root.display());

    motionview::run(config)
}
