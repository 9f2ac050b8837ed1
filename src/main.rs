use anyhow::Result;
use astrobiochem_explorer::{
    app::ExplorerApp,
    cli::Cli,
    config::ExplorerConfig,
    data::fetch::{CatalogSource, FileSource, TapClient},
    state::AppState,
};
use eframe::egui;

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse_args();

    let mut config = ExplorerConfig::load_or_default(cli.config.as_deref())?;
    if let Some(dir) = cli.resources {
        config.resource_dir = Some(dir);
    }

    let source: Box<dyn CatalogSource> = match cli.catalog {
        Some(path) => Box::new(FileSource { path }),
        None => Box::new(TapClient::new()?),
    };

    let mut state = AppState::new(&config, source);
    state.load_catalog();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "AstroBioChem Explorer",
        options,
        Box::new(|cc| {
            // Install image loaders so egui can render molecule pictures.
            egui_extras::install_image_loaders(&cc.egui_ctx);
            Ok(Box::new(ExplorerApp::new(state)))
        }),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}
