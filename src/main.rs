use anyhow::Result;
use eframe::egui;

use poly_keys::app::KeyboardApp;
use poly_keys::config::AppConfig;

fn main() -> Result<()> {
    env_logger::init();
    log::info!("starting poly-keys");

    let config = AppConfig::from_env().unwrap_or_else(|err| {
        log::warn!("ignoring invalid configuration: {}", err);
        AppConfig::default()
    });
    log::debug!("config: {:?}", config);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([900.0, 640.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Poly Keys",
        options,
        Box::new(move |_cc| Ok(Box::new(KeyboardApp::new(config)))),
    )
    .map_err(|e| anyhow::anyhow!("application error: {}", e))
}
