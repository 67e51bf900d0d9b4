mod app;
mod capture;
mod config;
mod lifecycle;
mod overlay;
mod preview;

use crate::app::WindowManager;
use crate::config::AppConfig;

use eframe::egui;

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::load();
    log::info!("Starting snipshot (capture delay {} ms)", config.capture_delay_ms);

    // The root window only drives the event loop; every visible window is a
    // child viewport owned by the manager.
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("snipshot")
            .with_inner_size([1.0, 1.0])
            .with_position([0.0, 0.0])
            .with_transparent(true)
            .with_decorations(false)
            .with_taskbar(false)
            .with_mouse_passthrough(true),
        ..Default::default()
    };

    eframe::run_native(
        "snipshot",
        options,
        Box::new(move |cc| {
            let mut visuals = egui::Visuals::dark();
            visuals.panel_fill = egui::Color32::TRANSPARENT;
            cc.egui_ctx.set_visuals(visuals);

            let mut manager = WindowManager::new(config);
            manager.start_capture();
            Ok(Box::new(manager))
        }),
    )
}
