mod app;
mod io;
mod model;

use app::{configure_fonts, DesktopApp};

fn main() -> eframe::Result<()> {
    if let Err(err) = io::init_logging() {
        eprintln!("log setup failed: {err:#}");
    }

    let config = io::load_config();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("PDFusion")
            .with_inner_size([1100.0, 800.0]),
        ..Default::default()
    };
    eframe::run_native(
        "PDFusion",
        options,
        Box::new(move |cc| {
            configure_fonts(&cc.egui_ctx, config.font_path.as_deref());
            Box::new(DesktopApp::new(config))
        }),
    )
}
