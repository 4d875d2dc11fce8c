use config::Config;
use image_classifier::impl_tract_onnx::ModelProviderTractOnnx;
use image_identifier::core::Msg;
use image_identifier::headless::run_headless;
use image_identifier::main::ImageIdentifier;
use image_loader::impl_fs_http::ImageLoaderFsHttp;
use library::logger::impl_console::LoggerConsole;
use std::sync::Arc;
use view::impl_console::ViewConsole;
use view::impl_gui::GuiApp;

mod config;
mod image_classifier;
mod image_identifier;
mod image_loader;
mod library;
mod view;

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = Config::from_env()?;

    let logger = Arc::new(LoggerConsole::new(config.logger_timezone));

    let model_provider = Arc::new(ModelProviderTractOnnx::new(
        config.model.clone(),
        logger.clone(),
    ));

    let image_loader = Arc::new(ImageLoaderFsHttp::new(config.http_timeout, logger.clone())?);

    let identifier = ImageIdentifier::new(logger, model_provider, image_loader);

    if config.headless {
        let mut view = ViewConsole::new();
        return run_headless(&identifier, &mut view, &config.images, None);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_title("Image Identification"),
        ..Default::default()
    };

    let gui_identifier = identifier.clone();
    let images = config.images.clone();
    eframe::run_native(
        "Image Identification",
        options,
        Box::new(move |cc| Box::new(GuiApp::new(cc, gui_identifier, &images))),
    )
    .map_err(|e| e.to_string())?;

    identifier.dispatch(Msg::Shutdown);

    Ok(())
}
