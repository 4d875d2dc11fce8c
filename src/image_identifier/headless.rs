use super::core::{ModelStatus, Msg};
use super::main::ImageIdentifier;
use super::render::render;
use crate::view::interface::View;
use std::path::Path;
use std::time::Duration;

/// Drives the controller without a window: every image is selected,
/// identified and its screen shown, one after the other.
pub fn run_headless(
    identifier: &ImageIdentifier,
    view: &mut dyn View,
    images: &[String],
    timeout: Option<Duration>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    identifier.start();
    view.show(&render(&identifier.snapshot()))?;

    identifier.run_until(timeout, |model| !model.is_model_loading());
    if let ModelStatus::Failed(reason) = identifier.snapshot().model_status {
        view.show(&render(&identifier.snapshot()))?;
        return Err(format!("model failed to load: {}", reason).into());
    }

    for image in images {
        identifier.dispatch(select_image(image));
        identifier.run_until(timeout, |model| model.is_image_settled());

        identifier.dispatch(Msg::IdentifyClicked);
        identifier.run_until(timeout, |model| model.in_flight.is_none());

        view.show(&render(&identifier.snapshot()))?;
    }

    identifier.dispatch(Msg::Shutdown);

    Ok(())
}

/// Existing local files go through the file picker path, anything else is
/// typed into the URL field.
pub fn select_image(image: &str) -> Msg {
    if Path::new(image).is_file() {
        Msg::FileChosen(Some(image.into()))
    } else {
        Msg::UrlInputChanged(image.to_string())
    }
}
