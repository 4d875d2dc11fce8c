use crate::image_identifier::render::Screen;
use std::error::Error;

/// Somewhere a rendered screen can be shown.
pub trait View {
    fn show(&mut self, screen: &Screen) -> Result<(), Box<dyn Error + Send + Sync>>;
}
