use crate::image_identifier::render::Screen;
use crate::view::interface::View;
use std::error::Error;

#[derive(Default)]
pub struct ViewFake {
    pub screens: Vec<Screen>,
}

impl ViewFake {
    pub fn new() -> Self {
        Self::default()
    }
}

impl View for ViewFake {
    fn show(&mut self, screen: &Screen) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.screens.push(screen.clone());
        Ok(())
    }
}
