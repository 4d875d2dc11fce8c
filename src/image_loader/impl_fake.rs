use crate::image_loader::interface::{Frame, ImageLoadError, ImageLoader, ImageSource};
use image::DynamicImage;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Every source decodes to a small blank image unless told otherwise.
#[derive(Default)]
pub struct ImageLoaderFake {
    outcomes: Mutex<HashMap<ImageSource, Result<Frame, ImageLoadError>>>,
    calls: AtomicUsize,
}

impl ImageLoaderFake {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, source: ImageSource, outcome: Result<Frame, ImageLoadError>) {
        if let Ok(mut outcomes) = self.outcomes.lock() {
            outcomes.insert(source, outcome);
        }
    }

    pub fn fail(&self, source: ImageSource) {
        self.set(
            source,
            Err(ImageLoadError::Decode("fake decode failure".to_string())),
        );
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ImageLoader for ImageLoaderFake {
    fn load(&self, source: &ImageSource) -> Result<Frame, ImageLoadError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let outcome = self
            .outcomes
            .lock()
            .map_err(|e| ImageLoadError::Decode(e.to_string()))?
            .get(source)
            .cloned();

        outcome.unwrap_or_else(|| Ok(Frame::new(DynamicImage::new_rgb8(8, 8))))
    }
}
