use image::DynamicImage;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Decoded pixels, shared by reference between the controller, the view
/// and the classifier.
#[derive(Clone)]
pub struct Frame(pub Arc<DynamicImage>);

impl Frame {
    pub fn new(image: DynamicImage) -> Self {
        Self(Arc::new(image))
    }

    pub fn image(&self) -> &DynamicImage {
        &self.0
    }

    pub fn width(&self) -> u32 {
        self.0.width()
    }

    pub fn height(&self) -> u32 {
        self.0.height()
    }

    pub fn has_pixels(&self) -> bool {
        self.width() > 0 && self.height() > 0
    }
}

impl PartialEq for Frame {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Frame({}x{})", self.width(), self.height())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ImageSource {
    Url(String),
    File(PathBuf),
}

impl fmt::Display for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageSource::Url(url) => f.write_str(url),
            ImageSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ImageLoadError {
    #[error("failed to read {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("failed to decode image: {0}")]
    Decode(String),

    #[error("image has no pixels")]
    EmptyImage,

    #[error("{0} has been revoked")]
    Revoked(String),
}

pub trait ImageLoader {
    fn load(&self, source: &ImageSource) -> Result<Frame, ImageLoadError>;
}
