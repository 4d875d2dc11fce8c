use crate::image_loader::interface::{Frame, ImageLoadError, ImageLoader, ImageSource};
use crate::library::logger::interface::Logger;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Reads local files and fetches `http(s)` URLs. Anything else typed into
/// the URL field is treated as a local path.
pub struct ImageLoaderFsHttp {
    client: reqwest::blocking::Client,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl ImageLoaderFsHttp {
    pub fn new(
        timeout: Duration,
        logger: Arc<dyn Logger + Send + Sync>,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            logger: logger.with_namespace("image_loader"),
        })
    }

    fn fetch(&self, url: &str) -> Result<Vec<u8>, ImageLoadError> {
        let to_error = |e: reqwest::Error| ImageLoadError::Fetch {
            url: url.to_string(),
            reason: e.to_string(),
        };

        let response = self
            .client
            .get(url)
            .send()
            .and_then(|response| response.error_for_status())
            .map_err(to_error)?;

        Ok(response.bytes().map_err(to_error)?.to_vec())
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>, ImageLoadError> {
        std::fs::read(path).map_err(|e| ImageLoadError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }
}

impl ImageLoader for ImageLoaderFsHttp {
    fn load(&self, source: &ImageSource) -> Result<Frame, ImageLoadError> {
        let _ = self.logger.info(&format!("Loading image {}", source));

        let bytes = match source {
            ImageSource::File(path) => self.read(path)?,
            ImageSource::Url(url) => match classify_url(url) {
                UrlKind::Remote => self.fetch(url)?,
                UrlKind::Local(path) => self.read(&path)?,
            },
        };

        decode(&bytes)
    }
}

enum UrlKind {
    Remote,
    Local(PathBuf),
}

fn classify_url(url: &str) -> UrlKind {
    let lower = url.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        UrlKind::Remote
    } else if let Some(path) = url.strip_prefix("file://") {
        UrlKind::Local(PathBuf::from(path))
    } else {
        UrlKind::Local(PathBuf::from(url))
    }
}

pub fn decode(bytes: &[u8]) -> Result<Frame, ImageLoadError> {
    let image =
        image::load_from_memory(bytes).map_err(|e| ImageLoadError::Decode(e.to_string()))?;
    let frame = Frame::new(image);

    if !frame.has_pixels() {
        return Err(ImageLoadError::EmptyImage);
    }

    Ok(frame)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::logger::impl_fake::LoggerFake;
    use image::{DynamicImage, ImageFormat};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let mut bytes = Vec::new();
        DynamicImage::new_rgb8(width, height)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    fn loader() -> ImageLoaderFsHttp {
        ImageLoaderFsHttp::new(Duration::from_secs(1), Arc::new(LoggerFake::new())).unwrap()
    }

    #[test]
    fn test_decode_png() {
        let frame = decode(&png_bytes(3, 2)).unwrap();

        assert_eq!((frame.width(), frame.height()), (3, 2));
    }

    #[test]
    fn test_decode_garbage_fails() {
        assert!(matches!(
            decode(b"definitely not an image"),
            Err(ImageLoadError::Decode(_))
        ));
    }

    #[test]
    fn test_load_local_file_through_url_field() {
        let path = std::env::temp_dir().join(format!(
            "image-identifier-loader-{}.png",
            std::process::id()
        ));
        std::fs::write(&path, png_bytes(5, 5)).unwrap();

        let from_file = loader().load(&ImageSource::File(path.clone())).unwrap();
        let from_url = loader()
            .load(&ImageSource::Url(format!("file://{}", path.display())))
            .unwrap();

        assert_eq!(from_file.width(), 5);
        assert_eq!(from_url.height(), 5);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_missing_file_is_a_read_error() {
        let result = loader().load(&ImageSource::File(PathBuf::from("./no/such/image.png")));

        assert!(matches!(result, Err(ImageLoadError::Read { .. })));
    }
}
