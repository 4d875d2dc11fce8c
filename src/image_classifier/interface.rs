use image::DynamicImage;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub label: String,
    pub confidence: f32,
}

#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[error("failed to load model: {0}")]
    ModelLoad(String),

    #[error("failed to read labels: {0}")]
    Labels(String),

    #[error("classification failed: {0}")]
    Classification(String),
}

/// Scores a fully decoded image. Results come back ordered by descending
/// confidence.
pub trait ImageClassifier {
    fn classify(&self, image: &DynamicImage) -> Result<Vec<Classification>, ClassifierError>;
}

/// Acquires the compute backend and loads a classifier. Called at most once
/// per session.
pub trait ModelProvider {
    fn load(&self) -> Result<ModelHandle, ClassifierError>;
}

/// Shared reference to a loaded classifier. Two handles are equal when they
/// point at the same loaded model.
#[derive(Clone)]
pub struct ModelHandle(pub Arc<dyn ImageClassifier + Send + Sync>);

impl ModelHandle {
    pub fn new(classifier: impl ImageClassifier + Send + Sync + 'static) -> Self {
        Self(Arc::new(classifier))
    }

    pub fn classify(&self, image: &DynamicImage) -> Result<Vec<Classification>, ClassifierError> {
        self.0.classify(image)
    }
}

impl PartialEq for ModelHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ModelHandle(..)")
    }
}
