use crate::image_classifier::interface::{
    Classification, ClassifierError, ImageClassifier, ModelHandle, ModelProvider,
};
use crate::library::logger::interface::Logger;
use image::DynamicImage;
use rand::distr::{Distribution, Uniform};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Answers from a script of queued responses, falling back to random labels
/// once the script runs out.
pub struct ImageClassifierFake {
    logger: Arc<dyn Logger + Send + Sync>,
    script: Mutex<VecDeque<Result<Vec<Classification>, String>>>,
    calls: AtomicUsize,
}

impl ImageClassifierFake {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            logger: logger.with_namespace("image_classifier").with_namespace("fake"),
            script: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn respond_with(&self, response: Result<Vec<Classification>, String>) {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(response);
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn random_classifications(&self) -> Result<Vec<Classification>, ClassifierError> {
        let objects = [
            "dog", "cat", "person", "car", "chair", "table", "bird", "tree", "bicycle", "book",
            "laptop", "phone", "cup", "bottle", "keyboard", "mouse", "plant", "clock",
        ];

        let mut rng = rand::rng();
        let index_dist = Uniform::new(0, objects.len())
            .map_err(|e| ClassifierError::Classification(e.to_string()))?;
        let confidence_dist = Uniform::new(0.0f32, 1.0f32)
            .map_err(|e| ClassifierError::Classification(e.to_string()))?;

        let mut classifications: Vec<Classification> = (0..3)
            .map(|_| Classification {
                label: objects[index_dist.sample(&mut rng)].to_string(),
                confidence: confidence_dist.sample(&mut rng),
            })
            .collect();
        classifications.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

        Ok(classifications)
    }
}

impl ImageClassifier for ImageClassifierFake {
    fn classify(&self, image: &DynamicImage) -> Result<Vec<Classification>, ClassifierError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let _ = self.logger.info(&format!(
            "Classifying {}x{} image",
            image.width(),
            image.height()
        ));

        let scripted = self
            .script
            .lock()
            .map_err(|e| ClassifierError::Classification(e.to_string()))?
            .pop_front();

        match scripted {
            Some(Ok(classifications)) => Ok(classifications),
            Some(Err(message)) => Err(ClassifierError::Classification(message)),
            None => self.random_classifications(),
        }
    }
}

pub struct ModelProviderFake {
    classifier: Arc<ImageClassifierFake>,
    failure: Option<String>,
    delay: Duration,
    loads: AtomicUsize,
}

impl ModelProviderFake {
    pub fn new(classifier: Arc<ImageClassifierFake>) -> Self {
        Self {
            classifier,
            failure: None,
            delay: Duration::ZERO,
            loads: AtomicUsize::new(0),
        }
    }

    pub fn failing(classifier: Arc<ImageClassifierFake>, message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::new(classifier)
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

impl ModelProvider for ModelProviderFake {
    fn load(&self) -> Result<ModelHandle, ClassifierError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        std::thread::sleep(self.delay);

        match &self.failure {
            Some(message) => Err(ClassifierError::ModelLoad(message.clone())),
            None => Ok(ModelHandle(self.classifier.clone())),
        }
    }
}
