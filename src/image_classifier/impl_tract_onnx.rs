use crate::image_classifier::interface::{
    Classification, ClassifierError, ImageClassifier, ModelHandle, ModelProvider,
};
use crate::image_classifier::models::labels::Labels;
use crate::image_classifier::models::model_config::ModelConfig;
use crate::image_classifier::tract::image::resize_image_to_tensor;
use crate::library::logger::interface::Logger;
use image::DynamicImage;
use std::sync::Arc;
use tract_onnx::prelude::*;

pub struct ModelProviderTractOnnx {
    config: ModelConfig,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl ModelProviderTractOnnx {
    pub fn new(config: ModelConfig, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            config,
            logger: logger.with_namespace("model_provider"),
        }
    }
}

impl ModelProvider for ModelProviderTractOnnx {
    fn load(&self) -> Result<ModelHandle, ClassifierError> {
        let _ = self
            .logger
            .info(&format!("Loading labels from {}", self.config.labels_path));
        let labels = Labels::from_path(&self.config.labels_path)?;
        if labels.is_empty() {
            return Err(ClassifierError::Labels(format!(
                "{}: no labels found",
                self.config.labels_path
            )));
        }

        let _ = self
            .logger
            .info(&format!("Loading model from {}", self.config.onnx_model_path));
        let classifier = ImageClassifierTractOnnx::new(self.config.clone(), labels)?;
        let _ = self.logger.info("Model loaded");

        Ok(ModelHandle::new(classifier))
    }
}

pub struct ImageClassifierTractOnnx {
    model: TypedRunnableModel<TypedModel>,
    config: ModelConfig,
    labels: Labels,
}

impl ImageClassifierTractOnnx {
    pub fn new(config: ModelConfig, labels: Labels) -> Result<Self, ClassifierError> {
        let (height, width) = config.input_shape;

        let model = tract_onnx::onnx()
            .model_for_path(&config.onnx_model_path)
            .and_then(|model| {
                model.with_input_fact(
                    0,
                    f32::fact([1, 3, height as usize, width as usize]).into(),
                )
            })
            .and_then(|model| model.into_optimized())
            .and_then(|model| model.into_runnable())
            .map_err(|e| ClassifierError::ModelLoad(format!("{}: {}", config.onnx_model_path, e)))?;

        Ok(Self {
            model,
            config,
            labels,
        })
    }
}

impl ImageClassifier for ImageClassifierTractOnnx {
    fn classify(&self, image: &DynamicImage) -> Result<Vec<Classification>, ClassifierError> {
        let (height, width) = self.config.input_shape;
        let input = resize_image_to_tensor(image, width, height, self.config.normalization);

        let outputs = self
            .model
            .run(tvec!(input.into_tvalue()))
            .map_err(|e| ClassifierError::Classification(e.to_string()))?;

        let output = outputs
            .first()
            .ok_or_else(|| ClassifierError::Classification("model produced no output".into()))?;
        let scores: Vec<f32> = output
            .to_array_view::<f32>()
            .map_err(|e| ClassifierError::Classification(e.to_string()))?
            .iter()
            .copied()
            .collect();

        Ok(top_k(&to_probabilities(&scores), &self.labels, self.config.top_k))
    }
}

/// Passes a distribution through untouched, otherwise applies softmax.
pub fn to_probabilities(scores: &[f32]) -> Vec<f32> {
    let sum: f32 = scores.iter().sum();
    let is_distribution =
        scores.iter().all(|s| (0.0..=1.0).contains(s)) && (sum - 1.0).abs() < 1e-3;
    if is_distribution {
        return scores.to_vec();
    }

    let max = scores.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = scores.iter().map(|s| (s - max).exp()).collect();
    let total: f32 = exps.iter().sum();
    exps.iter().map(|e| e / total).collect()
}

/// Highest `k` probabilities, best first.
pub fn top_k(probabilities: &[f32], labels: &Labels, k: usize) -> Vec<Classification> {
    let mut ranked: Vec<(usize, f32)> = probabilities.iter().copied().enumerate().collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

    ranked
        .into_iter()
        .take(k)
        .map(|(index, confidence)| Classification {
            label: labels.name_for(index, probabilities.len()),
            confidence,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_softmax_applied_to_logits() {
        let probabilities = to_probabilities(&[2.0, 1.0, 0.1]);

        let sum: f32 = probabilities.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
        assert!(probabilities[0] > probabilities[1]);
        assert!(probabilities[1] > probabilities[2]);
    }

    #[test]
    fn test_distribution_passes_through() {
        let probabilities = to_probabilities(&[0.1, 0.7, 0.2]);

        assert_eq!(probabilities, vec![0.1, 0.7, 0.2]);
    }

    #[test]
    fn test_top_k_is_descending_and_labeled() {
        let labels = Labels::parse("cat\ndog\nbird\nfish");

        let results = top_k(&[0.05, 0.92, 0.01, 0.02], &labels, 3);

        assert_eq!(
            results,
            vec![
                Classification {
                    label: "dog".to_string(),
                    confidence: 0.92
                },
                Classification {
                    label: "cat".to_string(),
                    confidence: 0.05
                },
                Classification {
                    label: "fish".to_string(),
                    confidence: 0.02
                },
            ]
        );
    }

    #[test]
    fn test_missing_model_file_is_a_load_error() {
        let config = ModelConfig {
            onnx_model_path: "./does/not/exist.onnx".to_string(),
            ..ModelConfig::default()
        };

        let result = ImageClassifierTractOnnx::new(config, Labels::parse("cat"));

        assert!(matches!(result, Err(ClassifierError::ModelLoad(_))));
    }
}
