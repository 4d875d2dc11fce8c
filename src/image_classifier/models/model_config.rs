#[derive(Debug, Clone, PartialEq)]
pub struct ModelConfig {
    pub onnx_model_path: String,
    pub labels_path: String,
    /// (height, width) the network expects.
    pub input_shape: (u32, u32),
    pub top_k: usize,
    pub normalization: Normalization,
}

/// Per channel `(x - mean) / std`, applied after scaling pixels to [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalization {
    pub mean: [f32; 3],
    pub std: [f32; 3],
}

impl Normalization {
    pub const IMAGENET: Normalization = Normalization {
        mean: [0.485, 0.456, 0.406],
        std: [0.229, 0.224, 0.225],
    };

    pub const UNIT: Normalization = Normalization {
        mean: [0.0, 0.0, 0.0],
        std: [1.0, 1.0, 1.0],
    };
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            onnx_model_path: "./models/mobilenetv2-7.onnx".to_string(),
            labels_path: "./models/imagenet_labels.txt".to_string(),
            input_shape: (224, 224),
            top_k: 3,
            normalization: Normalization::IMAGENET,
        }
    }
}
