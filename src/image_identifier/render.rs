use crate::image_identifier::core::{ImageRef, Model, ModelStatus};
use crate::image_loader::interface::Frame;

pub const HEADER: &str = "Image Identification";
pub const LOADING: &str = "Model Loading...";
pub const IMAGE_ERROR: &str = "Error loading image. Please try a different image.";
pub const BEST_GUESS: &str = "Best Guess";

#[derive(Clone, Debug, PartialEq)]
pub enum Screen {
    Loading,
    Main(MainScreen),
}

#[derive(Clone, Debug, PartialEq)]
pub struct MainScreen {
    pub url_input: String,
    pub active_image: Option<ImageRef>,
    pub preview: Option<Frame>,
    pub error: Option<String>,
    pub model_notice: Option<String>,
    pub results: Vec<ResultRow>,
    pub show_identify: bool,
    pub busy: bool,
    pub history: Vec<ImageRef>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ResultRow {
    pub label: String,
    pub confidence: String,
    pub best_guess: bool,
}

pub fn render(model: &Model) -> Screen {
    if model.is_model_loading() {
        return Screen::Loading;
    }

    let model_notice = match &model.model_status {
        ModelStatus::Failed(reason) => Some(format!("Model failed to load: {}", reason)),
        _ => None,
    };

    Screen::Main(MainScreen {
        url_input: model.url_input.clone(),
        active_image: model.active_ref().cloned(),
        preview: model.active.as_ref().and_then(|active| active.frame().cloned()),
        error: model.image_load_failed.then(|| IMAGE_ERROR.to_string()),
        model_notice,
        results: model
            .results
            .iter()
            .enumerate()
            .map(|(index, result)| ResultRow {
                label: result.label.clone(),
                confidence: format_confidence(result.confidence),
                best_guess: index == 0,
            })
            .collect(),
        show_identify: model.active.is_some(),
        busy: model.in_flight.is_some(),
        history: model.history.entries().to_vec(),
    })
}

pub fn format_confidence(confidence: f32) -> String {
    format!("Confidence level: {:.2}%", confidence * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_classifier::interface::Classification;
    use crate::image_identifier::core::{init, transition, Msg};

    #[test]
    fn test_loading_screen_while_model_loads() {
        let (model, _) = init();

        assert_eq!(render(&model), Screen::Loading);
    }

    #[test]
    fn test_results_with_best_guess_first() {
        let mut model = Model::default();
        model.results = vec![
            Classification {
                label: "cat".to_string(),
                confidence: 0.92,
            },
            Classification {
                label: "dog".to_string(),
                confidence: 0.05,
            },
        ];

        let Screen::Main(screen) = render(&model) else {
            panic!("expected main screen");
        };

        assert_eq!(
            screen.results,
            vec![
                ResultRow {
                    label: "cat".to_string(),
                    confidence: "Confidence level: 92.00%".to_string(),
                    best_guess: true,
                },
                ResultRow {
                    label: "dog".to_string(),
                    confidence: "Confidence level: 5.00%".to_string(),
                    best_guess: false,
                },
            ]
        );
    }

    #[test]
    fn test_image_error_and_identify_button() {
        let (model, _) = transition(
            Model::default(),
            Msg::UrlInputChanged("https://example.com/a.png".to_string()),
        );
        let mut model = model;
        model.image_load_failed = true;

        let Screen::Main(screen) = render(&model) else {
            panic!("expected main screen");
        };

        assert_eq!(screen.error.as_deref(), Some(IMAGE_ERROR));
        assert!(screen.show_identify);
        assert!(screen.preview.is_none());
        assert_eq!(screen.history.len(), 1);
    }

    #[test]
    fn test_model_failure_notice() {
        let model = Model {
            model_status: ModelStatus::Failed("no backend".to_string()),
            ..Model::default()
        };

        let Screen::Main(screen) = render(&model) else {
            panic!("expected main screen");
        };

        assert_eq!(
            screen.model_notice.as_deref(),
            Some("Model failed to load: no backend")
        );
        assert!(!screen.show_identify);
    }
}
