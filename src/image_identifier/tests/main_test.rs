#[cfg(test)]
mod main_test {
    use super::super::fixture::{cat_and_dog, url, Fixture, TIMEOUT};
    use crate::image_identifier::core::{ImageStatus, ModelStatus, Msg};
    use crate::image_identifier::headless::run_headless;
    use crate::image_identifier::render::Screen;
    use crate::image_loader::interface::ImageSource;
    use crate::view::impl_fake::ViewFake;
    use std::time::Duration;

    #[test]
    fn test_identify_end_to_end() {
        let f = Fixture::new();
        f.start_and_wait_for_model();

        f.select_and_wait(Msg::UrlInputChanged("a.png".to_string()));
        f.image_classifier.respond_with(Ok(cat_and_dog()));
        f.identify_and_wait();

        let model = f.image_identifier.snapshot();
        assert_eq!(model.results, cat_and_dog());
        assert_eq!(f.image_classifier.calls(), 1);
        assert_eq!(f.model_provider.loads(), 1);
        assert_eq!(f.image_loader.calls(), 1);
    }

    #[test]
    fn test_identify_while_model_loads_is_refused() {
        let f = Fixture::with_slow_model(Duration::from_millis(200));
        f.image_identifier.start();

        f.image_identifier
            .dispatch(Msg::UrlInputChanged("a.png".to_string()));
        f.image_identifier.dispatch(Msg::IdentifyClicked);

        assert!(f.logger.contains("Cannot identify: model is not loaded yet"));
        assert!(f
            .image_identifier
            .run_until(TIMEOUT, |model| !model.is_model_loading()));
        assert!(matches!(
            f.image_identifier.snapshot().model_status,
            ModelStatus::Ready(_)
        ));
        assert_eq!(f.image_classifier.calls(), 0);
        assert_eq!(f.model_provider.loads(), 1);
    }

    #[test]
    fn test_failed_model_never_reaches_classifier() {
        let f = Fixture::with_failing_model("no backend");
        f.start_and_wait_for_model();

        f.select_and_wait(Msg::UrlInputChanged("a.png".to_string()));
        f.image_identifier.dispatch(Msg::IdentifyClicked);
        f.image_identifier.dispatch(Msg::IdentifyClicked);

        let model = f.image_identifier.snapshot();
        assert!(matches!(model.model_status, ModelStatus::Failed(_)));
        assert!(model.results.is_empty());
        assert_eq!(f.image_classifier.calls(), 0);
        assert_eq!(f.model_provider.loads(), 1);
        assert!(f.logger.contains("Error loading model"));
        assert!(f.logger.contains("Cannot identify: model failed to load"));
    }

    #[test]
    fn test_broken_image_never_reaches_classifier() {
        let f = Fixture::new();
        f.start_and_wait_for_model();
        f.image_loader.fail(ImageSource::Url("broken.png".to_string()));

        f.select_and_wait(Msg::UrlInputChanged("broken.png".to_string()));
        f.image_identifier.dispatch(Msg::IdentifyClicked);

        let model = f.image_identifier.snapshot();
        assert!(model.image_load_failed);
        assert!(matches!(
            model.active.map(|active| active.status),
            Some(ImageStatus::Failed(_))
        ));
        assert_eq!(f.image_classifier.calls(), 0);
    }

    #[test]
    fn test_classifier_error_keeps_results() {
        let f = Fixture::new();
        f.start_and_wait_for_model();
        f.select_and_wait(Msg::UrlInputChanged("a.png".to_string()));
        f.image_classifier.respond_with(Ok(cat_and_dog()));
        f.identify_and_wait();

        f.image_classifier.respond_with(Err("device lost".to_string()));
        f.identify_and_wait();

        assert_eq!(f.image_identifier.snapshot().results, cat_and_dog());
        assert_eq!(f.image_classifier.calls(), 2);
        assert!(f.logger.contains("Classification failed: classification failed: device lost"));
    }

    #[test]
    fn test_history_through_runtime() {
        let f = Fixture::new();
        f.start_and_wait_for_model();

        for value in ["a.png", "b.png", "a.png"] {
            f.select_and_wait(Msg::UrlInputChanged(value.to_string()));
        }

        assert_eq!(
            f.image_identifier.snapshot().history.entries(),
            &[url("b.png"), url("a.png")]
        );
    }

    #[test]
    fn test_headless_run_shows_results() {
        let f = Fixture::new();
        f.image_classifier.respond_with(Ok(cat_and_dog()));
        let mut view = ViewFake::new();

        run_headless(
            &f.image_identifier,
            &mut view,
            &["a.png".to_string()],
            TIMEOUT,
        )
        .unwrap();

        let Some(Screen::Main(last)) = view.screens.last() else {
            panic!("expected a main screen");
        };
        assert_eq!(last.results.len(), 2);
        assert_eq!(last.results[0].label, "cat");
        assert!(last.results[0].best_guess);
        assert!(f.logger.contains("Released 0 file reference(s)"));
    }

    #[test]
    fn test_headless_run_fails_when_model_fails() {
        let f = Fixture::with_failing_model("no backend");
        let mut view = ViewFake::new();

        let result = run_headless(&f.image_identifier, &mut view, &[], TIMEOUT);

        assert!(result.is_err());
        assert_eq!(f.image_classifier.calls(), 0);
    }
}
