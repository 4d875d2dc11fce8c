use super::main::ImageIdentifier;
use crate::image_identifier::core::{Diagnostic, Effect, Level, Msg};

impl ImageIdentifier {
    pub fn execute_effect(&self, effect: Effect) {
        match effect {
            Effect::LoadModel => {
                let loaded = self.model_provider.load();
                self.send(Msg::ModelLoaded(loaded));
            }
            Effect::LoadImage { image_ref, source } => {
                let result = self.image_loader.load(&source);
                self.send(Msg::ImageLoaded { image_ref, result });
            }
            Effect::Classify {
                request_id,
                handle,
                frame,
            } => {
                let result = handle.classify(frame.image());
                self.send(Msg::Classified { request_id, result });
            }
            Effect::Log(diagnostic) => self.log_diagnostic(&diagnostic),
        }
    }

    pub fn log_diagnostic(&self, diagnostic: &Diagnostic) {
        let message = diagnostic.to_string();
        let _ = match diagnostic.level() {
            Level::Info => self.logger.info(&message),
            Level::Warn => self.logger.warn(&message),
            Level::Error => self.logger.error(&message),
        };
    }
}
