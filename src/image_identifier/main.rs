use crate::image_classifier::interface::ModelProvider;
use crate::image_identifier::core::{init, transition, Effect, Model, Msg};
use crate::image_loader::interface::ImageLoader;
use crate::library::logger::interface::Logger;
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// Owns the controller state. Transitions happen on whichever thread calls
/// `dispatch`/`poll` (the UI thread); effects run on worker threads and
/// report back through the message channel.
#[derive(Clone)]
pub struct ImageIdentifier {
    pub model: Arc<Mutex<Model>>,
    pub msg_sender: Sender<Msg>,
    pub msg_receiver: Arc<Mutex<Receiver<Msg>>>,
    pub logger: Arc<dyn Logger + Send + Sync>,
    pub model_provider: Arc<dyn ModelProvider + Send + Sync>,
    pub image_loader: Arc<dyn ImageLoader + Send + Sync>,
    pub waker: Arc<dyn Fn() + Send + Sync>,
}

impl ImageIdentifier {
    pub fn new(
        logger: Arc<dyn Logger + Send + Sync>,
        model_provider: Arc<dyn ModelProvider + Send + Sync>,
        image_loader: Arc<dyn ImageLoader + Send + Sync>,
    ) -> Self {
        let (msg_sender, msg_receiver) = channel();

        Self {
            model: Arc::new(Mutex::new(Model::default())),
            msg_sender,
            msg_receiver: Arc::new(Mutex::new(msg_receiver)),
            logger: logger.with_namespace("image_identifier"),
            model_provider,
            image_loader,
            waker: Arc::new(|| {}),
        }
    }

    /// Called after every message an effect sends, so a view can redraw.
    pub fn with_waker(mut self, waker: Arc<dyn Fn() + Send + Sync>) -> Self {
        self.waker = waker;
        self
    }

    pub fn start(&self) {
        let (model, effects) = init();
        *self.lock_model() = model;
        self.execute_effects(effects);
    }

    pub fn snapshot(&self) -> Model {
        self.lock_model().clone()
    }

    pub fn dispatch(&self, msg: Msg) {
        let _ = self.logger.info(&format!("msg: {:?}", msg));

        let effects = {
            let mut model = self.lock_model();
            let (new_model, effects) = transition(model.clone(), msg);
            *model = new_model;
            effects
        };

        if !effects.is_empty() {
            let _ = self.logger.info(&format!("effects: {:?}", effects));
        }

        self.execute_effects(effects);
    }

    /// Applies every message that has already arrived. Returns how many.
    pub fn poll(&self) -> usize {
        let mut count = 0;
        while let Some(msg) = self.try_recv() {
            self.dispatch(msg);
            count += 1;
        }
        count
    }

    /// Processes messages until `done` holds for the model. Without a
    /// timeout this blocks for as long as effects keep the model busy.
    pub fn run_until(&self, timeout: Option<Duration>, done: impl Fn(&Model) -> bool) -> bool {
        let deadline = timeout.map(|timeout| Instant::now() + timeout);

        loop {
            if done(&self.lock_model()) {
                return true;
            }

            let msg = match deadline {
                Some(deadline) => {
                    let remaining = deadline.saturating_duration_since(Instant::now());
                    match self.lock_receiver().recv_timeout(remaining) {
                        Ok(msg) => msg,
                        Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                            return done(&self.lock_model())
                        }
                    }
                }
                None => match self.lock_receiver().recv() {
                    Ok(msg) => msg,
                    Err(_) => return done(&self.lock_model()),
                },
            };

            self.dispatch(msg);
        }
    }

    pub fn send(&self, msg: Msg) {
        let _ = self.msg_sender.send(msg);
        (self.waker)();
    }

    fn try_recv(&self) -> Option<Msg> {
        self.lock_receiver().try_recv().ok()
    }

    fn execute_effects(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Log(diagnostic) => self.log_diagnostic(&diagnostic),
                effect => {
                    let self_clone = self.clone();
                    std::thread::spawn(move || self_clone.execute_effect(effect));
                }
            }
        }
    }

    fn lock_model(&self) -> MutexGuard<'_, Model> {
        self.model.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_receiver(&self) -> MutexGuard<'_, Receiver<Msg>> {
        self.msg_receiver.lock().unwrap_or_else(|e| e.into_inner())
    }
}
