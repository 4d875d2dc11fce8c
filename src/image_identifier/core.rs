use super::history::History;
use super::object_urls::ObjectUrls;
use crate::image_classifier::interface::{Classification, ClassifierError, ModelHandle};
use crate::image_loader::interface::{Frame, ImageLoadError, ImageSource};
use std::fmt;
use std::path::PathBuf;

pub type RequestId = u64;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlobId(pub u64);

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ImageRef {
    Url(String),
    Blob(BlobId),
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageRef::Url(url) => f.write_str(url),
            ImageRef::Blob(BlobId(id)) => write!(f, "blob:{}", id),
        }
    }
}

//
//
//

#[derive(Clone, Debug, PartialEq, Default)]
pub enum ModelStatus {
    #[default]
    Unloaded,
    Loading,
    Ready(ModelHandle),
    Failed(String),
}

#[derive(Clone, Debug, PartialEq)]
pub enum ImageStatus {
    Decoding,
    Decoded(Frame),
    Failed(ImageLoadError),
}

#[derive(Clone, Debug, PartialEq)]
pub struct ActiveImage {
    pub image_ref: ImageRef,
    pub status: ImageStatus,
}

impl ActiveImage {
    pub fn frame(&self) -> Option<&Frame> {
        match &self.status {
            ImageStatus::Decoded(frame) if frame.has_pixels() => Some(frame),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Default)]
pub struct Model {
    pub model_status: ModelStatus,
    pub active: Option<ActiveImage>,
    pub results: Vec<Classification>,
    pub history: History,
    pub image_load_failed: bool,
    pub url_input: String,
    pub object_urls: ObjectUrls,
    pub in_flight: Option<RequestId>,
    pub next_request_id: RequestId,
}

impl Model {
    pub fn is_model_loading(&self) -> bool {
        matches!(self.model_status, ModelStatus::Loading)
    }

    pub fn active_ref(&self) -> Option<&ImageRef> {
        self.active.as_ref().map(|active| &active.image_ref)
    }

    pub fn is_image_settled(&self) -> bool {
        !matches!(
            self.active,
            Some(ActiveImage {
                status: ImageStatus::Decoding,
                ..
            })
        )
    }
}

//
//
//

#[derive(Debug)]
pub enum Msg {
    ModelLoaded(Result<ModelHandle, ClassifierError>),
    FileChosen(Option<PathBuf>),
    UrlInputChanged(String),
    HistorySelected(ImageRef),
    ImageLoaded {
        image_ref: ImageRef,
        result: Result<Frame, ImageLoadError>,
    },
    IdentifyClicked,
    Classified {
        request_id: RequestId,
        result: Result<Vec<Classification>, ClassifierError>,
    },
    Shutdown,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    LoadModel,
    LoadImage {
        image_ref: ImageRef,
        source: ImageSource,
    },
    Classify {
        request_id: RequestId,
        handle: ModelHandle,
        frame: Frame,
    },
    Log(Diagnostic),
}

/// Why an identify request was turned away without reaching the model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Refusal {
    #[error("model is not loaded yet")]
    ModelNotReady,

    #[error("model failed to load")]
    ModelFailed,

    #[error("no image selected")]
    NoImage,

    #[error("image is not loaded correctly")]
    ImageNotReady,

    #[error("a classification is already in progress")]
    RequestInFlight,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Diagnostic {
    LoadingModel,
    ModelReady,
    ModelLoadFailed(String),
    UnexpectedModelLoad,
    ImageLoadFailed { image_ref: ImageRef, reason: String },
    StaleImageLoad(ImageRef),
    IdentifyRefused(Refusal),
    ClassificationFailed(String),
    StaleClassification(RequestId),
    BlobsRevoked(usize),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    Info,
    Warn,
    Error,
}

impl Diagnostic {
    pub fn level(&self) -> Level {
        match self {
            Diagnostic::LoadingModel | Diagnostic::ModelReady | Diagnostic::BlobsRevoked(_) => {
                Level::Info
            }
            Diagnostic::StaleImageLoad(_)
            | Diagnostic::StaleClassification(_)
            | Diagnostic::UnexpectedModelLoad
            | Diagnostic::IdentifyRefused(_) => Level::Warn,
            Diagnostic::ModelLoadFailed(_)
            | Diagnostic::ImageLoadFailed { .. }
            | Diagnostic::ClassificationFailed(_) => Level::Error,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::LoadingModel => f.write_str("Loading model..."),
            Diagnostic::ModelReady => f.write_str("Model loaded successfully"),
            Diagnostic::ModelLoadFailed(reason) => write!(f, "Error loading model: {}", reason),
            Diagnostic::UnexpectedModelLoad => {
                f.write_str("Ignoring model load result outside of loading")
            }
            Diagnostic::ImageLoadFailed { image_ref, reason } => {
                write!(f, "Error loading image {}: {}", image_ref, reason)
            }
            Diagnostic::StaleImageLoad(image_ref) => {
                write!(f, "Ignoring load result for replaced image {}", image_ref)
            }
            Diagnostic::IdentifyRefused(refusal) => write!(f, "Cannot identify: {}", refusal),
            Diagnostic::ClassificationFailed(reason) => {
                write!(f, "Classification failed: {}", reason)
            }
            Diagnostic::StaleClassification(request_id) => {
                write!(f, "Ignoring stale classification #{}", request_id)
            }
            Diagnostic::BlobsRevoked(count) => write!(f, "Released {} file reference(s)", count),
        }
    }
}

//
//
//

pub fn init() -> (Model, Vec<Effect>) {
    (
        Model {
            model_status: ModelStatus::Loading,
            ..Model::default()
        },
        vec![Effect::Log(Diagnostic::LoadingModel), Effect::LoadModel],
    )
}

pub fn transition(model: Model, msg: Msg) -> (Model, Vec<Effect>) {
    match msg {
        Msg::ModelLoaded(result) => transition_model_loaded(model, result),

        Msg::FileChosen(Some(path)) => {
            let mut model = model;
            let id = model.object_urls.create(path);
            activate(model, ImageRef::Blob(id))
        }

        Msg::FileChosen(None) => (deactivate(model), vec![]),

        Msg::UrlInputChanged(text) => {
            let mut model = model;
            let url = text.trim().to_string();
            model.url_input = text;

            if url.is_empty() {
                (deactivate(model), vec![])
            } else {
                activate(model, ImageRef::Url(url))
            }
        }

        Msg::HistorySelected(image_ref) => activate(model, image_ref),

        Msg::ImageLoaded { image_ref, result } => {
            transition_image_loaded(model, image_ref, result)
        }

        Msg::IdentifyClicked => transition_identify(model),

        Msg::Classified { request_id, result } => {
            transition_classified(model, request_id, result)
        }

        Msg::Shutdown => {
            let mut model = model;
            let released = model.object_urls.revoke_all();
            (model, vec![Effect::Log(Diagnostic::BlobsRevoked(released))])
        }
    }
}

fn transition_model_loaded(
    mut model: Model,
    result: Result<ModelHandle, ClassifierError>,
) -> (Model, Vec<Effect>) {
    if !model.is_model_loading() {
        return (model, vec![Effect::Log(Diagnostic::UnexpectedModelLoad)]);
    }

    match result {
        Ok(handle) => {
            model.model_status = ModelStatus::Ready(handle);
            (model, vec![Effect::Log(Diagnostic::ModelReady)])
        }
        Err(e) => {
            let reason = e.to_string();
            model.model_status = ModelStatus::Failed(reason.clone());
            (model, vec![Effect::Log(Diagnostic::ModelLoadFailed(reason))])
        }
    }
}

/// Makes `image_ref` the current image. Prior results, the failure flag and
/// any outstanding classify request belong to the old image and are dropped.
fn activate(mut model: Model, image_ref: ImageRef) -> (Model, Vec<Effect>) {
    model.results.clear();
    model.image_load_failed = false;
    model.in_flight = None;
    model.history.record(&image_ref);

    let source = match &image_ref {
        ImageRef::Url(url) => Some(ImageSource::Url(url.clone())),
        ImageRef::Blob(id) => model
            .object_urls
            .resolve(*id)
            .map(|path| ImageSource::File(path.to_path_buf())),
    };

    match source {
        Some(source) => {
            model.active = Some(ActiveImage {
                image_ref: image_ref.clone(),
                status: ImageStatus::Decoding,
            });
            (model, vec![Effect::LoadImage { image_ref, source }])
        }
        None => {
            let error = ImageLoadError::Revoked(image_ref.to_string());
            let reason = error.to_string();
            model.image_load_failed = true;
            model.active = Some(ActiveImage {
                image_ref: image_ref.clone(),
                status: ImageStatus::Failed(error),
            });
            (
                model,
                vec![Effect::Log(Diagnostic::ImageLoadFailed { image_ref, reason })],
            )
        }
    }
}

fn deactivate(mut model: Model) -> Model {
    model.active = None;
    model.results.clear();
    model.image_load_failed = false;
    model.in_flight = None;
    model
}

fn transition_image_loaded(
    mut model: Model,
    image_ref: ImageRef,
    result: Result<Frame, ImageLoadError>,
) -> (Model, Vec<Effect>) {
    if model.active_ref() != Some(&image_ref) {
        return (model, vec![Effect::Log(Diagnostic::StaleImageLoad(image_ref))]);
    }

    let result = result.and_then(|frame| {
        if frame.has_pixels() {
            Ok(frame)
        } else {
            Err(ImageLoadError::EmptyImage)
        }
    });

    let (status, failed) = match &result {
        Ok(frame) => (ImageStatus::Decoded(frame.clone()), false),
        Err(error) => (ImageStatus::Failed(error.clone()), true),
    };
    model.active = Some(ActiveImage {
        image_ref: image_ref.clone(),
        status,
    });
    model.image_load_failed = failed;

    match result {
        Ok(_) => (model, vec![]),
        Err(error) => {
            let reason = error.to_string();
            (
                model,
                vec![Effect::Log(Diagnostic::ImageLoadFailed { image_ref, reason })],
            )
        }
    }
}

fn transition_identify(mut model: Model) -> (Model, Vec<Effect>) {
    let refuse = |model: Model, refusal: Refusal| {
        (model, vec![Effect::Log(Diagnostic::IdentifyRefused(refusal))])
    };

    let handle = match &model.model_status {
        ModelStatus::Ready(handle) => handle.clone(),
        ModelStatus::Failed(_) => return refuse(model, Refusal::ModelFailed),
        ModelStatus::Unloaded | ModelStatus::Loading => {
            return refuse(model, Refusal::ModelNotReady)
        }
    };

    let Some(active) = &model.active else {
        return refuse(model, Refusal::NoImage);
    };

    let Some(frame) = active.frame().cloned() else {
        model.image_load_failed = true;
        return refuse(model, Refusal::ImageNotReady);
    };

    if model.in_flight.is_some() {
        return refuse(model, Refusal::RequestInFlight);
    }

    model.url_input.clear();
    let request_id = model.next_request_id;
    model.next_request_id += 1;
    model.in_flight = Some(request_id);

    (
        model,
        vec![Effect::Classify {
            request_id,
            handle,
            frame,
        }],
    )
}

fn transition_classified(
    mut model: Model,
    request_id: RequestId,
    result: Result<Vec<Classification>, ClassifierError>,
) -> (Model, Vec<Effect>) {
    if model.in_flight != Some(request_id) {
        return (
            model,
            vec![Effect::Log(Diagnostic::StaleClassification(request_id))],
        );
    }
    model.in_flight = None;

    match result {
        Ok(results) => {
            model.results = results;
            (model, vec![])
        }
        Err(e) => (
            model,
            vec![Effect::Log(Diagnostic::ClassificationFailed(e.to_string()))],
        ),
    }
}
