use crate::image_classifier::models::model_config::ModelConfig;
use std::ffi::OsString;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub logger_timezone: chrono::FixedOffset,
    pub model: ModelConfig,
    pub http_timeout: Duration,
    pub window_size: [f32; 2],
    pub headless: bool,
    pub images: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logger_timezone: mountain_standard_time(),
            model: ModelConfig::default(),
            http_timeout: Duration::from_secs(20),
            window_size: [800.0, 600.0],
            headless: false,
            images: vec![],
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, pico_args::Error> {
        Self::from_args(std::env::args_os().skip(1).collect())
    }

    /// Overrides the defaults with `--model`, `--labels`, `--top-k`,
    /// `--http-timeout` (seconds) and `--headless`; the rest are images.
    pub fn from_args(args: Vec<OsString>) -> Result<Self, pico_args::Error> {
        let mut args = pico_args::Arguments::from_vec(args);
        let mut config = Config::default();

        if let Some(path) = args.opt_value_from_str::<_, String>("--model")? {
            config.model.onnx_model_path = path;
        }
        if let Some(path) = args.opt_value_from_str::<_, String>("--labels")? {
            config.model.labels_path = path;
        }
        if let Some(top_k) = args.opt_value_from_str::<_, usize>("--top-k")? {
            config.model.top_k = top_k.max(1);
        }
        if let Some(secs) = args.opt_value_from_str::<_, u64>("--http-timeout")? {
            config.http_timeout = Duration::from_secs(secs);
        }
        config.headless = args.contains("--headless");

        config.images = args
            .finish()
            .into_iter()
            .filter_map(|arg| arg.into_string().ok())
            .collect();

        Ok(config)
    }
}

fn mountain_standard_time() -> chrono::FixedOffset {
    chrono::FixedOffset::west_opt(7 * 3600).unwrap()
}
