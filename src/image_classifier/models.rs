pub mod labels;
pub mod model_config;
