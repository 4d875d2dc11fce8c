pub mod core;
pub mod headless;
pub mod history;
pub mod main;
pub mod object_urls;
pub mod render;
pub mod run_effect;

#[cfg(test)]
mod tests;
