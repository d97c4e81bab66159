//! Configuration module for the voice translator.
//!
//! Provides `AppConfig` (top-level settings), sub-configs for each remote
//! service and the audio front-end, `AppPaths` for cross-platform data
//! directories, and TOML persistence via `AppConfig::load` /
//! `AppConfig::save`.

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{
    AppConfig, AudioConfig, RecognitionConfig, SynthesisConfig, TranslationConfig, UiConfig,
};
