//! Configuration loading and management

mod loader;
mod settings;

pub use loader::SettingsLoader;
pub use settings::Settings;
