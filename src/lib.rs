pub mod commands;
pub mod config;
pub mod constants;
pub mod error;
pub mod fs_utils;
pub mod generator;
pub mod history;
pub mod models;
pub mod settings;
pub mod storage;
pub mod translation;
pub mod vault;

pub use commands::generate::generate_image;
pub use commands::history::{
    clear_history, delete_history_item, get_history_item, history_link, list_history, regenerate,
};
pub use commands::settings::{get_settings, set_setting, update_settings};
pub use commands::AppState;

pub use config::Endpoints;
pub use error::AppError;
pub use fs_utils::{generate_filename, image_link};
pub use generator::{size_token, ImageGenerator};
pub use history::HistoryManager;
pub use models::{
    DallEStyle, GeminiStyle, GenerateImageRequest, GeneratedImageResponse, GenerationRequest,
    GenerationResult, HistoryItem, ImageSize, PluginData,
};
pub use settings::Settings;
pub use storage::{DataStore, JsonFileStore, MemoryStore};
pub use translation::{contains_korean, Translator};
pub use vault::{FsVault, Vault};

pub use llmapi::LLMProvider;
