pub mod error;
pub mod providers;
pub mod types;
pub mod utils;

pub use error::LlmError;
pub use providers::{chat_completion, generate_image};
pub use types::{
    ChatOptions, GeneratedImage, LLMClient, LLMMessage, LLMProvider, LLMType, LLMUserType,
};
