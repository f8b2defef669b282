pub const DEFAULT_OPENAI_ENDPOINT: &str = "https://api.openai.com/v1";
pub const DEFAULT_GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

pub const OPENAI_IMAGE_MODEL: &str = "dall-e-3";
pub const OPENAI_CHAT_MODEL: &str = "gpt-4o-mini";
pub const GEMINI_IMAGE_MODEL: &str = "gemini-2.5-flash-image";
pub const GEMINI_CHAT_MODEL: &str = "gemini-2.0-flash";

pub const DEFAULT_SAVE_LOCATION: &str = "Attachments/";
pub const IMAGE_PREFIX: &str = "ai_image_";
pub const IMAGE_EXTENSION: &str = "png";
pub const FILENAME_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

pub const DEFAULT_MAX_HISTORY_ITEMS: usize = 100;
pub const MIN_HISTORY_ITEMS: usize = 10;
pub const MAX_HISTORY_ITEMS: usize = 500;

pub const TRANSLATION_TEMPERATURE: f32 = 0.3;
pub const TRANSLATION_MAX_TOKENS: u32 = 500;
pub const TRANSLATION_SYSTEM_PROMPT: &str = "You are a translator. Translate the following Korean text to English.
The text will be used as an AI image generation prompt, so:
1. Keep it concise and descriptive
2. Preserve the artistic intent
3. Add relevant visual keywords if appropriate
4. Output ONLY the translated English text, nothing else.";

pub const APP_DIR_NAME: &str = "vault-image-gen";
pub const DATA_FILE_NAME: &str = "data.json";
