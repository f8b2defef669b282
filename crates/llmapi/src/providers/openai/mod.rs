mod api;
pub mod models;

pub use api::{generate_image, send_chat_completion};
