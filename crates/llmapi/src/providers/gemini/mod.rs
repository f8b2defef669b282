mod api;
pub mod models;

pub use api::{
    aspect_ratio_for_size, build_generate_body, enhance_prompt_for_style, extract_generated_image,
    generate_image,
};
