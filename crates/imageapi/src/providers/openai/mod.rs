mod api;
mod models;

pub use api::{SELF_TEST_PROMPT, generate_image, self_test};
