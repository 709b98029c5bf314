pub mod error;
pub mod providers;
pub mod types;
pub mod utils;

pub use error::{ConfigError, EncodeError, GenerationError, ImageLoadError};
pub use providers::{SELF_TEST_PROMPT, generate_image, self_test};
pub use types::{GeneratedImage, ImageGenClient, ImageGenerationOptions, ImageProvider};
