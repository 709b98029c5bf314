mod openai;

use crate::error::GenerationError;
use crate::types::{GeneratedImage, ImageGenClient, ImageGenerationOptions, ImageProvider};

pub use openai::{
    SELF_TEST_PROMPT, generate_image as openai_generate_image, self_test as openai_self_test,
};

pub async fn generate_image(
    client: &ImageGenClient,
    prompt: &str,
    options: &ImageGenerationOptions,
) -> Result<GeneratedImage, GenerationError> {
    match client.provider() {
        ImageProvider::OpenAI => openai_generate_image(client, prompt, options).await,
    }
}

pub async fn self_test(
    client: &ImageGenClient,
    options: &ImageGenerationOptions,
) -> Result<GeneratedImage, GenerationError> {
    match client.provider() {
        ImageProvider::OpenAI => openai_self_test(client, options).await,
    }
}
