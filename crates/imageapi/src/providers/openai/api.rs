use reqwest::Client;
use tracing::{debug, info, warn};

use crate::error::GenerationError;
use crate::types::{GeneratedImage, ImageGenClient, ImageGenerationOptions};
use crate::utils::{load_image, resize_image, truncate_prompt};

use super::models::{ImageGenerationRequest, ImageGenerationResponse};

pub const SELF_TEST_PROMPT: &str = "A simple red apple on a white table";

const PROMPT_PREVIEW_CHARS: usize = 200;

/// Requests one image for `prompt` and downloads it from the returned URL.
///
/// Prompts longer than `options.max_prompt_chars` are truncated, never
/// rejected. No retry is attempted.
pub async fn generate_image(
    client: &ImageGenClient,
    prompt: &str,
    options: &ImageGenerationOptions,
) -> Result<GeneratedImage, GenerationError> {
    let preview: String = prompt.chars().take(PROMPT_PREVIEW_CHARS).collect();
    info!(
        "Sending prompt (length: {}): {}...",
        prompt.chars().count(),
        preview
    );

    let response = send_generation_request(client, prompt, options).await?;
    if let Some(created) = response.created {
        debug!(created, "image generation response received");
    }

    let first = response
        .data
        .into_iter()
        .next()
        .ok_or(GenerationError::MissingImage)?;

    if let Some(revised) = first.revised_prompt.as_deref() {
        info!("Revised prompt: {revised}");
    }

    let url = first
        .url
        .filter(|url| !url.trim().is_empty())
        .ok_or(GenerationError::MissingImage)?;

    let downloaded = load_image(&url).await?;
    let image = resize_image(&downloaded, options.width, options.height);

    Ok(GeneratedImage {
        image,
        url,
        revised_prompt: first.revised_prompt,
    })
}

/// Issues a known-good prompt to confirm the endpoint and credential work.
pub async fn self_test(
    client: &ImageGenClient,
    options: &ImageGenerationOptions,
) -> Result<GeneratedImage, GenerationError> {
    generate_image(client, SELF_TEST_PROMPT, options)
        .await
        .map_err(|err| GenerationError::SelfTest(Box::new(err)))
}

async fn send_generation_request(
    client: &ImageGenClient,
    prompt: &str,
    options: &ImageGenerationOptions,
) -> Result<ImageGenerationResponse, GenerationError> {
    let url = format!(
        "{}/images/generations",
        client.endpoint().trim_end_matches('/')
    );
    let payload = ImageGenerationRequest {
        model: client.default_model(),
        prompt: truncate_prompt(prompt, options.max_prompt_chars),
        n: options.count,
        size: options.size(),
        quality: &options.quality,
        style: &options.style,
        response_format: &options.response_format,
    };

    let http_client = Client::new();
    let response = http_client
        .post(url)
        .bearer_auth(client.api_key())
        .header("Content-Type", "application/json")
        .json(&payload)
        .send()
        .await?;

    let status = response.status();
    let response_text = response.text().await?;

    if !status.is_success() {
        warn!("Response content: {response_text}");
        return Err(GenerationError::Provider {
            status: status.as_u16(),
            body: response_text,
        });
    }

    Ok(serde_json::from_str(&response_text)?)
}
