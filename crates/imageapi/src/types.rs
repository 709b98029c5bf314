use image::DynamicImage;

use crate::error::ConfigError;

pub const DEFAULT_OPENAI_ENDPOINT: &str = "https://api.openai.com/v1";
pub const DEFAULT_IMAGE_MODEL: &str = "dall-e-3";
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Longest prompt the generation endpoint accepts, in characters.
pub const MAX_PROMPT_CHARS: usize = 4000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageProvider {
    OpenAI,
}

#[derive(Clone)]
pub struct ImageGenClient {
    pub(crate) provider: ImageProvider,
    pub(crate) api_key: String,
    pub(crate) endpoint: String,
    pub(crate) default_model: String,
}

impl std::fmt::Debug for ImageGenClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageGenClient")
            .field("provider", &self.provider)
            .field("endpoint", &self.endpoint)
            .field("default_model", &self.default_model)
            .finish_non_exhaustive()
    }
}

impl ImageGenClient {
    pub fn new(
        provider: ImageProvider,
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        default_model: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            api_key: api_key.into(),
            endpoint: endpoint.into(),
            default_model: default_model.into(),
        }
    }

    /// Builds an OpenAI client from the credential in `OPENAI_API_KEY`.
    ///
    /// Fails immediately when the variable is missing or blank.
    pub fn from_env(
        endpoint: impl Into<String>,
        default_model: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let api_key = std::env::var(API_KEY_ENV)
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .ok_or_else(|| ConfigError::MissingApiKey(API_KEY_ENV.to_string()))?;

        Ok(Self::new(
            ImageProvider::OpenAI,
            api_key,
            endpoint,
            default_model,
        ))
    }

    pub fn provider(&self) -> ImageProvider {
        self.provider
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn default_model(&self) -> &str {
        &self.default_model
    }
}

/// Fixed parameters sent with every generation request.
#[derive(Clone, Debug)]
pub struct ImageGenerationOptions {
    pub width: u32,
    pub height: u32,
    pub count: u8,
    pub quality: String,
    pub style: String,
    pub response_format: String,
    pub max_prompt_chars: usize,
}

impl Default for ImageGenerationOptions {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 1024,
            count: 1,
            quality: "standard".to_string(),
            style: "vivid".to_string(),
            response_format: "url".to_string(),
            max_prompt_chars: MAX_PROMPT_CHARS,
        }
    }
}

impl ImageGenerationOptions {
    pub fn size(&self) -> String {
        format!("{}x{}", self.width, self.height)
    }
}

#[derive(Debug)]
pub struct GeneratedImage {
    pub image: DynamicImage,
    pub url: String,
    pub revised_prompt: Option<String>,
}
