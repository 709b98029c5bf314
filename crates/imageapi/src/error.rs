use thiserror::Error;

/// Failure to obtain a decoded image from a URL or a local path.
#[derive(Debug, Error)]
pub enum ImageLoadError {
    #[error("Failed to load image from {source_id}: {cause}")]
    Fetch {
        source_id: String,
        #[source]
        cause: reqwest::Error,
    },
    #[error("Failed to load image from {source_id}: {cause}")]
    Read {
        source_id: String,
        #[source]
        cause: std::io::Error,
    },
    #[error("Failed to load image from {source_id}: {cause}")]
    Decode {
        source_id: String,
        #[source]
        cause: image::ImageError,
    },
}

impl ImageLoadError {
    /// The URL or path that could not be loaded.
    pub fn source_id(&self) -> &str {
        match self {
            ImageLoadError::Fetch { source_id, .. }
            | ImageLoadError::Read { source_id, .. }
            | ImageLoadError::Decode { source_id, .. } => source_id,
        }
    }
}

#[derive(Debug, Error)]
#[error("Failed to encode image as PNG: {0}")]
pub struct EncodeError(#[from] pub image::ImageError);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Environment variable {0} is not set")]
    MissingApiKey(String),
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("API call failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API call failed: status {status}: {body}")]
    Provider { status: u16, body: String },

    #[error("API call failed: malformed response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("API call failed: response did not contain an image URL")]
    MissingImage,

    #[error("API call failed: {0}")]
    ImageLoad(#[from] ImageLoadError),

    #[error("API test failed: {0}")]
    SelfTest(#[source] Box<GenerationError>),
}
