use std::io::Cursor;

use base64::Engine as _;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use reqwest::Client;
use tokio::fs;

use crate::error::{EncodeError, ImageLoadError};

pub fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

pub async fn download_image(url: &str) -> Result<Vec<u8>, reqwest::Error> {
    let client = Client::new();

    let bytes = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .bytes()
        .await?;

    Ok(bytes.to_vec())
}

/// Loads an image from an HTTP(S) URL or a local path and converts it to RGB.
pub async fn load_image(source: &str) -> Result<DynamicImage, ImageLoadError> {
    let bytes = if is_http_url(source) {
        download_image(source)
            .await
            .map_err(|cause| ImageLoadError::Fetch {
                source_id: source.to_string(),
                cause,
            })?
    } else {
        fs::read(source)
            .await
            .map_err(|cause| ImageLoadError::Read {
                source_id: source.to_string(),
                cause,
            })?
    };

    let decoded = image::load_from_memory(&bytes).map_err(|cause| ImageLoadError::Decode {
        source_id: source.to_string(),
        cause,
    })?;

    Ok(DynamicImage::ImageRgb8(decoded.to_rgb8()))
}

/// Forces `img` to exactly `width` x `height` with a Lanczos3 filter.
/// Aspect ratio is not preserved.
pub fn resize_image(img: &DynamicImage, width: u32, height: u32) -> DynamicImage {
    if img.width() == width && img.height() == height {
        return img.clone();
    }
    img.resize_exact(width, height, FilterType::Lanczos3)
}

pub fn encode_png(img: &DynamicImage) -> Result<Vec<u8>, EncodeError> {
    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)?;
    Ok(buffer)
}

pub fn encode_image_to_base64(img: &DynamicImage) -> Result<String, EncodeError> {
    Ok(encode_byte_to_base64(encode_png(img)?))
}

pub fn encode_byte_to_base64(bytes: Vec<u8>) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

/// Cuts `prompt` down to at most `max_chars` characters.
pub fn truncate_prompt(prompt: &str, max_chars: usize) -> &str {
    match prompt.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &prompt[..byte_idx],
        None => prompt,
    }
}
